// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operation mode of the unit.

use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Operation mode reported by the unit (`AC_FUN_OPMODE`).
///
/// `Cool`, `Heat` and `Auto` have host target-state equivalents. `Dry` and
/// `Wind` are device-only modes: they never drive heating or cooling and
/// leave the commanded setpoint alone.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::types::OperationMode;
///
/// let mode: OperationMode = "Auto".parse().unwrap();
/// assert_eq!(mode, OperationMode::Auto);
/// assert!(mode.is_thermostatic());
/// assert!(!OperationMode::Dry.is_thermostatic());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum OperationMode {
    /// Cooling only.
    Cool,
    /// Heating only.
    Heat,
    /// Heats or cools to stay between the thresholds.
    #[default]
    Auto,
    /// Dehumidification.
    Dry,
    /// Fan only.
    Wind,
}

impl OperationMode {
    /// Returns the device wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cool => "Cool",
            Self::Heat => "Heat",
            Self::Auto => "Auto",
            Self::Dry => "Dry",
            Self::Wind => "Wind",
        }
    }

    /// Returns `true` for modes that regulate against a setpoint.
    #[must_use]
    pub const fn is_thermostatic(&self) -> bool {
        matches!(self, Self::Cool | Self::Heat | Self::Auto)
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cool" => Ok(Self::Cool),
            "Heat" => Ok(Self::Heat),
            "Auto" => Ok(Self::Auto),
            "Dry" => Ok(Self::Dry),
            "Wind" => Ok(Self::Wind),
            _ => Err(MappingError::UnknownOperationMode(s.to_string())),
        }
    }
}
