// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of the air-conditioner unit.

use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Represents the power state of the unit (`AC_FUN_POWER`).
///
/// # Examples
///
/// ```
/// use aircon_thermostat::types::Power;
///
/// assert_eq!(Power::On.as_str(), "On");
/// assert_eq!("Off".parse::<Power>().unwrap(), Power::Off);
/// assert!(Power::On.is_on());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum Power {
    /// The unit is off.
    #[default]
    Off,
    /// The unit is on.
    On,
}

impl Power {
    /// Returns the device wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
        }
    }

    /// Returns `true` if the unit is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Power {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" => Ok(Self::On),
            "Off" => Ok(Self::Off),
            _ => Err(MappingError::UnknownPower(s.to_string())),
        }
    }
}

impl From<bool> for Power {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
