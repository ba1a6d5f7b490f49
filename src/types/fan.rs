// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan level of the indoor unit.

use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Fan level reported by the unit (`AC_FUN_WINDLEVEL`).
///
/// Levels are ordered from slowest to fastest, with `Auto` sorting first.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::types::FanLevel;
///
/// assert_eq!("Turbo".parse::<FanLevel>().unwrap(), FanLevel::Turbo);
/// assert!(FanLevel::Low < FanLevel::High);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum FanLevel {
    /// The unit chooses the fan speed.
    #[default]
    Auto,
    /// Low speed.
    Low,
    /// Medium speed.
    Mid,
    /// High speed.
    High,
    /// Maximum speed.
    Turbo,
}

impl FanLevel {
    /// Returns the device wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Low => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
            Self::Turbo => "Turbo",
        }
    }
}

impl fmt::Display for FanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanLevel {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Auto" => Ok(Self::Auto),
            "Low" => Ok(Self::Low),
            "Mid" => Ok(Self::Mid),
            "High" => Ok(Self::High),
            "Turbo" => Ok(Self::Turbo),
            _ => Err(MappingError::UnknownFanLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_level_from_str() {
        assert_eq!("Mid".parse::<FanLevel>().unwrap(), FanLevel::Mid);
        assert_eq!(
            "Medium".parse::<FanLevel>(),
            Err(MappingError::UnknownFanLevel("Medium".to_string()))
        );
    }

    #[test]
    fn fan_level_ordering() {
        assert!(FanLevel::Auto < FanLevel::Low);
        assert!(FanLevel::High < FanLevel::Turbo);
    }
}
