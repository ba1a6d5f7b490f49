// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat characteristics exposed to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Lowest setpoint or threshold the host may request.
pub const SETPOINT_MIN: f64 = 16.0;

/// Highest setpoint or threshold the host may request.
pub const SETPOINT_MAX: f64 = 30.0;

/// A thermostat characteristic the host can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Whether the unit is on.
    Active,
    /// Measured room temperature. Read-only.
    CurrentTemperature,
    /// The setpoint shown to the host.
    TargetTemperature,
    /// Cooling threshold (`max`).
    CoolingThresholdTemperature,
    /// Heating threshold (`min`).
    HeatingThresholdTemperature,
    /// Requested mode code.
    TargetHeaterCoolerState,
    /// Derived operating state code. Read-only.
    CurrentHeaterCoolerState,
    /// Vertical swing on or off.
    SwingMode,
    /// Fan speed as a percentage.
    RotationSpeed,
}

impl Characteristic {
    /// Every characteristic the accessory exposes.
    pub const ALL: [Self; 9] = [
        Self::Active,
        Self::CurrentTemperature,
        Self::TargetTemperature,
        Self::CoolingThresholdTemperature,
        Self::HeatingThresholdTemperature,
        Self::TargetHeaterCoolerState,
        Self::CurrentHeaterCoolerState,
        Self::SwingMode,
        Self::RotationSpeed,
    ];

    /// Returns the characteristic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::CurrentTemperature => "CurrentTemperature",
            Self::TargetTemperature => "TargetTemperature",
            Self::CoolingThresholdTemperature => "CoolingThresholdTemperature",
            Self::HeatingThresholdTemperature => "HeatingThresholdTemperature",
            Self::TargetHeaterCoolerState => "TargetHeaterCoolerState",
            Self::CurrentHeaterCoolerState => "CurrentHeaterCoolerState",
            Self::SwingMode => "SwingMode",
            Self::RotationSpeed => "RotationSpeed",
        }
    }

    /// Returns `false` for characteristics only the engine may update.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(
            self,
            Self::CurrentTemperature | Self::CurrentHeaterCoolerState
        )
    }

    /// Numeric bounds, for the characteristics that have them.
    #[must_use]
    pub const fn props(&self) -> Option<CharacteristicProps> {
        match self {
            Self::CurrentTemperature | Self::RotationSpeed => {
                Some(CharacteristicProps::new(0.0, 100.0, 1.0))
            }
            Self::TargetTemperature
            | Self::CoolingThresholdTemperature
            | Self::HeatingThresholdTemperature => {
                Some(CharacteristicProps::new(SETPOINT_MIN, SETPOINT_MAX, 1.0))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range and step for a numeric characteristic.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::host::Characteristic;
///
/// let props = Characteristic::TargetTemperature.props().unwrap();
/// assert!(props.validate(22.0).is_ok());
/// assert!(props.validate(31.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicProps {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Step advertised to the host.
    pub step: f64,
}

impl CharacteristicProps {
    /// Creates a new set of bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Checks that `value` is finite and within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotFinite`] or [`ValueError::OutOfRange`].
    pub fn validate(&self, value: f64) -> Result<f64, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NotFinite);
        }
        if value < self.min || value > self.max {
            return Err(ValueError::OutOfRange {
                min: self.min,
                max: self.max,
                actual: value,
            });
        }
        Ok(value)
    }
}

/// A value read from or written to a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// A flag such as `Active` or `SwingMode`.
    Bool(bool),
    /// A host enum code.
    Code(u8),
    /// A temperature or percentage.
    Number(f64),
}

impl CharacteristicValue {
    /// Reads the value as a flag. Codes `0` and `1` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::WrongKind`] for any other value.
    pub fn as_bool(&self, characteristic: Characteristic) -> Result<bool, ValueError> {
        match *self {
            Self::Bool(b) => Ok(b),
            Self::Code(0) => Ok(false),
            Self::Code(1) => Ok(true),
            _ => Err(wrong_kind(characteristic, "boolean")),
        }
    }

    /// Reads the value as a host enum code.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::WrongKind`] for flags and non-integral numbers.
    pub fn as_code(&self, characteristic: Characteristic) -> Result<u8, ValueError> {
        match *self {
            Self::Code(c) => Ok(c),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Self::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(&n) => Ok(n as u8),
            _ => Err(wrong_kind(characteristic, "code")),
        }
    }

    /// Reads the value as a number.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::WrongKind`] for flags.
    pub fn as_number(&self, characteristic: Characteristic) -> Result<f64, ValueError> {
        match *self {
            Self::Number(n) => Ok(n),
            Self::Code(c) => Ok(f64::from(c)),
            Self::Bool(_) => Err(wrong_kind(characteristic, "numeric")),
        }
    }
}

fn wrong_kind(characteristic: Characteristic, expected: &'static str) -> ValueError {
    ValueError::WrongKind {
        characteristic: characteristic.to_string(),
        expected,
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        Self::Code(value)
    }
}
