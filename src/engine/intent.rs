// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated host write requests.

use crate::error::{Error, Result, ValueError};
use crate::host::{Characteristic, CharacteristicValue};

/// Which threshold a host adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdBound {
    /// The heating threshold (`min`).
    Heating,
    /// The cooling threshold (`max`).
    Cooling,
}

impl ThresholdBound {
    /// The characteristic carrying this bound.
    #[must_use]
    pub const fn characteristic(self) -> Characteristic {
        match self {
            Self::Heating => Characteristic::HeatingThresholdTemperature,
            Self::Cooling => Characteristic::CoolingThresholdTemperature,
        }
    }
}

/// A host write, already validated against the characteristic's bounds.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::engine::HostIntent;
/// use aircon_thermostat::host::{Characteristic, CharacteristicValue};
///
/// let intent = HostIntent::from_write(
///     Characteristic::CoolingThresholdTemperature,
///     CharacteristicValue::Number(24.0),
/// )
/// .unwrap();
/// assert_eq!(intent, HostIntent::SetCoolingThreshold(24.0));
///
/// // Read-only characteristics cannot be written
/// assert!(HostIntent::from_write(
///     Characteristic::CurrentTemperature,
///     CharacteristicValue::Number(24.0),
/// )
/// .is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostIntent {
    /// Turn the unit on or off.
    SetActive(bool),
    /// Select a mode by host target-state code.
    SetTargetState(u8),
    /// Set the setpoint directly.
    SetTargetTemperature(f64),
    /// Set the heating threshold.
    SetHeatingThreshold(f64),
    /// Set the cooling threshold.
    SetCoolingThreshold(f64),
    /// Turn vertical swing on or off.
    SetSwingMode(bool),
    /// Set the fan speed percentage.
    SetRotationSpeed(f64),
}

impl HostIntent {
    /// Validates a raw host write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnly`] for read-only characteristics and
    /// [`Error::Value`] for values of the wrong kind or out of range.
    pub fn from_write(characteristic: Characteristic, value: CharacteristicValue) -> Result<Self> {
        let number = |value: CharacteristicValue| value.as_number(characteristic);

        let intent = match characteristic {
            Characteristic::Active => Self::SetActive(value.as_bool(characteristic)?),
            Characteristic::TargetHeaterCoolerState => {
                Self::SetTargetState(value.as_code(characteristic)?)
            }
            Characteristic::TargetTemperature => Self::SetTargetTemperature(number(value)?),
            Characteristic::HeatingThresholdTemperature => {
                Self::SetHeatingThreshold(number(value)?)
            }
            Characteristic::CoolingThresholdTemperature => {
                Self::SetCoolingThreshold(number(value)?)
            }
            Characteristic::SwingMode => Self::SetSwingMode(value.as_bool(characteristic)?),
            Characteristic::RotationSpeed => Self::SetRotationSpeed(number(value)?),
            Characteristic::CurrentTemperature | Characteristic::CurrentHeaterCoolerState => {
                return Err(Error::ReadOnly(characteristic.to_string()));
            }
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Checks numeric payloads against the characteristic's bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the value is not finite or out of range.
    pub fn validate(&self) -> std::result::Result<(), ValueError> {
        let value = match *self {
            Self::SetTargetTemperature(v)
            | Self::SetHeatingThreshold(v)
            | Self::SetCoolingThreshold(v)
            | Self::SetRotationSpeed(v) => v,
            Self::SetActive(_) | Self::SetTargetState(_) | Self::SetSwingMode(_) => return Ok(()),
        };
        match self.characteristic().props() {
            Some(props) => props.validate(value).map(|_| ()),
            None => Ok(()),
        }
    }

    /// The characteristic this intent writes.
    #[must_use]
    pub const fn characteristic(&self) -> Characteristic {
        match self {
            Self::SetActive(_) => Characteristic::Active,
            Self::SetTargetState(_) => Characteristic::TargetHeaterCoolerState,
            Self::SetTargetTemperature(_) => Characteristic::TargetTemperature,
            Self::SetHeatingThreshold(_) => Characteristic::HeatingThresholdTemperature,
            Self::SetCoolingThreshold(_) => Characteristic::CoolingThresholdTemperature,
            Self::SetSwingMode(_) => Characteristic::SwingMode,
            Self::SetRotationSpeed(_) => Characteristic::RotationSpeed,
        }
    }
}
