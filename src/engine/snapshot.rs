// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-time copy of the engine state for synchronous reads.

use crate::error::MappingError;
use crate::host::{Characteristic, CharacteristicValue};
use crate::mapper::HostMapper;
use crate::state::{DeviceState, ThresholdPair};
use crate::types::OperatingState;

/// Everything a host getter can ask for.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ThermostatSnapshot {
    /// Last-known device state.
    pub device: DeviceState,
    /// Current threshold pair.
    pub thresholds: ThresholdPair,
    /// Last derived operating state.
    pub operating_state: OperatingState,
    /// Last target temperature published to the host.
    pub target_temperature: f64,
    /// Whether the first notification has been processed.
    pub bootstrapped: bool,
}

impl ThermostatSnapshot {
    /// Reads the host value of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NoHostTargetState`] when reading the target
    /// state while the unit runs in a mode the host cannot represent.
    pub fn read(
        &self,
        characteristic: Characteristic,
        mapper: &HostMapper,
    ) -> Result<CharacteristicValue, MappingError> {
        let value = match characteristic {
            Characteristic::Active => {
                CharacteristicValue::Bool(HostMapper::active_from_power(self.device.power()))
            }
            Characteristic::CurrentTemperature => {
                CharacteristicValue::Number(self.device.current_temperature())
            }
            Characteristic::TargetTemperature => {
                CharacteristicValue::Number(self.target_temperature)
            }
            Characteristic::CoolingThresholdTemperature => {
                CharacteristicValue::Number(self.thresholds.max())
            }
            Characteristic::HeatingThresholdTemperature => {
                CharacteristicValue::Number(self.thresholds.min())
            }
            Characteristic::TargetHeaterCoolerState => CharacteristicValue::Code(
                mapper.target_state_from_mode(self.device.operation_mode())?,
            ),
            Characteristic::CurrentHeaterCoolerState => {
                CharacteristicValue::Code(mapper.current_state_code(self.operating_state))
            }
            Characteristic::SwingMode => CharacteristicValue::Bool(
                HostMapper::swing_from_direction(self.device.swing_direction()),
            ),
            Characteristic::RotationSpeed => CharacteristicValue::Number(
                HostMapper::rotation_speed_from_fan_level(self.device.fan_level()),
            ),
        };
        Ok(value)
    }
}
