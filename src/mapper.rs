// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translations between device-domain and host-domain values.
//!
//! The host platform identifies target and current thermostat states by
//! numeric codes. Those codes are supplied once, as a [`HostEnumTable`], when
//! the [`HostMapper`] is built; there is no module-level state to initialise.
//!
//! # Examples
//!
//! ```
//! use aircon_thermostat::mapper::HostMapper;
//! use aircon_thermostat::types::{FanLevel, OperationMode};
//!
//! let mapper = HostMapper::default();
//!
//! let code = mapper.target_state_from_mode(OperationMode::Cool).unwrap();
//! assert_eq!(mapper.mode_from_target_state(code).unwrap(), OperationMode::Cool);
//!
//! assert_eq!(HostMapper::rotation_speed_from_fan_level(FanLevel::Mid), 60.0);
//! assert_eq!(HostMapper::fan_level_from_rotation_speed(45.0).unwrap(), FanLevel::Mid);
//! ```

use crate::error::MappingError;
use crate::host::{Characteristic, CharacteristicValue, HostUpdate};
use crate::state::StateChange;
use crate::types::{FanLevel, OperatingState, OperationMode, Power, SwingDirection};

/// Host codes for thermostat target and current states.
///
/// The default matches the `HeaterCooler` service: target `AUTO=0`,
/// `HEAT=1`, `COOL=2`; current `INACTIVE=0`, `IDLE=1`, `HEATING=2`,
/// `COOLING=3`. The service has no code for an inverted-threshold auto
/// state, so `current_auto_active` defaults to `INACTIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEnumTable {
    /// Target state code for Auto.
    pub target_auto: u8,
    /// Target state code for Heat.
    pub target_heat: u8,
    /// Target state code for Cool.
    pub target_cool: u8,
    /// Current state code for Idle.
    pub current_idle: u8,
    /// Current state code for Heating.
    pub current_heating: u8,
    /// Current state code for Cooling.
    pub current_cooling: u8,
    /// Current state code for `AutoActive`.
    pub current_auto_active: u8,
}

impl Default for HostEnumTable {
    fn default() -> Self {
        Self {
            target_auto: 0,
            target_heat: 1,
            target_cool: 2,
            current_idle: 1,
            current_heating: 2,
            current_cooling: 3,
            current_auto_active: 0,
        }
    }
}

/// Stateless translator between device and host values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostMapper {
    table: HostEnumTable,
}

impl HostMapper {
    /// Creates a mapper for the given host code table.
    #[must_use]
    pub const fn new(table: HostEnumTable) -> Self {
        Self { table }
    }

    /// Returns the host code table.
    #[must_use]
    pub const fn table(&self) -> &HostEnumTable {
        &self.table
    }

    /// Maps an operation mode to its host target-state code.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NoHostTargetState`] for `Dry` and `Wind`.
    pub fn target_state_from_mode(&self, mode: OperationMode) -> Result<u8, MappingError> {
        match mode {
            OperationMode::Cool => Ok(self.table.target_cool),
            OperationMode::Heat => Ok(self.table.target_heat),
            OperationMode::Auto => Ok(self.table.target_auto),
            OperationMode::Dry | OperationMode::Wind => {
                Err(MappingError::NoHostTargetState(mode.to_string()))
            }
        }
    }

    /// Maps a host target-state code to an operation mode.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownTargetState`] for codes not in the table.
    pub fn mode_from_target_state(&self, code: u8) -> Result<OperationMode, MappingError> {
        let t = &self.table;
        if code == t.target_cool {
            Ok(OperationMode::Cool)
        } else if code == t.target_heat {
            Ok(OperationMode::Heat)
        } else if code == t.target_auto {
            Ok(OperationMode::Auto)
        } else {
            Err(MappingError::UnknownTargetState(code))
        }
    }

    /// Maps a derived operating state to its host current-state code.
    #[must_use]
    pub const fn current_state_code(&self, state: OperatingState) -> u8 {
        match state {
            OperatingState::Idle => self.table.current_idle,
            OperatingState::Heating => self.table.current_heating,
            OperatingState::Cooling => self.table.current_cooling,
            OperatingState::AutoActive => self.table.current_auto_active,
        }
    }

    /// Maps a fan level to a rotation-speed percentage.
    #[must_use]
    pub const fn rotation_speed_from_fan_level(level: FanLevel) -> f64 {
        match level {
            FanLevel::Auto => 0.0,
            FanLevel::Low => 30.0,
            FanLevel::Mid => 60.0,
            FanLevel::High => 90.0,
            FanLevel::Turbo => 100.0,
        }
    }

    /// Maps a rotation-speed percentage to a fan level.
    ///
    /// Total over `[0, 100]`: `0` is `Auto`, then bands up to 30, 60 and 90,
    /// and anything above 90 is `Turbo`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::RotationSpeedOutOfRange`] outside `[0, 100]`
    /// or for NaN.
    pub fn fan_level_from_rotation_speed(speed: f64) -> Result<FanLevel, MappingError> {
        if !(0.0..=100.0).contains(&speed) {
            return Err(MappingError::RotationSpeedOutOfRange(speed));
        }
        Ok(if speed <= 0.0 {
            FanLevel::Auto
        } else if speed <= 30.0 {
            FanLevel::Low
        } else if speed <= 60.0 {
            FanLevel::Mid
        } else if speed <= 90.0 {
            FanLevel::High
        } else {
            FanLevel::Turbo
        })
    }

    /// Maps the power state to the host `Active` flag.
    #[must_use]
    pub const fn active_from_power(power: Power) -> bool {
        power.is_on()
    }

    /// Maps the host `Active` flag to a power state.
    #[must_use]
    pub fn power_from_active(active: bool) -> Power {
        Power::from(active)
    }

    /// Maps a swing direction to the host swing flag.
    #[must_use]
    pub const fn swing_from_direction(direction: SwingDirection) -> bool {
        direction.is_swinging()
    }

    /// Maps the host swing flag to a swing direction.
    #[must_use]
    pub fn direction_from_swing(swinging: bool) -> SwingDirection {
        SwingDirection::from(swinging)
    }

    /// Maps a device field change to the host characteristic it drives.
    ///
    /// Setpoint changes return `None`: the host target temperature is always
    /// the derived setpoint, never the raw device value.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the value has no host representation.
    pub fn host_update(&self, change: &StateChange) -> Result<Option<HostUpdate>, MappingError> {
        let update = match *change {
            StateChange::Power(power) => HostUpdate::new(
                Characteristic::Active,
                CharacteristicValue::Bool(Self::active_from_power(power)),
            ),
            StateChange::CurrentTemperature(t) => HostUpdate::new(
                Characteristic::CurrentTemperature,
                CharacteristicValue::Number(t),
            ),
            StateChange::SetTemperature(_) => return Ok(None),
            StateChange::OperationMode(mode) => HostUpdate::new(
                Characteristic::TargetHeaterCoolerState,
                CharacteristicValue::Code(self.target_state_from_mode(mode)?),
            ),
            StateChange::SwingDirection(direction) => HostUpdate::new(
                Characteristic::SwingMode,
                CharacteristicValue::Bool(Self::swing_from_direction(direction)),
            ),
            StateChange::FanLevel(level) => HostUpdate::new(
                Characteristic::RotationSpeed,
                CharacteristicValue::Number(Self::rotation_speed_from_fan_level(level)),
            ),
        };
        Ok(Some(update))
    }
}
