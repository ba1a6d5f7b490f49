// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::link::DeviceField;
use crate::types::{FanLevel, OperationMode, Power, SwingDirection};

use super::StateChange;

/// Last-known state of the air-conditioner unit.
///
/// Unlike a sparse telemetry cache, every field always has a value: the
/// state starts from conservative defaults so host getters have something
/// to return before the unit first reports in.
///
/// | Field | Default |
/// |-------|---------|
/// | power | `Off` |
/// | current temperature | 20 |
/// | set temperature | 20 |
/// | operation mode | `Auto` |
/// | swing direction | `Fixed` |
/// | fan level | `Auto` |
///
/// # Examples
///
/// ```
/// use aircon_thermostat::state::{DeviceState, StateChange};
///
/// let mut state = DeviceState::new();
/// assert_eq!(state.current_temperature(), 20.0);
///
/// state.apply(&StateChange::CurrentTemperature(24.5));
/// assert_eq!(state.current_temperature(), 24.5);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    power: Power,
    current_temperature: f64,
    set_temperature: f64,
    operation_mode: OperationMode,
    swing_direction: SwingDirection,
    fan_level: FanLevel,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            power: Power::Off,
            current_temperature: Self::DEFAULT_TEMPERATURE,
            set_temperature: Self::DEFAULT_TEMPERATURE,
            operation_mode: OperationMode::Auto,
            swing_direction: SwingDirection::Fixed,
            fan_level: FanLevel::Auto,
        }
    }
}

impl DeviceState {
    /// Temperature assumed for both sensor and setpoint before first contact.
    pub const DEFAULT_TEMPERATURE: f64 = 20.0;

    /// Creates a device state with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the power state.
    #[must_use]
    pub fn power(&self) -> Power {
        self.power
    }

    /// Gets the room temperature measured by the unit.
    #[must_use]
    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    /// Gets the unit's single setpoint.
    #[must_use]
    pub fn set_temperature(&self) -> f64 {
        self.set_temperature
    }

    /// Gets the operation mode.
    #[must_use]
    pub fn operation_mode(&self) -> OperationMode {
        self.operation_mode
    }

    /// Gets the swing direction.
    #[must_use]
    pub fn swing_direction(&self) -> SwingDirection {
        self.swing_direction
    }

    /// Gets the fan level.
    #[must_use]
    pub fn fan_level(&self) -> FanLevel {
        self.fan_level
    }

    /// Returns the current value of `field` as a change.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon_thermostat::link::DeviceField;
    /// use aircon_thermostat::state::{DeviceState, StateChange};
    /// use aircon_thermostat::types::Power;
    ///
    /// let state = DeviceState::new();
    /// assert_eq!(state.value_of(DeviceField::Power), StateChange::Power(Power::Off));
    /// ```
    #[must_use]
    pub fn value_of(&self, field: DeviceField) -> StateChange {
        match field {
            DeviceField::Power => StateChange::Power(self.power),
            DeviceField::CurrentTemperature => {
                StateChange::CurrentTemperature(self.current_temperature)
            }
            DeviceField::SetTemperature => StateChange::SetTemperature(self.set_temperature),
            DeviceField::OperationMode => StateChange::OperationMode(self.operation_mode),
            DeviceField::SwingDirection => StateChange::SwingDirection(self.swing_direction),
            DeviceField::FanLevel => StateChange::FanLevel(self.fan_level),
        }
    }

    /// Applies a state change and returns whether the state actually changed.
    ///
    /// Fields not touched by `change` keep their values, so a partial
    /// notification is merged without loss.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        fn replace<T: PartialEq + Copy>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match *change {
            StateChange::Power(power) => replace(&mut self.power, power),
            StateChange::CurrentTemperature(t) => replace(&mut self.current_temperature, t),
            StateChange::SetTemperature(t) => replace(&mut self.set_temperature, t),
            StateChange::OperationMode(mode) => replace(&mut self.operation_mode, mode),
            StateChange::SwingDirection(dir) => replace(&mut self.swing_direction, dir),
            StateChange::FanLevel(level) => replace(&mut self.fan_level, level),
        }
    }

    /// Applies a sequence of changes, returning `true` if any had an effect.
    pub fn apply_all<'a, I>(&mut self, changes: I) -> bool
    where
        I: IntoIterator<Item = &'a StateChange>,
    {
        let mut any_changed = false;
        for change in changes {
            if self.apply(change) {
                any_changed = true;
            }
        }
        any_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_conservative_defaults() {
        let state = DeviceState::new();
        assert_eq!(state.power(), Power::Off);
        assert_eq!(state.current_temperature(), 20.0);
        assert_eq!(state.set_temperature(), 20.0);
        assert_eq!(state.operation_mode(), OperationMode::Auto);
        assert_eq!(state.swing_direction(), SwingDirection::Fixed);
        assert_eq!(state.fan_level(), FanLevel::Auto);
    }

    #[test]
    fn apply_returns_true_only_on_change() {
        let mut state = DeviceState::new();

        let change = StateChange::OperationMode(OperationMode::Cool);
        assert!(state.apply(&change));
        assert_eq!(state.operation_mode(), OperationMode::Cool);

        // Applying same value returns false
        assert!(!state.apply(&change));
    }

    #[test]
    fn partial_changes_leave_other_fields_alone() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::SetTemperature(24.0));
        state.apply(&StateChange::FanLevel(FanLevel::High));

        state.apply(&StateChange::CurrentTemperature(26.0));

        assert_eq!(state.set_temperature(), 24.0);
        assert_eq!(state.fan_level(), FanLevel::High);
        assert_eq!(state.current_temperature(), 26.0);
    }

    #[test]
    fn apply_all_reports_any_change() {
        let mut state = DeviceState::new();
        let changes = [
            StateChange::Power(Power::Off),
            StateChange::SwingDirection(SwingDirection::SwingUpDown),
        ];
        assert!(state.apply_all(&changes));
        assert!(!state.apply_all(&changes));
        assert_eq!(state.swing_direction(), SwingDirection::SwingUpDown);
    }

    #[test]
    fn value_of_reflects_applied_changes() {
        let mut state = DeviceState::new();
        let changes = [
            StateChange::Power(Power::On),
            StateChange::CurrentTemperature(23.5),
            StateChange::SetTemperature(21.0),
            StateChange::OperationMode(OperationMode::Heat),
            StateChange::SwingDirection(SwingDirection::SwingUpDown),
            StateChange::FanLevel(FanLevel::Turbo),
        ];
        state.apply_all(&changes);
        for change in changes {
            assert_eq!(state.value_of(change.field()), change);
        }
    }
}
