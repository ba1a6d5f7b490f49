// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure functions deriving thermostat state from device state and thresholds.

use crate::config::{InversionPolicy, ReconcilerSettings};
use crate::state::{DeviceState, ThresholdPair};
use crate::types::{OperatingState, OperationMode};

/// Result of one derivation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    /// What the unit is currently doing.
    pub operating_state: OperatingState,
    /// The single setpoint the unit should run at.
    pub target_setpoint: f64,
}

/// Derives both outputs in one pass.
///
/// `previous` is the setpoint the unit is running at or has been commanded
/// to; it anchors the Auto-mode hysteresis.
#[must_use]
pub fn derive(
    device: &DeviceState,
    thresholds: &ThresholdPair,
    settings: &ReconcilerSettings,
    previous: f64,
) -> Derived {
    Derived {
        operating_state: operating_state(device, thresholds, settings.inversion_policy),
        target_setpoint: target_setpoint(device, thresholds, settings.tolerance, previous),
    }
}

/// Derives the operating state.
///
/// The unit only ever reports power, mode and temperatures, so heating or
/// cooling is inferred from where the room sits relative to the thresholds.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::InversionPolicy;
/// use aircon_thermostat::engine::operating_state;
/// use aircon_thermostat::state::{DeviceState, StateChange, ThresholdPair};
/// use aircon_thermostat::types::{OperatingState, OperationMode, Power};
///
/// let mut device = DeviceState::new();
/// device.apply_all(&[
///     StateChange::Power(Power::On),
///     StateChange::OperationMode(OperationMode::Cool),
///     StateChange::CurrentTemperature(25.0),
/// ]);
///
/// let state = operating_state(&device, &ThresholdPair::new(18.0, 22.0), InversionPolicy::Normalize);
/// assert_eq!(state, OperatingState::Cooling);
/// ```
#[must_use]
pub fn operating_state(
    device: &DeviceState,
    thresholds: &ThresholdPair,
    policy: InversionPolicy,
) -> OperatingState {
    if !device.power().is_on() {
        return OperatingState::Idle;
    }
    let current = device.current_temperature();
    match device.operation_mode() {
        OperationMode::Cool if current > thresholds.max() => OperatingState::Cooling,
        OperationMode::Heat if current < thresholds.min() => OperatingState::Heating,
        OperationMode::Auto
            if policy == InversionPolicy::ReportAutoActive && thresholds.is_inverted() =>
        {
            OperatingState::AutoActive
        }
        OperationMode::Auto if current < thresholds.lo() => OperatingState::Heating,
        OperationMode::Auto if current > thresholds.hi() => OperatingState::Cooling,
        _ => OperatingState::Idle,
    }
}

/// Derives the setpoint to command.
///
/// In Cool and Heat the setpoint is the relevant threshold. In Auto it is
/// clamped to the nearest threshold outside the band; inside the band it
/// follows the room temperature, but only once that has drifted more than
/// `tolerance` away from `previous`. Other modes keep `previous`.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::engine::target_setpoint;
/// use aircon_thermostat::state::{DeviceState, StateChange, ThresholdPair};
///
/// let mut device = DeviceState::new();
/// device.apply(&StateChange::CurrentTemperature(20.5));
/// let band = ThresholdPair::new(18.0, 22.0);
///
/// // Inside the band, within tolerance: keep the previous setpoint
/// assert_eq!(target_setpoint(&device, &band, 1.0, 20.0), 20.0);
///
/// device.apply(&StateChange::CurrentTemperature(21.5));
/// assert_eq!(target_setpoint(&device, &band, 1.0, 20.0), 21.5);
/// ```
#[must_use]
pub fn target_setpoint(
    device: &DeviceState,
    thresholds: &ThresholdPair,
    tolerance: f64,
    previous: f64,
) -> f64 {
    let current = device.current_temperature();
    match device.operation_mode() {
        OperationMode::Cool => thresholds.max(),
        OperationMode::Heat => thresholds.min(),
        OperationMode::Auto => {
            let (lo, hi) = (thresholds.lo(), thresholds.hi());
            if current > hi {
                hi
            } else if current < lo {
                lo
            } else if (current - previous).abs() > tolerance {
                current
            } else {
                previous
            }
        }
        OperationMode::Dry | OperationMode::Wind => previous,
    }
}
