// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A notification from the unit carries only the fields that changed. Each
//! of those fields is decoded into one [`StateChange`], which is then
//! applied to the canonical [`DeviceState`](super::DeviceState).
//!
//! # Examples
//!
//! ```
//! use aircon_thermostat::link::DeviceField;
//! use aircon_thermostat::state::StateChange;
//! use aircon_thermostat::types::OperationMode;
//!
//! let change = StateChange::OperationMode(OperationMode::Heat);
//! assert_eq!(change.field(), DeviceField::OperationMode);
//! assert_eq!(change.wire_value(), "Heat");
//! ```

use crate::link::DeviceField;
use crate::types::{FanLevel, OperationMode, Power, SwingDirection};

/// A change to one field of the device state.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Power switched.
    Power(Power),
    /// Room temperature reading changed.
    CurrentTemperature(f64),
    /// The unit's setpoint changed.
    SetTemperature(f64),
    /// Operation mode changed.
    OperationMode(OperationMode),
    /// Louvre swing changed.
    SwingDirection(SwingDirection),
    /// Fan level changed.
    FanLevel(FanLevel),
}

impl StateChange {
    /// Returns the device field this change touches.
    #[must_use]
    pub const fn field(&self) -> DeviceField {
        match self {
            Self::Power(_) => DeviceField::Power,
            Self::CurrentTemperature(_) => DeviceField::CurrentTemperature,
            Self::SetTemperature(_) => DeviceField::SetTemperature,
            Self::OperationMode(_) => DeviceField::OperationMode,
            Self::SwingDirection(_) => DeviceField::SwingDirection,
            Self::FanLevel(_) => DeviceField::FanLevel,
        }
    }

    /// Returns the value as the unit's protocol spells it.
    #[must_use]
    pub fn wire_value(&self) -> String {
        match self {
            Self::Power(p) => p.as_str().to_string(),
            Self::CurrentTemperature(t) | Self::SetTemperature(t) => format_temperature(*t),
            Self::OperationMode(m) => m.as_str().to_string(),
            Self::SwingDirection(d) => d.as_str().to_string(),
            Self::FanLevel(l) => l.as_str().to_string(),
        }
    }

    /// Returns `true` if this change affects derived thermostat state.
    ///
    /// Swing and fan changes only need their own characteristic refreshed.
    #[must_use]
    pub const fn affects_derived_state(&self) -> bool {
        matches!(
            self,
            Self::Power(_)
                | Self::CurrentTemperature(_)
                | Self::SetTemperature(_)
                | Self::OperationMode(_)
        )
    }
}

/// Formats a temperature without a trailing `.0` for whole degrees.
pub(crate) fn format_temperature(t: f64) -> String {
    if t.fract() == 0.0 && t.abs() < 1e9 {
        format!("{t:.0}")
    } else {
        t.to_string()
    }
}
