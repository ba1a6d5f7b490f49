// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation state types.
//!
//! [`DeviceState`] holds the last-known state reported by the unit. It is
//! only ever changed by applying [`StateChange`]s decoded from device
//! notifications. [`ThresholdPair`] holds the locally owned heating and
//! cooling thresholds.
//!
//! # Examples
//!
//! ```
//! use aircon_thermostat::state::{DeviceState, StateChange};
//! use aircon_thermostat::types::Power;
//!
//! let mut state = DeviceState::new();
//! assert_eq!(state.power(), Power::Off);
//!
//! assert!(state.apply(&StateChange::Power(Power::On)));
//! assert_eq!(state.power(), Power::On);
//! ```

mod device_state;
mod state_change;
mod thresholds;

pub use device_state::DeviceState;
pub use state_change::StateChange;
pub use thresholds::ThresholdPair;
