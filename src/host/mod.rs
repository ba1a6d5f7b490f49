// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The host-facing side of the accessory.
//!
//! The capability host sees the unit as a heater/cooler with the
//! characteristics listed in [`Characteristic`]. Values flow to the host as
//! [`HostUpdate`]s on a [`HostBus`]; reads and writes go through
//! [`ThermostatHandle`](crate::engine::ThermostatHandle).
//!
//! # Examples
//!
//! ```
//! use aircon_thermostat::host::{Characteristic, CharacteristicValue};
//!
//! assert!(!Characteristic::CurrentHeaterCoolerState.is_writable());
//!
//! let value = CharacteristicValue::from(22.5);
//! assert_eq!(value.as_number(Characteristic::TargetTemperature).unwrap(), 22.5);
//! ```

mod bus;
mod characteristic;
mod history;
mod info;

pub use bus::{HostBus, HostUpdate};
pub use characteristic::{
    Characteristic, CharacteristicProps, CharacteristicValue, SETPOINT_MAX, SETPOINT_MIN,
};
pub use history::{HISTORY_INTERVAL, HistorySample, HistorySink, spawn_history_sampler};
pub use info::{AccessoryInformation, MANUFACTURER};
