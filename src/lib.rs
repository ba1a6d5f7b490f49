// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `aircon_thermostat` - thermostat reconciliation for single-setpoint
//! air conditioners.
//!
//! Network-controlled air conditioners expose one setpoint. Home-automation
//! hosts model a heater/cooler with a heating threshold and a cooling
//! threshold. This crate keeps the two consistent: it owns the threshold
//! pair, derives the operating state and the setpoint to command from it,
//! and suppresses commands that would only echo what the unit already runs.
//!
//! # Architecture
//!
//! - [`link`]: the device side; a [`DeviceLink`](link::DeviceLink) delivers
//!   partial state notifications and carries control requests
//! - [`engine`]: the reconciliation core and the task that runs it
//! - [`host`]: the host side; characteristics, update bus, history
//! - [`mapper`]: value translation between the two sides
//! - [`Accessory`]: wires a link, the engine and the host together
//!
//! # Quick Start
//!
//! ```no_run
//! use aircon_thermostat::{Accessory, AccessoryConfig, Characteristic};
//! # use aircon_thermostat::link::{ControlRequest, DeviceLink, StateUpdate};
//! # use aircon_thermostat::error::LinkError;
//! # use tokio::sync::mpsc;
//! # struct TlsLink;
//! # impl DeviceLink for TlsLink {
//! #     async fn connect(&self) -> Result<mpsc::Receiver<StateUpdate>, LinkError> {
//! #         Err(LinkError::NotConnected)
//! #     }
//! #     async fn control(&self, _request: ControlRequest) -> Result<(), LinkError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> aircon_thermostat::Result<()> {
//!     let config = AccessoryConfig::from_json(r#"{
//!         "name": "Living Room",
//!         "ip_address": "192.168.1.40",
//!         "mac": "F8:04:2E:00:00:00",
//!         "token": "secret",
//!         "tolerance": 0.5
//!     }"#)?;
//!
//!     let accessory = Accessory::builder(config).start(TlsLink).await?;
//!     let handle = accessory.handle();
//!
//!     // Host updates stream out on the bus
//!     let mut updates = handle.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(update) = updates.recv().await {
//!             println!("{} = {:?}", update.characteristic, update.value);
//!         }
//!     });
//!
//!     // Widen the comfort band
//!     handle.set(Characteristic::HeatingThresholdTemperature, 19.0).await?;
//!     handle.set(Characteristic::CoolingThresholdTemperature, 25.0).await?;
//!
//!     println!("now {:?}", handle.get(Characteristic::CurrentHeaterCoolerState)?);
//!     Ok(())
//! }
//! ```

mod accessory;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod link;
pub mod mapper;
pub mod state;
pub mod types;

pub use accessory::{Accessory, AccessoryBuilder};
pub use config::{AccessoryConfig, InversionPolicy, ReconcilerSettings, SetpointPublish};
pub use engine::{HostIntent, Reconciler, ThermostatHandle, ThermostatSnapshot};
pub use error::{ConfigError, Error, LinkError, MappingError, ParseError, Result, ValueError};
pub use host::{
    AccessoryInformation, Characteristic, CharacteristicValue, HistorySample, HistorySink,
    HostBus, HostUpdate,
};
pub use link::{ControlRequest, DeviceLink, StateUpdate};
pub use mapper::{HostEnumTable, HostMapper};
pub use state::{DeviceState, ThresholdPair};
pub use types::{FanLevel, OperatingState, OperationMode, Power, SwingDirection};
