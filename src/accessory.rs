// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A running thermostat accessory.
//!
//! [`Accessory`] wires a [`DeviceLink`] to the reconciliation engine and
//! exposes the result to the host through a [`ThermostatHandle`].
//!
//! # Tasks
//!
//! Starting an accessory spawns:
//!
//! - the engine task, which owns all state
//! - a notification forwarder, from the link to the engine
//! - a command driver, from the engine to the link
//! - optionally, a history sampler
//!
//! All of them are aborted when the accessory is shut down or dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::AccessoryConfig;
use crate::engine::{DEFAULT_QUEUE_CAPACITY, Reconciler, ThermostatHandle, spawn_engine};
use crate::error::Result;
use crate::host::{
    AccessoryInformation, Characteristic, HISTORY_INTERVAL, HistorySink, HostBus,
    spawn_history_sampler,
};
use crate::link::{DeviceLink, spawn_command_driver, spawn_notification_forwarder};
use crate::mapper::HostMapper;

/// Builder for [`Accessory`].
///
/// # Examples
///
/// ```no_run
/// use aircon_thermostat::{Accessory, AccessoryConfig};
/// # use aircon_thermostat::link::{ControlRequest, DeviceLink, StateUpdate};
/// # use aircon_thermostat::error::LinkError;
/// # use tokio::sync::mpsc;
/// # struct TlsLink;
/// # impl DeviceLink for TlsLink {
/// #     async fn connect(&self) -> Result<mpsc::Receiver<StateUpdate>, LinkError> {
/// #         Err(LinkError::NotConnected)
/// #     }
/// #     async fn control(&self, _request: ControlRequest) -> Result<(), LinkError> {
/// #         Ok(())
/// #     }
/// # }
///
/// #[tokio::main]
/// async fn main() -> aircon_thermostat::Result<()> {
///     let config = AccessoryConfig::new("Bedroom", "192.168.1.40", "F8:04:2E:00:00:00", "token");
///     let accessory = Accessory::builder(config).start(TlsLink).await?;
///
///     let handle = accessory.handle();
///     handle
///         .set(aircon_thermostat::Characteristic::CoolingThresholdTemperature, 24.0)
///         .await?;
///     Ok(())
/// }
/// ```
pub struct AccessoryBuilder {
    config: AccessoryConfig,
    mapper: HostMapper,
    bus: Option<HostBus>,
    history: Option<Arc<dyn HistorySink>>,
    history_interval: Duration,
    queue_capacity: usize,
}

impl AccessoryBuilder {
    fn new(config: AccessoryConfig) -> Self {
        Self {
            config,
            mapper: HostMapper::default(),
            bus: None,
            history: None,
            history_interval: HISTORY_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Uses a custom host mapper.
    #[must_use]
    pub fn with_mapper(mut self, mapper: HostMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Publishes host updates on an existing bus.
    ///
    /// Subscribe to the bus before starting to see the bootstrap updates.
    #[must_use]
    pub fn with_host_bus(mut self, bus: HostBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Records history samples to `sink`.
    #[must_use]
    pub fn with_history(mut self, sink: impl HistorySink) -> Self {
        self.history = Some(Arc::new(sink));
        self
    }

    /// Sets the history sampling interval.
    #[must_use]
    pub fn with_history_interval(mut self, interval: Duration) -> Self {
        self.history_interval = interval;
        self
    }

    /// Sets the capacity of the engine's inbound queue.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Connects the link and starts the accessory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for an invalid
    /// configuration and [`Error::Link`](crate::Error::Link) if the link
    /// cannot connect. Nothing is left running on error.
    pub async fn start<L: DeviceLink>(self, link: L) -> Result<Accessory> {
        self.config.validate()?;
        let information = AccessoryInformation::from_config(&self.config);
        let reconciler = Reconciler::new(self.mapper, self.config.reconciler_settings());

        tracing::info!(
            name = %self.config.name,
            address = %self.config.ip_address,
            duid = %information.serial_number,
            "Connecting to unit"
        );
        let link = Arc::new(link);
        let updates = link.connect().await?;

        let bus = self.bus.unwrap_or_default();
        let (handle, commands, engine) = spawn_engine(reconciler, bus, self.queue_capacity);
        let mut tasks = vec![
            engine,
            spawn_notification_forwarder(updates, handle.clone()),
            spawn_command_driver(link, commands, handle.clone()),
        ];
        if let Some(sink) = self.history {
            tasks.push(spawn_history_sampler(
                handle.clone(),
                sink,
                self.history_interval,
            ));
        }

        tracing::info!(name = %information.name, "Accessory started");
        Ok(Accessory {
            information,
            handle,
            tasks,
        })
    }
}

/// A thermostat accessory backed by one air-conditioner unit.
#[derive(Debug)]
pub struct Accessory {
    information: AccessoryInformation,
    handle: ThermostatHandle,
    tasks: Vec<JoinHandle<()>>,
}

impl Accessory {
    /// Creates a builder for the configured unit.
    #[must_use]
    pub fn builder(config: AccessoryConfig) -> AccessoryBuilder {
        AccessoryBuilder::new(config)
    }

    /// Returns the accessory identification.
    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Returns a handle for reading and writing characteristics.
    #[must_use]
    pub fn handle(&self) -> &ThermostatHandle {
        &self.handle
    }

    /// The characteristics this accessory exposes.
    #[must_use]
    pub fn characteristics(&self) -> &'static [Characteristic] {
        &Characteristic::ALL
    }

    /// Stops every task. Pending host writes resolve with
    /// [`Error::EngineStopped`](crate::Error::EngineStopped).
    pub fn shutdown(self) {
        tracing::info!(name = %self.information.name, "Shutting down accessory");
    }
}

impl Drop for Accessory {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
