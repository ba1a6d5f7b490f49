// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The engine task and the handle used to talk to it.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, LinkError, Result};
use crate::host::{Characteristic, CharacteristicValue, HostBus, HostUpdate};
use crate::link::{CommandId, ControlRequest, StateUpdate};
use crate::mapper::HostMapper;

use super::intent::HostIntent;
use super::reconciler::{Effect, Outcome, Reconciler};
use super::snapshot::ThermostatSnapshot;

/// Default capacity of the engine's inbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Messages processed by the engine, strictly in arrival order.
#[derive(Debug)]
pub(crate) enum EngineMessage {
    Notification(StateUpdate),
    Intent {
        intent: HostIntent,
        respond: oneshot::Sender<Result<()>>,
    },
    CommandCompleted {
        id: CommandId,
        result: std::result::Result<(), LinkError>,
    },
}

/// Cloneable handle to a running engine.
///
/// Reads are served synchronously from a snapshot refreshed after every
/// engine step. Writes are queued to the engine and resolve once the unit
/// has acknowledged the resulting command, or immediately if none was
/// needed.
#[derive(Debug, Clone)]
pub struct ThermostatHandle {
    sender: mpsc::Sender<EngineMessage>,
    snapshot: Arc<RwLock<ThermostatSnapshot>>,
    mapper: HostMapper,
    bus: HostBus,
}

impl ThermostatHandle {
    /// Reads the current host value of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] when reading the target state while the
    /// unit is in a mode the host cannot represent.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        Ok(self.snapshot.read().read(characteristic, &self.mapper)?)
    }

    /// Writes a characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnly`] or [`Error::Value`] for invalid writes,
    /// [`Error::Mapping`] for unknown target state codes, [`Error::Link`] if
    /// the unit did not accept the command, and [`Error::EngineStopped`] if
    /// the engine is gone.
    pub async fn set(
        &self,
        characteristic: Characteristic,
        value: impl Into<CharacteristicValue>,
    ) -> Result<()> {
        let intent = HostIntent::from_write(characteristic, value.into())?;
        self.apply(intent).await
    }

    /// Submits an already-built intent.
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub async fn apply(&self, intent: HostIntent) -> Result<()> {
        let (respond, response) = oneshot::channel();
        self.sender
            .send(EngineMessage::Intent { intent, respond })
            .await
            .map_err(|_| Error::EngineStopped)?;
        response.await.map_err(|_| Error::EngineStopped)?
    }

    /// Queues a device notification for the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineStopped`] if the engine is gone.
    pub async fn notify(&self, update: StateUpdate) -> Result<()> {
        self.sender
            .send(EngineMessage::Notification(update))
            .await
            .map_err(|_| Error::EngineStopped)
    }

    pub(crate) async fn report_completion(
        &self,
        id: CommandId,
        result: std::result::Result<(), LinkError>,
    ) -> Result<()> {
        self.sender
            .send(EngineMessage::CommandCompleted { id, result })
            .await
            .map_err(|_| Error::EngineStopped)
    }

    /// Returns a copy of the engine state as of its last step.
    #[must_use]
    pub fn snapshot(&self) -> ThermostatSnapshot {
        self.snapshot.read().clone()
    }

    /// Subscribes to host updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HostUpdate> {
        self.bus.subscribe()
    }

    /// Returns the host mapper in use.
    #[must_use]
    pub fn mapper(&self) -> &HostMapper {
        &self.mapper
    }

    /// Returns `true` once the engine task has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Spawns the engine task.
///
/// Returns the handle, the queue of commands for the command driver, and the
/// task itself.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::ReconcilerSettings;
/// use aircon_thermostat::engine::{Reconciler, spawn_engine, DEFAULT_QUEUE_CAPACITY};
/// use aircon_thermostat::host::{Characteristic, CharacteristicValue, HostBus};
/// use aircon_thermostat::mapper::HostMapper;
///
/// # #[tokio::main]
/// # async fn main() {
/// let reconciler = Reconciler::new(HostMapper::default(), ReconcilerSettings::default());
/// let (handle, _commands, _task) = spawn_engine(reconciler, HostBus::new(), DEFAULT_QUEUE_CAPACITY);
///
/// let value = handle.get(Characteristic::CurrentTemperature).unwrap();
/// assert_eq!(value, CharacteristicValue::Number(20.0));
/// # }
/// ```
#[must_use]
pub fn spawn_engine(
    reconciler: Reconciler,
    bus: HostBus,
    capacity: usize,
) -> (
    ThermostatHandle,
    mpsc::UnboundedReceiver<ControlRequest>,
    JoinHandle<()>,
) {
    let (sender, receiver) = mpsc::channel(capacity);
    let (commands, command_queue) = mpsc::unbounded_channel();
    let snapshot = Arc::new(RwLock::new(reconciler.snapshot()));

    let handle = ThermostatHandle {
        sender,
        snapshot: Arc::clone(&snapshot),
        mapper: *reconciler.mapper(),
        bus: bus.clone(),
    };

    let engine = Engine {
        reconciler,
        receiver,
        commands,
        snapshot,
        bus,
        waiters: HashMap::new(),
        undelivered: VecDeque::new(),
    };
    let task = tokio::spawn(engine.run());

    (handle, command_queue, task)
}

struct Engine {
    reconciler: Reconciler,
    receiver: mpsc::Receiver<EngineMessage>,
    commands: mpsc::UnboundedSender<ControlRequest>,
    snapshot: Arc<RwLock<ThermostatSnapshot>>,
    bus: HostBus,
    waiters: HashMap<CommandId, oneshot::Sender<Result<()>>>,
    undelivered: VecDeque<CommandId>,
}

impl Engine {
    async fn run(mut self) {
        debug!("Engine started");
        while let Some(message) = self.receiver.recv().await {
            self.handle(message);
            while let Some(id) = self.undelivered.pop_front() {
                self.complete(id, Err(LinkError::ChannelClosed));
            }
        }
        debug!("Engine stopped");
    }

    fn handle(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Notification(update) => match self.reconciler.ingest(&update) {
                Ok(outcome) => self.apply(outcome),
                Err(e) => warn!(error = %e, "Discarding malformed notification"),
            },
            EngineMessage::Intent { intent, respond } => {
                match self.reconciler.apply_intent(intent) {
                    Ok(outcome) => {
                        match outcome.command {
                            Some(id) => {
                                self.waiters.insert(id, respond);
                            }
                            None => {
                                let _ = respond.send(Ok(()));
                            }
                        }
                        self.apply(outcome);
                    }
                    Err(e) => {
                        debug!(?intent, error = %e, "Rejected host write");
                        let _ = respond.send(Err(e));
                    }
                }
            }
            EngineMessage::CommandCompleted { id, result } => self.complete(id, result),
        }
    }

    fn complete(&mut self, id: CommandId, result: std::result::Result<(), LinkError>) {
        let outcome = self.reconciler.complete(id, &result);
        self.apply(outcome);
        if let Some(waiter) = self.waiters.remove(&id) {
            let _ = waiter.send(result.map_err(Error::from));
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        *self.snapshot.write() = self.reconciler.snapshot();
        for effect in outcome.effects {
            match effect {
                Effect::Publish(update) => self.bus.publish(update),
                Effect::Command(request) => {
                    let id = request.id();
                    if self.commands.send(request).is_err() {
                        warn!(command = %id, "Command driver is not running");
                        self.undelivered.push_back(id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconcilerSettings;
    use crate::state::{StateChange, ThresholdPair};
    use crate::types::{OperationMode, Power};

    fn start() -> (
        ThermostatHandle,
        mpsc::UnboundedReceiver<ControlRequest>,
        JoinHandle<()>,
    ) {
        let reconciler = Reconciler::new(HostMapper::default(), ReconcilerSettings::default());
        spawn_engine(reconciler, HostBus::new(), DEFAULT_QUEUE_CAPACITY)
    }

    /// Waits until the engine publishes `characteristic`.
    async fn wait_for(
        rx: &mut broadcast::Receiver<HostUpdate>,
        characteristic: Characteristic,
    ) -> CharacteristicValue {
        loop {
            let update = rx.recv().await.unwrap();
            if update.characteristic == characteristic {
                return update.value;
            }
        }
    }

    async fn bootstrap(handle: &ThermostatHandle, mode: OperationMode, current: f64, set: f64) {
        let mut rx = handle.subscribe();
        let update = [
            StateChange::Power(Power::On),
            StateChange::OperationMode(mode),
            StateChange::CurrentTemperature(current),
            StateChange::SetTemperature(set),
        ]
        .into_iter()
        .collect();
        handle.notify(update).await.unwrap();
        wait_for(&mut rx, Characteristic::TargetTemperature).await;
    }

    #[tokio::test]
    async fn getters_read_defaults_before_first_notification() {
        let (handle, _commands, _task) = start();
        assert_eq!(
            handle.get(Characteristic::TargetTemperature).unwrap(),
            CharacteristicValue::Number(20.0)
        );
        assert_eq!(
            handle.get(Characteristic::Active).unwrap(),
            CharacteristicValue::Bool(false)
        );
        assert!(!handle.snapshot().bootstrapped);
    }

    #[tokio::test]
    async fn notification_updates_snapshot() {
        let (handle, _commands, _task) = start();
        bootstrap(&handle, OperationMode::Cool, 25.0, 22.0).await;

        let snapshot = handle.snapshot();
        assert!(snapshot.bootstrapped);
        assert_eq!(snapshot.thresholds, ThresholdPair::new(20.0, 24.0));
        assert_eq!(
            handle.get(Characteristic::CurrentHeaterCoolerState).unwrap(),
            CharacteristicValue::Code(3)
        );
    }

    #[tokio::test]
    async fn set_resolves_after_completion() {
        let (handle, mut commands, _task) = start();
        bootstrap(&handle, OperationMode::Cool, 21.0, 22.0).await;

        let writer = handle.clone();
        let set = tokio::spawn(async move {
            writer
                .set(Characteristic::CoolingThresholdTemperature, 25.0)
                .await
        });

        let request = commands.recv().await.unwrap();
        assert_eq!(request.change(), StateChange::SetTemperature(25.0));
        handle.report_completion(request.id(), Ok(())).await.unwrap();

        set.await.unwrap().unwrap();
        assert_eq!(handle.snapshot().thresholds.max(), 25.0);
    }

    #[tokio::test]
    async fn set_returns_link_failure() {
        let (handle, mut commands, _task) = start();
        bootstrap(&handle, OperationMode::Cool, 21.0, 22.0).await;

        let writer = handle.clone();
        let set = tokio::spawn(async move {
            writer
                .set(Characteristic::CoolingThresholdTemperature, 25.0)
                .await
        });

        let request = commands.recv().await.unwrap();
        handle
            .report_completion(request.id(), Err(LinkError::Timeout(3000)))
            .await
            .unwrap();

        let err = set.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Link(LinkError::Timeout(3000))));
        assert_eq!(handle.snapshot().thresholds.max(), 24.0);
    }

    #[tokio::test]
    async fn set_without_command_resolves_immediately() {
        let (handle, mut commands, _task) = start();
        bootstrap(&handle, OperationMode::Auto, 20.0, 20.0).await;

        handle
            .set(Characteristic::TargetTemperature, 20.0)
            .await
            .unwrap();
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_writes_fail_before_reaching_engine() {
        let (handle, _commands, _task) = start();
        assert!(matches!(
            handle.set(Characteristic::CurrentTemperature, 21.0).await,
            Err(Error::ReadOnly(_))
        ));
        assert!(matches!(
            handle.set(Characteristic::RotationSpeed, 150.0).await,
            Err(Error::Value(_))
        ));
    }

    #[tokio::test]
    async fn commands_fail_when_driver_is_gone() {
        let (handle, commands, _task) = start();
        drop(commands);
        bootstrap(&handle, OperationMode::Auto, 20.0, 20.0).await;

        let err = handle
            .set(Characteristic::Active, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Link(LinkError::ChannelClosed)));
    }

    #[tokio::test]
    async fn stopped_engine_is_reported() {
        let (handle, _commands, task) = start();
        task.abort();
        let _ = task.await;
        assert!(handle.is_closed());
        assert!(matches!(
            handle.set(Characteristic::Active, true).await,
            Err(Error::EngineStopped)
        ));
    }
}
