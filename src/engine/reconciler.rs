// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The synchronous reconciliation core.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::{InversionPolicy, ReconcilerSettings, SetpointPublish};
use crate::error::{LinkError, ParseError, Result};
use crate::host::{Characteristic, CharacteristicValue, HostUpdate, SETPOINT_MAX, SETPOINT_MIN};
use crate::link::{CommandId, ControlRequest, StateUpdate};
use crate::mapper::HostMapper;
use crate::state::{DeviceState, StateChange, ThresholdPair};
use crate::types::{OperatingState, OperationMode};

use super::derive::{derive, operating_state};
use super::intent::{HostIntent, ThresholdBound};
use super::snapshot::ThermostatSnapshot;

/// Something the engine must do after a reconciliation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Push a value to the host.
    Publish(HostUpdate),
    /// Send a request to the unit.
    Command(ControlRequest),
}

/// The effects of one reconciliation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Effects in the order they must be applied.
    pub effects: Vec<Effect>,
    /// The command issued by this step, if any.
    pub command: Option<CommandId>,
}

impl Outcome {
    fn publish(&mut self, characteristic: Characteristic, value: CharacteristicValue) {
        self.effects
            .push(Effect::Publish(HostUpdate::new(characteristic, value)));
    }

    /// Iterates over the commands in this outcome.
    pub fn commands(&self) -> impl Iterator<Item = &ControlRequest> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Command(request) => Some(request),
            Effect::Publish(_) => None,
        })
    }

    /// Iterates over the host updates in this outcome.
    pub fn publications(&self) -> impl Iterator<Item = &HostUpdate> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Publish(update) => Some(update),
            Effect::Command(_) => None,
        })
    }

    /// Returns the last value published for `characteristic`.
    #[must_use]
    pub fn published(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::Publish(update) if update.characteristic == characteristic => {
                Some(update.value)
            }
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Rollback {
    before: ThresholdPair,
    after: ThresholdPair,
}

#[derive(Debug, Clone, Copy)]
struct PendingCommand {
    change: StateChange,
    rollback: Option<Rollback>,
}

fn same_temperature(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Reconciles the unit's single setpoint with the host's threshold pair.
///
/// Owns the device state, the thresholds and the bookkeeping for commands
/// in flight. Every operation returns an [`Outcome`] listing host updates
/// and device commands; nothing here performs I/O, so the same core runs
/// inside the engine task and in tests.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::ReconcilerSettings;
/// use aircon_thermostat::engine::Reconciler;
/// use aircon_thermostat::link::StateUpdate;
/// use aircon_thermostat::mapper::HostMapper;
///
/// let mut reconciler = Reconciler::new(HostMapper::default(), ReconcilerSettings::default());
///
/// let update = StateUpdate::from_json(r#"{"AC_FUN_TEMPSET":"24","AC_FUN_TEMPNOW":"26"}"#).unwrap();
/// let outcome = reconciler.ingest(&update).unwrap();
///
/// // The first notification seeds the thresholds around the reported setpoint
/// assert_eq!(reconciler.thresholds().min(), 22.0);
/// assert_eq!(reconciler.thresholds().max(), 26.0);
/// assert_eq!(outcome.commands().count(), 0);
/// ```
#[derive(Debug)]
pub struct Reconciler {
    mapper: HostMapper,
    settings: ReconcilerSettings,
    device: DeviceState,
    thresholds: ThresholdPair,
    awaiting_bootstrap: bool,
    operating_state: OperatingState,
    host_target: f64,
    in_flight_setpoint: Option<f64>,
    pending: HashMap<CommandId, PendingCommand>,
}

impl Reconciler {
    /// Creates a reconciler that has not yet heard from the unit.
    #[must_use]
    pub fn new(mapper: HostMapper, settings: ReconcilerSettings) -> Self {
        let device = DeviceState::new();
        Self {
            mapper,
            settings,
            host_target: device.set_temperature(),
            device,
            thresholds: ThresholdPair::default(),
            awaiting_bootstrap: true,
            operating_state: OperatingState::Idle,
            in_flight_setpoint: None,
            pending: HashMap::new(),
        }
    }

    /// Returns the host mapper.
    #[must_use]
    pub fn mapper(&self) -> &HostMapper {
        &self.mapper
    }

    /// Returns the engine settings.
    #[must_use]
    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Returns the last-known device state.
    #[must_use]
    pub fn device(&self) -> &DeviceState {
        &self.device
    }

    /// Returns the threshold pair.
    #[must_use]
    pub fn thresholds(&self) -> ThresholdPair {
        self.thresholds
    }

    /// Returns the last derived operating state.
    #[must_use]
    pub fn operating_state(&self) -> OperatingState {
        self.operating_state
    }

    /// Returns the last target temperature published to the host.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.host_target
    }

    /// Returns `true` once the first notification has been processed.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        !self.awaiting_bootstrap
    }

    /// Returns the number of commands awaiting completion.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// The setpoint the unit runs at, or has been commanded to and not yet
    /// echoed.
    #[must_use]
    pub fn effective_setpoint(&self) -> f64 {
        self.in_flight_setpoint
            .unwrap_or_else(|| self.device.set_temperature())
    }

    /// Copies the state host getters need.
    #[must_use]
    pub fn snapshot(&self) -> ThermostatSnapshot {
        ThermostatSnapshot {
            device: self.device.clone(),
            thresholds: self.thresholds,
            operating_state: self.operating_state,
            target_temperature: self.host_target,
            bootstrapped: !self.awaiting_bootstrap,
        }
    }

    /// Applies a device notification.
    ///
    /// Each reported field is republished to the host. The first
    /// notification seeds the thresholds and publishes the derived operating
    /// state and target without commanding the unit. Later ones re-derive
    /// both and command a new setpoint when the derived one differs from the
    /// effective setpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if any tracked field is invalid; the state is
    /// left untouched.
    pub fn ingest(&mut self, update: &StateUpdate) -> std::result::Result<Outcome, ParseError> {
        let changes = update.to_state_changes()?;
        let mut out = Outcome::default();
        if changes.is_empty() {
            debug!("Notification carried no tracked fields");
            return Ok(out);
        }
        debug!(fields = changes.len(), "Ingesting notification");

        for change in &changes {
            self.device.apply(change);
            if let StateChange::SetTemperature(reported) = *change
                && let Some(commanded) = self.in_flight_setpoint.take()
            {
                debug!(commanded, reported, "Setpoint reported by unit");
            }
            match self.mapper.host_update(change) {
                Ok(Some(update)) => out.effects.push(Effect::Publish(update)),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "Device value has no host representation"),
            }
        }

        if self.awaiting_bootstrap {
            self.bootstrap(&mut out);
        } else {
            self.normalize_auto_thresholds(&mut out);
            self.reconcile(None, &mut out);
        }
        Ok(out)
    }

    /// Applies a host write.
    ///
    /// At most one command is issued; its ID is returned in
    /// [`Outcome::command`] so the caller can wait for its completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`](crate::Error::Value) for out-of-range values
    /// and [`Error::Mapping`](crate::Error::Mapping) for unknown target
    /// state codes. Nothing is changed on error.
    pub fn apply_intent(&mut self, intent: HostIntent) -> Result<Outcome> {
        intent.validate()?;
        let mut out = Outcome::default();
        match intent {
            HostIntent::SetActive(active) => {
                let power = HostMapper::power_from_active(active);
                self.command(StateChange::Power(power), None, &mut out);
            }
            HostIntent::SetTargetState(code) => {
                let mode = self.mapper.mode_from_target_state(code)?;
                self.command(StateChange::OperationMode(mode), None, &mut out);
            }
            HostIntent::SetTargetTemperature(t) => match self.device.operation_mode() {
                OperationMode::Cool => self.adjust_threshold(ThresholdBound::Cooling, t, &mut out),
                OperationMode::Heat => self.adjust_threshold(ThresholdBound::Heating, t, &mut out),
                OperationMode::Auto | OperationMode::Dry | OperationMode::Wind => {
                    self.set_setpoint(t, &mut out);
                }
            },
            HostIntent::SetHeatingThreshold(t) => {
                self.adjust_threshold(ThresholdBound::Heating, t, &mut out);
            }
            HostIntent::SetCoolingThreshold(t) => {
                self.adjust_threshold(ThresholdBound::Cooling, t, &mut out);
            }
            HostIntent::SetSwingMode(swinging) => {
                let direction = HostMapper::direction_from_swing(swinging);
                self.command(StateChange::SwingDirection(direction), None, &mut out);
            }
            HostIntent::SetRotationSpeed(speed) => {
                let level = HostMapper::fan_level_from_rotation_speed(speed)?;
                self.command(StateChange::FanLevel(level), None, &mut out);
            }
        }
        Ok(out)
    }

    /// Records the completion of a command.
    ///
    /// Success changes nothing: the device state moves only when the unit
    /// reports the new value. On failure the host-visible value is restored
    /// and a threshold edit that triggered the command is rolled back, unless
    /// the thresholds have changed again since.
    pub fn complete(
        &mut self,
        id: CommandId,
        result: &std::result::Result<(), LinkError>,
    ) -> Outcome {
        let mut out = Outcome::default();
        let Some(pending) = self.pending.remove(&id) else {
            warn!(command = %id, "Completion for unknown command");
            return out;
        };

        match result {
            Ok(()) => debug!(command = %id, change = ?pending.change, "Unit accepted command"),
            Err(err) => {
                warn!(command = %id, change = ?pending.change, error = %err, "Unit command failed");
                self.revert(pending, &mut out);
            }
        }
        out
    }

    fn bootstrap(&mut self, out: &mut Outcome) {
        let setpoint = self.device.set_temperature();
        self.thresholds = ThresholdPair::around(setpoint, self.settings.bootstrap_band)
            .clamped(SETPOINT_MIN, SETPOINT_MAX);
        self.awaiting_bootstrap = false;
        info!(
            setpoint,
            min = self.thresholds.min(),
            max = self.thresholds.max(),
            "Seeded thresholds from reported setpoint"
        );

        self.publish_thresholds(out);
        // The derived target is shown at once; the unit is only commanded
        // from the next notification on.
        let derived = derive(
            &self.device,
            &self.thresholds,
            &self.settings,
            self.effective_setpoint(),
        );
        self.set_operating_state(derived.operating_state, out);
        self.publish_target(derived.target_setpoint, out);
    }

    fn normalize_auto_thresholds(&mut self, out: &mut Outcome) {
        if self.device.operation_mode() == OperationMode::Auto
            && self.settings.inversion_policy == InversionPolicy::Normalize
            && self.thresholds.is_inverted()
        {
            self.thresholds = self.thresholds.normalized();
            info!(
                min = self.thresholds.min(),
                max = self.thresholds.max(),
                "Normalized inverted thresholds"
            );
            self.publish_thresholds(out);
        }
    }

    fn adjust_threshold(&mut self, bound: ThresholdBound, value: f64, out: &mut Outcome) {
        let before = self.thresholds;
        let mut after = match bound {
            ThresholdBound::Heating => before.with_min(value),
            ThresholdBound::Cooling => before.with_max(value),
        };
        let auto = self.device.operation_mode() == OperationMode::Auto;
        if auto && self.settings.inversion_policy == InversionPolicy::Normalize {
            after = after.normalized();
        }
        self.thresholds = after;
        debug!(?bound, value, min = after.min(), max = after.max(), "Threshold adjusted");

        if auto {
            self.publish_thresholds(out);
        } else {
            let stored = match bound {
                ThresholdBound::Heating => after.min(),
                ThresholdBound::Cooling => after.max(),
            };
            out.publish(bound.characteristic(), CharacteristicValue::Number(stored));
        }
        self.reconcile(Some(Rollback { before, after }), out);
    }

    fn set_setpoint(&mut self, value: f64, out: &mut Outcome) {
        if same_temperature(value, self.effective_setpoint()) {
            debug!(value, "Setpoint already requested");
            self.refresh_target(out);
        } else {
            self.command_setpoint(value, None, out);
        }
    }

    fn reconcile(&mut self, rollback: Option<Rollback>, out: &mut Outcome) {
        let reference = self.effective_setpoint();
        let derived = derive(&self.device, &self.thresholds, &self.settings, reference);
        self.set_operating_state(derived.operating_state, out);

        if same_temperature(derived.target_setpoint, reference) {
            self.refresh_target(out);
        } else {
            self.command_setpoint(derived.target_setpoint, rollback, out);
        }
    }

    fn command_setpoint(&mut self, value: f64, rollback: Option<Rollback>, out: &mut Outcome) {
        self.in_flight_setpoint = Some(value);
        if self.settings.setpoint_publish == SetpointPublish::Optimistic {
            self.publish_target(value, out);
        }
        self.command(StateChange::SetTemperature(value), rollback, out);
    }

    fn command(&mut self, change: StateChange, rollback: Option<Rollback>, out: &mut Outcome) {
        let request = ControlRequest::new(change);
        debug!(command = %request.id(), %request, "Queueing unit command");
        self.pending
            .insert(request.id(), PendingCommand { change, rollback });
        out.command = Some(request.id());
        out.effects.push(Effect::Command(request));
    }

    fn revert(&mut self, pending: PendingCommand, out: &mut Outcome) {
        if let Some(rollback) = pending.rollback {
            if self.thresholds == rollback.after {
                self.thresholds = rollback.before;
                info!(
                    min = self.thresholds.min(),
                    max = self.thresholds.max(),
                    "Rolled back thresholds"
                );
                self.publish_thresholds(out);
            } else {
                debug!("Thresholds changed since the failed command, keeping them");
            }
        }

        if let StateChange::SetTemperature(commanded) = pending.change {
            if self
                .in_flight_setpoint
                .is_some_and(|t| same_temperature(t, commanded))
            {
                self.in_flight_setpoint = None;
            }
            let state = operating_state(
                &self.device,
                &self.thresholds,
                self.settings.inversion_policy,
            );
            self.set_operating_state(state, out);
            self.refresh_target(out);
        } else {
            let current = self.device.value_of(pending.change.field());
            match self.mapper.host_update(&current) {
                Ok(Some(update)) => out.effects.push(Effect::Publish(update)),
                Ok(None) => {}
                Err(err) => debug!(error = %err, "Cannot restore host value"),
            }
        }
    }

    fn publish_thresholds(&self, out: &mut Outcome) {
        out.publish(
            Characteristic::HeatingThresholdTemperature,
            CharacteristicValue::Number(self.thresholds.min()),
        );
        out.publish(
            Characteristic::CoolingThresholdTemperature,
            CharacteristicValue::Number(self.thresholds.max()),
        );
    }

    fn set_operating_state(&mut self, state: OperatingState, out: &mut Outcome) {
        if state != self.operating_state {
            debug!(from = %self.operating_state, to = %state, "Operating state changed");
        }
        self.operating_state = state;
        out.publish(
            Characteristic::CurrentHeaterCoolerState,
            CharacteristicValue::Code(self.mapper.current_state_code(state)),
        );
    }

    /// Republishes the effective setpoint, holding back an unechoed one
    /// under [`SetpointPublish::AwaitEcho`].
    fn refresh_target(&mut self, out: &mut Outcome) {
        if self.settings.setpoint_publish == SetpointPublish::AwaitEcho
            && self.in_flight_setpoint.is_some()
        {
            return;
        }
        self.publish_target(self.effective_setpoint(), out);
    }

    fn publish_target(&mut self, value: f64, out: &mut Outcome) {
        self.host_target = value;
        out.publish(
            Characteristic::TargetTemperature,
            CharacteristicValue::Number(value),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::derive::target_setpoint;
    use super::*;
    use crate::error::{Error, MappingError};
    use crate::link::DeviceField;
    use crate::types::Power;

    fn reconciler(settings: ReconcilerSettings) -> Reconciler {
        Reconciler::new(HostMapper::default(), settings)
    }

    fn notification(changes: &[StateChange]) -> StateUpdate {
        changes.iter().copied().collect()
    }

    /// Bootstraps a reconciler with the unit on, in `mode`, at `current`
    /// with setpoint `set`.
    fn bootstrapped(
        settings: ReconcilerSettings,
        mode: OperationMode,
        current: f64,
        set: f64,
    ) -> Reconciler {
        let mut r = reconciler(settings);
        r.ingest(&notification(&[
            StateChange::Power(Power::On),
            StateChange::OperationMode(mode),
            StateChange::CurrentTemperature(current),
            StateChange::SetTemperature(set),
        ]))
        .unwrap();
        r
    }

    fn commanded_setpoints(outcome: &Outcome) -> Vec<f64> {
        outcome
            .commands()
            .filter_map(|request| match request.change() {
                StateChange::SetTemperature(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn number(value: f64) -> Option<CharacteristicValue> {
        Some(CharacteristicValue::Number(value))
    }

    #[test]
    fn bootstrap_seeds_thresholds_once() {
        let mut r = reconciler(ReconcilerSettings::default());
        assert!(!r.is_bootstrapped());

        let outcome = r
            .ingest(&notification(&[
                StateChange::Power(Power::On),
                StateChange::OperationMode(OperationMode::Cool),
                StateChange::CurrentTemperature(25.0),
                StateChange::SetTemperature(20.0),
            ]))
            .unwrap();

        assert!(r.is_bootstrapped());
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 22.0));
        assert_eq!(
            outcome.published(Characteristic::HeatingThresholdTemperature),
            number(18.0)
        );
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            number(22.0)
        );
        // Cool mode shows the cooling threshold, not the reported setpoint
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(22.0));
        assert_eq!(r.target_temperature(), 22.0);
        assert_eq!(r.operating_state(), OperatingState::Cooling);
        assert_eq!(outcome.commands().count(), 0);

        // A later setpoint report does not reseed the thresholds
        let outcome = r
            .ingest(&notification(&[StateChange::SetTemperature(26.0)]))
            .unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 22.0));
        assert_eq!(
            outcome.published(Characteristic::HeatingThresholdTemperature),
            None
        );
        // Cool mode pulls the unit back to the cooling threshold
        assert_eq!(commanded_setpoints(&outcome), vec![22.0]);
    }

    #[test]
    fn bootstrap_band_zero_collapses_thresholds() {
        let r = bootstrapped(
            ReconcilerSettings::default().with_bootstrap_band(0.0),
            OperationMode::Auto,
            20.0,
            23.0,
        );
        assert_eq!(r.thresholds(), ThresholdPair::new(23.0, 23.0));
    }

    #[test]
    fn bootstrap_clamps_thresholds_into_host_range() {
        let r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            16.0,
        );
        assert_eq!(r.thresholds(), ThresholdPair::new(16.0, 18.0));
    }

    #[test]
    fn notification_publishes_each_reported_field() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r
            .ingest(&notification(&[
                StateChange::CurrentTemperature(20.5),
                StateChange::FanLevel(crate::types::FanLevel::High),
            ]))
            .unwrap();
        assert_eq!(outcome.published(Characteristic::CurrentTemperature), number(20.5));
        assert_eq!(outcome.published(Characteristic::RotationSpeed), number(90.0));
        assert_eq!(
            outcome.published(Characteristic::CurrentHeaterCoolerState),
            Some(CharacteristicValue::Code(1))
        );
    }

    #[test]
    fn bootstrap_publishes_derived_target_without_command() {
        let settings = ReconcilerSettings::default();
        for (mode, expected) in [(OperationMode::Cool, 22.0), (OperationMode::Heat, 18.0)] {
            let mut r = reconciler(settings);
            let outcome = r
                .ingest(&notification(&[
                    StateChange::Power(Power::On),
                    StateChange::OperationMode(mode),
                    StateChange::CurrentTemperature(25.0),
                    StateChange::SetTemperature(20.0),
                ]))
                .unwrap();

            let derived = target_setpoint(r.device(), &r.thresholds(), settings.tolerance, 20.0);
            assert_eq!(derived, expected, "{mode}");
            assert_eq!(
                outcome.published(Characteristic::TargetTemperature),
                number(derived),
                "{mode}"
            );
            assert_eq!(outcome.commands().count(), 0, "{mode}");
            assert_eq!(r.effective_setpoint(), 20.0, "{mode}");

            // The next report moves the unit to the derived setpoint
            let outcome = r
                .ingest(&notification(&[StateChange::CurrentTemperature(24.5)]))
                .unwrap();
            assert_eq!(commanded_setpoints(&outcome), vec![expected], "{mode}");
        }
    }

    #[test]
    fn threshold_edit_with_unchanged_target_refreshes_without_command() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 22.0));

        let outcome = r.apply_intent(HostIntent::SetCoolingThreshold(24.0)).unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 24.0));
        assert_eq!(outcome.commands().count(), 0);
        assert_eq!(outcome.command, None);
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(20.0));
        assert_eq!(r.pending_commands(), 0);
    }

    #[test]
    fn cool_mode_heating_edit_refreshes_without_command() {
        let settings = ReconcilerSettings::default().with_bootstrap_band(0.0);
        let mut r = bootstrapped(settings, OperationMode::Cool, 21.0, 22.0);
        assert_eq!(r.thresholds(), ThresholdPair::new(22.0, 22.0));

        let outcome = r.apply_intent(HostIntent::SetHeatingThreshold(19.0)).unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(19.0, 22.0));
        assert_eq!(outcome.commands().count(), 0);
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(22.0));
        assert_eq!(
            outcome.published(Characteristic::HeatingThresholdTemperature),
            number(19.0)
        );
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            None
        );
    }

    #[test]
    fn echo_suppression_skips_unchanged_setpoint() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r
            .ingest(&notification(&[StateChange::CurrentTemperature(20.5)]))
            .unwrap();
        assert_eq!(outcome.commands().count(), 0);
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(20.0));
    }

    #[test]
    fn in_flight_setpoint_is_not_recommanded() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r
            .ingest(&notification(&[StateChange::CurrentTemperature(21.5)]))
            .unwrap();
        assert_eq!(commanded_setpoints(&outcome), vec![21.5]);
        assert_eq!(r.effective_setpoint(), 21.5);

        // Room moves a little before the unit echoes the new setpoint
        let outcome = r
            .ingest(&notification(&[StateChange::CurrentTemperature(21.8)]))
            .unwrap();
        assert_eq!(outcome.commands().count(), 0);

        // The echo itself produces no command either
        let outcome = r
            .ingest(&notification(&[StateChange::SetTemperature(21.5)]))
            .unwrap();
        assert_eq!(outcome.commands().count(), 0);
        assert_eq!(r.device().set_temperature(), 21.5);
    }

    #[test]
    fn optimistic_publish_at_emission() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            21.0,
            22.0,
        );
        let outcome = r.apply_intent(HostIntent::SetCoolingThreshold(25.0)).unwrap();
        assert_eq!(commanded_setpoints(&outcome), vec![25.0]);
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(25.0));
        assert_eq!(r.target_temperature(), 25.0);
        // The device state is only changed by the echo
        assert_eq!(r.device().set_temperature(), 22.0);
    }

    #[test]
    fn await_echo_defers_target_publication() {
        let settings =
            ReconcilerSettings::default().with_setpoint_publish(SetpointPublish::AwaitEcho);
        let mut r = bootstrapped(settings, OperationMode::Cool, 21.0, 22.0);
        let outcome = r.apply_intent(HostIntent::SetCoolingThreshold(25.0)).unwrap();
        assert_eq!(commanded_setpoints(&outcome), vec![25.0]);
        assert_eq!(outcome.published(Characteristic::TargetTemperature), None);
        assert_eq!(r.target_temperature(), 24.0);

        // A sensor report before the echo does not leak the new setpoint
        let outcome = r
            .ingest(&notification(&[StateChange::CurrentTemperature(21.5)]))
            .unwrap();
        assert_eq!(outcome.published(Characteristic::TargetTemperature), None);
        assert_eq!(outcome.commands().count(), 0);

        let outcome = r
            .ingest(&notification(&[StateChange::SetTemperature(25.0)]))
            .unwrap();
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(25.0));
    }

    #[test]
    fn threshold_edit_outside_auto_publishes_only_that_bound() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Heat,
            18.0,
            22.0,
        );
        let outcome = r.apply_intent(HostIntent::SetCoolingThreshold(27.0)).unwrap();
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            number(27.0)
        );
        assert_eq!(
            outcome.published(Characteristic::HeatingThresholdTemperature),
            None
        );
        // Heat mode targets the heating threshold, not the reported setpoint
        assert_eq!(commanded_setpoints(&outcome), vec![20.0]);
    }

    #[test]
    fn auto_mode_normalizes_inverted_edit() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r.apply_intent(HostIntent::SetHeatingThreshold(25.0)).unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(22.0, 25.0));
        assert_eq!(
            outcome.published(Characteristic::HeatingThresholdTemperature),
            number(22.0)
        );
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            number(25.0)
        );
        // Room at 20 is now below the band
        assert_eq!(r.operating_state(), OperatingState::Heating);
        assert_eq!(commanded_setpoints(&outcome), vec![22.0]);
    }

    #[test]
    fn report_auto_active_keeps_inverted_pair() {
        let settings =
            ReconcilerSettings::default().with_inversion_policy(InversionPolicy::ReportAutoActive);
        let mut r = bootstrapped(settings, OperationMode::Auto, 20.0, 20.0);
        let outcome = r.apply_intent(HostIntent::SetHeatingThreshold(25.0)).unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(25.0, 22.0));
        assert_eq!(r.operating_state(), OperatingState::AutoActive);
        assert_eq!(
            outcome.published(Characteristic::CurrentHeaterCoolerState),
            Some(CharacteristicValue::Code(0))
        );
    }

    #[test]
    fn switching_to_auto_normalizes_on_next_notification() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            20.0,
            20.0,
        );
        r.apply_intent(HostIntent::SetCoolingThreshold(17.0)).unwrap();
        assert!(r.thresholds().is_inverted());

        let outcome = r
            .ingest(&notification(&[StateChange::OperationMode(OperationMode::Auto)]))
            .unwrap();
        assert_eq!(r.thresholds(), ThresholdPair::new(17.0, 18.0));
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            number(18.0)
        );
    }

    #[test]
    fn failed_setpoint_rolls_back_thresholds() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            21.0,
            22.0,
        );
        let before = r.thresholds();
        let outcome = r.apply_intent(HostIntent::SetCoolingThreshold(26.0)).unwrap();
        let id = outcome.command.unwrap();
        assert_eq!(r.pending_commands(), 1);

        let outcome = r.complete(id, &Err(LinkError::Timeout(5000)));
        assert_eq!(r.thresholds(), before);
        assert_eq!(r.pending_commands(), 0);
        assert_eq!(r.effective_setpoint(), 22.0);
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            number(24.0)
        );
        assert_eq!(outcome.published(Characteristic::TargetTemperature), number(22.0));
        assert_eq!(outcome.commands().count(), 0);
    }

    #[test]
    fn rollback_is_skipped_after_a_newer_edit() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            21.0,
            22.0,
        );
        let first = r
            .apply_intent(HostIntent::SetCoolingThreshold(26.0))
            .unwrap()
            .command
            .unwrap();
        r.apply_intent(HostIntent::SetCoolingThreshold(27.0)).unwrap();

        let outcome = r.complete(first, &Err(LinkError::NotConnected));
        assert_eq!(r.thresholds().max(), 27.0);
        assert_eq!(
            outcome.published(Characteristic::CoolingThresholdTemperature),
            None
        );
        // The newer command is still in flight
        assert_eq!(r.effective_setpoint(), 27.0);
    }

    #[test]
    fn successful_completion_changes_nothing() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            21.0,
            22.0,
        );
        let id = r
            .apply_intent(HostIntent::SetCoolingThreshold(26.0))
            .unwrap()
            .command
            .unwrap();
        let outcome = r.complete(id, &Ok(()));
        assert!(outcome.effects.is_empty());
        assert_eq!(r.thresholds().max(), 26.0);
        assert_eq!(r.effective_setpoint(), 26.0);
        assert_eq!(r.device().set_temperature(), 22.0);
    }

    #[test]
    fn direct_target_routes_through_thresholds() {
        let mut cool = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Cool,
            21.0,
            22.0,
        );
        cool.apply_intent(HostIntent::SetTargetTemperature(25.0))
            .unwrap();
        assert_eq!(cool.thresholds().max(), 25.0);

        let mut heat = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Heat,
            21.0,
            22.0,
        );
        heat.apply_intent(HostIntent::SetTargetTemperature(19.0))
            .unwrap();
        assert_eq!(heat.thresholds().min(), 19.0);
    }

    #[test]
    fn direct_target_in_auto_commands_unless_unchanged() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r.apply_intent(HostIntent::SetTargetTemperature(20.0)).unwrap();
        assert_eq!(outcome.command, None);

        let outcome = r.apply_intent(HostIntent::SetTargetTemperature(21.0)).unwrap();
        assert_eq!(commanded_setpoints(&outcome), vec![21.0]);
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 22.0));
    }

    #[test]
    fn direct_field_writes_issue_commands() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r.apply_intent(HostIntent::SetTargetState(2)).unwrap();
        let request = outcome.commands().next().unwrap();
        assert_eq!(request.change(), StateChange::OperationMode(OperationMode::Cool));
        // Mode is not changed until the unit reports it
        assert_eq!(r.device().operation_mode(), OperationMode::Auto);

        let outcome = r.apply_intent(HostIntent::SetRotationSpeed(45.0)).unwrap();
        assert_eq!(
            outcome.commands().next().unwrap().to_string(),
            "AC_FUN_WINDLEVEL=Mid"
        );

        let outcome = r.apply_intent(HostIntent::SetSwingMode(true)).unwrap();
        assert_eq!(
            outcome.commands().next().unwrap().field(),
            DeviceField::SwingDirection
        );
    }

    #[test]
    fn failed_power_command_restores_active() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let id = r
            .apply_intent(HostIntent::SetActive(false))
            .unwrap()
            .command
            .unwrap();
        let outcome = r.complete(id, &Err(LinkError::CommandRejected("busy".into())));
        assert_eq!(
            outcome.published(Characteristic::Active),
            Some(CharacteristicValue::Bool(true))
        );
        assert_eq!(r.device().power(), Power::On);
    }

    #[test]
    fn unknown_target_state_is_rejected() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let err = r.apply_intent(HostIntent::SetTargetState(9)).unwrap_err();
        assert!(matches!(
            err,
            Error::Mapping(MappingError::UnknownTargetState(9))
        ));
        assert_eq!(r.pending_commands(), 0);
    }

    #[test]
    fn invalid_threshold_is_rejected_without_change() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        assert!(r.apply_intent(HostIntent::SetHeatingThreshold(40.0)).is_err());
        assert_eq!(r.thresholds(), ThresholdPair::new(18.0, 22.0));
    }

    #[test]
    fn malformed_notification_leaves_state_untouched() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let before = r.snapshot();
        let update = StateUpdate::new()
            .with(DeviceField::CurrentTemperature, "25")
            .with(DeviceField::OperationMode, "Turbo");
        assert!(r.ingest(&update).is_err());
        assert_eq!(r.snapshot(), before);
    }

    #[test]
    fn dry_mode_is_tracked_without_host_target_state() {
        let mut r = bootstrapped(
            ReconcilerSettings::default(),
            OperationMode::Auto,
            20.0,
            20.0,
        );
        let outcome = r
            .ingest(&notification(&[
                StateChange::OperationMode(OperationMode::Dry),
                StateChange::CurrentTemperature(27.0),
            ]))
            .unwrap();
        assert_eq!(r.device().operation_mode(), OperationMode::Dry);
        assert_eq!(
            outcome.published(Characteristic::TargetHeaterCoolerState),
            None
        );
        assert_eq!(r.operating_state(), OperatingState::Idle);
        assert_eq!(outcome.commands().count(), 0);
    }

    #[test]
    fn unknown_completion_is_ignored() {
        let mut r = reconciler(ReconcilerSettings::default());
        let outcome = r.complete(CommandId::new(), &Err(LinkError::ChannelClosed));
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn untracked_only_notification_does_not_bootstrap() {
        let mut r = reconciler(ReconcilerSettings::default());
        let update = StateUpdate::from_json(r#"{"AC_ADD_AUTOCLEAN":"Off"}"#).unwrap();
        let outcome = r.ingest(&update).unwrap();
        assert!(outcome.effects.is_empty());
        assert!(!r.is_bootstrapped());
    }
}
