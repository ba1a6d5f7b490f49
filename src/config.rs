// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration.
//!
//! [`AccessoryConfig`] is deserialized from the host platform's accessory
//! block. Only the tolerance and the engine tuning knobs reach the
//! reconciliation engine, through [`ReconcilerSettings`]; the address,
//! token and transport flags are passed to the Device Link untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ParseError};

/// Default hysteresis tolerance in degrees.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// Default half-width of the bootstrap threshold band in degrees.
pub const DEFAULT_BOOTSTRAP_BAND: f64 = 2.0;

/// What to do with an inverted threshold pair in Auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InversionPolicy {
    /// Swap the bounds so `min <= max`, and report both to the host.
    #[default]
    Normalize,
    /// Keep the pair as entered and report [`AutoActive`](crate::types::OperatingState::AutoActive)
    /// while the unit is on.
    ReportAutoActive,
}

/// When the host sees a newly commanded target temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetpointPublish {
    /// Publish as soon as the command is emitted; restore on failure.
    #[default]
    Optimistic,
    /// Publish only once the unit reports the new setpoint.
    AwaitEcho,
}

/// Tuning for the reconciliation engine.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::{InversionPolicy, ReconcilerSettings};
///
/// let settings = ReconcilerSettings::default()
///     .with_tolerance(0.5)
///     .with_inversion_policy(InversionPolicy::ReportAutoActive);
/// assert_eq!(settings.tolerance, 0.5);
/// assert_eq!(settings.bootstrap_band, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilerSettings {
    /// Hysteresis band for the Auto-mode setpoint.
    pub tolerance: f64,
    /// Half-width of the band derived from the first reported setpoint.
    ///
    /// The seeded pair is clamped into
    /// [[`SETPOINT_MIN`](crate::host::SETPOINT_MIN),
    /// [`SETPOINT_MAX`](crate::host::SETPOINT_MAX)], so a setpoint near either
    /// end yields a narrower band.
    pub bootstrap_band: f64,
    /// Inverted-pair handling in Auto mode.
    pub inversion_policy: InversionPolicy,
    /// Target temperature publication timing.
    pub setpoint_publish: SetpointPublish,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            bootstrap_band: DEFAULT_BOOTSTRAP_BAND,
            inversion_policy: InversionPolicy::default(),
            setpoint_publish: SetpointPublish::default(),
        }
    }
}

impl ReconcilerSettings {
    /// Sets the hysteresis tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bootstrap band half-width.
    #[must_use]
    pub fn with_bootstrap_band(mut self, band: f64) -> Self {
        self.bootstrap_band = band;
        self
    }

    /// Sets the inversion policy.
    #[must_use]
    pub fn with_inversion_policy(mut self, policy: InversionPolicy) -> Self {
        self.inversion_policy = policy;
        self
    }

    /// Sets the setpoint publication policy.
    #[must_use]
    pub fn with_setpoint_publish(mut self, publish: SetpointPublish) -> Self {
        self.setpoint_publish = publish;
        self
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the tolerance or band is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !self.bootstrap_band.is_finite() || self.bootstrap_band < 0.0 {
            return Err(ConfigError::InvalidBootstrapBand(self.bootstrap_band));
        }
        Ok(())
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_bootstrap_band() -> f64 {
    DEFAULT_BOOTSTRAP_BAND
}

/// Configuration for one air-conditioner accessory.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::AccessoryConfig;
///
/// let config = AccessoryConfig::from_json(r#"{
///     "name": "Bedroom AC",
///     "ip_address": "192.168.1.40",
///     "mac": "F8:04:2E:00:00:00",
///     "token": "secret"
/// }"#).unwrap();
///
/// assert_eq!(config.duid(), "F8042E000000");
/// assert_eq!(config.tolerance, 1.0);
/// assert!(!config.log_socket_activity);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryConfig {
    /// Display name of the accessory.
    pub name: String,
    /// Network address of the unit.
    pub ip_address: String,
    /// MAC address of the unit, with or without separators.
    pub mac: String,
    /// Authentication token for the unit.
    pub token: String,
    /// Hysteresis tolerance in degrees.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Whether the link should log raw socket traffic.
    #[serde(default)]
    pub log_socket_activity: bool,
    /// Keep-alive settings, passed through to the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<Value>,
    /// Half-width of the bootstrap threshold band in degrees, clamped into
    /// the 16 to 30 degree setpoint range.
    #[serde(default = "default_bootstrap_band")]
    pub bootstrap_band: f64,
    /// Inverted-pair handling in Auto mode.
    #[serde(default)]
    pub inversion_policy: InversionPolicy,
    /// Target temperature publication timing.
    #[serde(default)]
    pub setpoint_publish: SetpointPublish,
}

impl AccessoryConfig {
    /// Creates a configuration with default tuning.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ip_address: impl Into<String>,
        mac: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
            mac: mac.into(),
            token: token.into(),
            tolerance: DEFAULT_TOLERANCE,
            log_socket_activity: false,
            keep_alive: None,
            bootstrap_band: DEFAULT_BOOTSTRAP_BAND,
            inversion_policy: InversionPolicy::default(),
            setpoint_publish: SetpointPublish::default(),
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the JSON is malformed or a required
    /// field is missing.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Sets the hysteresis tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bootstrap band half-width.
    #[must_use]
    pub fn with_bootstrap_band(mut self, band: f64) -> Self {
        self.bootstrap_band = band;
        self
    }

    /// Sets the inversion policy.
    #[must_use]
    pub fn with_inversion_policy(mut self, policy: InversionPolicy) -> Self {
        self.inversion_policy = policy;
        self
    }

    /// Sets the setpoint publication policy.
    #[must_use]
    pub fn with_setpoint_publish(mut self, publish: SetpointPublish) -> Self {
        self.setpoint_publish = publish;
        self
    }

    /// Enables raw socket logging in the link.
    #[must_use]
    pub fn with_socket_logging(mut self) -> Self {
        self.log_socket_activity = true;
        self
    }

    /// Device identifier: the MAC address with `:` and `-` removed.
    #[must_use]
    pub fn duid(&self) -> String {
        self.mac.chars().filter(|c| !matches!(c, ':' | '-')).collect()
    }

    /// Returns the settings relevant to the reconciliation engine.
    #[must_use]
    pub fn reconciler_settings(&self) -> ReconcilerSettings {
        ReconcilerSettings {
            tolerance: self.tolerance,
            bootstrap_band: self.bootstrap_band,
            inversion_policy: self.inversion_policy,
            setpoint_publish: self.setpoint_publish,
        }
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required field is empty or a numeric
    /// setting is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField("name"));
        }
        if self.ip_address.trim().is_empty() {
            return Err(ConfigError::MissingField("ip_address"));
        }
        if self.duid().trim().is_empty() {
            return Err(ConfigError::MissingField("mac"));
        }
        self.reconciler_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccessoryConfig {
        AccessoryConfig::new("Living Room", "10.0.0.5", "AA-BB-CC-DD-EE-FF", "tok")
    }

    #[test]
    fn duid_strips_separators() {
        assert_eq!(sample().duid(), "AABBCCDDEEFF");
        let colons = AccessoryConfig::new("x", "h", "aa:bb:cc:dd:ee:ff", "t");
        assert_eq!(colons.duid(), "aabbccddeeff");
    }

    #[test]
    fn json_defaults() {
        let config = AccessoryConfig::from_json(
            r#"{"name":"AC","ip_address":"10.0.0.5","mac":"AA:BB","token":"t"}"#,
        )
        .unwrap();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.bootstrap_band, DEFAULT_BOOTSTRAP_BAND);
        assert_eq!(config.inversion_policy, InversionPolicy::Normalize);
        assert_eq!(config.setpoint_publish, SetpointPublish::Optimistic);
        assert!(config.keep_alive.is_none());
    }

    #[test]
    fn json_overrides() {
        let config = AccessoryConfig::from_json(
            r#"{
                "name":"AC","ip_address":"10.0.0.5","mac":"AA:BB","token":"t",
                "tolerance":0.5,
                "log_socket_activity":true,
                "keep_alive":{"enabled":true,"interval":10},
                "inversion_policy":"report_auto_active",
                "setpoint_publish":"await_echo"
            }"#,
        )
        .unwrap();
        assert_eq!(config.tolerance, 0.5);
        assert!(config.log_socket_activity);
        assert_eq!(config.keep_alive.unwrap()["interval"], 10);
        assert_eq!(config.inversion_policy, InversionPolicy::ReportAutoActive);
        assert_eq!(config.setpoint_publish, SetpointPublish::AwaitEcho);
    }

    #[test]
    fn missing_mac_is_a_parse_error() {
        let result = AccessoryConfig::from_json(r#"{"name":"AC","ip_address":"h","token":"t"}"#);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let config = AccessoryConfig::new("AC", "h", "::--", "t");
        assert_eq!(config.validate(), Err(ConfigError::MissingField("mac")));

        let config = AccessoryConfig::new(" ", "h", "AA", "t");
        assert_eq!(config.validate(), Err(ConfigError::MissingField("name")));
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        assert_eq!(
            sample().with_tolerance(-1.0).validate(),
            Err(ConfigError::InvalidTolerance(-1.0))
        );
        assert!(matches!(
            sample().with_bootstrap_band(f64::NAN).validate(),
            Err(ConfigError::InvalidBootstrapBand(_))
        ));
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn reconciler_settings_projection() {
        let settings = sample()
            .with_tolerance(2.0)
            .with_bootstrap_band(0.0)
            .reconciler_settings();
        assert_eq!(settings.tolerance, 2.0);
        assert_eq!(settings.bootstrap_band, 0.0);
    }
}
