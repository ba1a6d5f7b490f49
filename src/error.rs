// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `aircon_thermostat` library.
//!
//! The hierarchy separates the failure classes the reconciliation engine
//! distinguishes: value validation, domain mapping, notification parsing,
//! Device Link failures and configuration problems.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A host-supplied value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A value could not be translated between device and host domains.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// An inbound notification could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The Device Link reported a failure.
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// The configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The characteristic cannot be written by the host.
    #[error("characteristic {0} is read-only")]
    ReadOnly(String),

    /// The engine task is no longer running.
    #[error("reconciliation engine stopped")]
    EngineStopped,
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A numeric value is NaN or infinite.
    #[error("value is not a finite number")]
    NotFinite,

    /// The value has the wrong kind for the characteristic.
    #[error("expected a {expected} value for {characteristic}")]
    WrongKind {
        /// The characteristic being written.
        characteristic: String,
        /// The expected value kind.
        expected: &'static str,
    },
}

/// Errors translating enumerations between the device and host domains.
///
/// These are never defaulted away: commanding a guessed operation mode is
/// worse than refusing the request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingError {
    /// An unknown power wire value.
    #[error("unknown power value: {0}")]
    UnknownPower(String),

    /// An unknown operation mode wire value.
    #[error("unknown operation mode: {0}")]
    UnknownOperationMode(String),

    /// An unknown swing direction wire value.
    #[error("unknown swing direction: {0}")]
    UnknownSwingDirection(String),

    /// An unknown fan level wire value.
    #[error("unknown fan level: {0}")]
    UnknownFanLevel(String),

    /// A host target-state code that is not in the enum table.
    #[error("unknown host target state code: {0}")]
    UnknownTargetState(u8),

    /// The device mode has no host target-state equivalent.
    #[error("operation mode {0} has no host target state")]
    NoHostTargetState(String),

    /// A rotation speed outside `[0, 100]`.
    #[error("rotation speed {0} is outside [0, 100]")]
    RotationSpeedOutOfRange(f64),
}

/// Errors related to parsing inbound device notifications.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The notification payload is not a JSON object.
    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),

    /// Failed to parse a specific field value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// A known field carried a value outside its domain.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Failures reported by the Device Link.
///
/// `Clone` so a single failure can be delivered both to the waiting host
/// caller and to the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Connecting to the unit failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The unit is not connected.
    #[error("device is not connected")]
    NotConnected,

    /// The unit rejected the command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The command timed out.
    #[error("command timed out after {0} ms")]
    Timeout(u64),

    /// The command driver is no longer running.
    #[error("command channel closed")]
    ChannelClosed,
}

/// Errors related to accessory configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The tolerance is negative or not finite.
    #[error("invalid tolerance: {0}")]
    InvalidTolerance(f64),

    /// The bootstrap band is negative or not finite.
    #[error("invalid bootstrap band: {0}")]
    InvalidBootstrapBand(f64),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
