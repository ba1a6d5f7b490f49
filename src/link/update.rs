// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial state notifications from the unit.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::state::StateChange;

use super::DeviceField;

/// A partial state update delivered by the Device Link.
///
/// Contains only the fields that changed, keyed by wire name. Absent fields
/// are not an error.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::link::{DeviceField, StateUpdate};
/// use aircon_thermostat::state::StateChange;
///
/// let update = StateUpdate::from_json(r#"{"AC_FUN_TEMPNOW":"27","AC_ADD_SPI":"Off"}"#).unwrap();
/// let changes = update.to_state_changes().unwrap();
///
/// // Untracked fields are skipped
/// assert_eq!(changes, vec![StateChange::CurrentTemperature(27.0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StateUpdate(Map<String, Value>);

impl StateUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an update from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] for malformed JSON and
    /// [`ParseError::NotAnObject`] if the payload is not an object.
    pub fn from_json(payload: &str) -> Result<Self, ParseError> {
        match serde_json::from_str::<Value>(payload)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ParseError::NotAnObject(other.to_string())),
        }
    }

    /// Adds a field with its wire value.
    #[must_use]
    pub fn with(mut self, field: DeviceField, value: impl Into<Value>) -> Self {
        self.0.insert(field.as_str().to_string(), value.into());
        self
    }

    /// Adds a typed change, encoded the way the unit reports it.
    #[must_use]
    pub fn with_change(self, change: StateChange) -> Self {
        let field = change.field();
        self.with(field, change.wire_value())
    }

    /// Returns `true` if the update carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields, tracked or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Decodes the tracked fields into state changes.
    ///
    /// Fields the crate does not track are skipped. A single invalid value
    /// fails the whole update so it is never half-applied.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn to_state_changes(&self) -> Result<Vec<StateChange>, ParseError> {
        let mut changes = Vec::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            match DeviceField::from_wire(name) {
                Some(field) => changes.push(field.decode(value)?),
                None => tracing::trace!(field = %name, "Ignoring untracked field"),
            }
        }
        Ok(changes)
    }
}

impl From<StateChange> for StateUpdate {
    fn from(change: StateChange) -> Self {
        Self::new().with_change(change)
    }
}

impl FromIterator<StateChange> for StateUpdate {
    fn from_iter<I: IntoIterator<Item = StateChange>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with_change)
    }
}
