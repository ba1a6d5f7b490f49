// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound control requests.

use std::fmt;

use uuid::Uuid;

use crate::state::StateChange;

use super::DeviceField;

/// Identifier correlating a control request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CommandId(Uuid);

impl CommandId {
    /// Creates a new random command ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0.simple())
    }
}

/// A request to change one field on the unit.
///
/// Built by the engine and handed to the [`DeviceLink`](super::DeviceLink);
/// the device state is not touched until the unit echoes the change.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::link::{ControlRequest, DeviceField};
/// use aircon_thermostat::state::StateChange;
///
/// let request = ControlRequest::new(StateChange::SetTemperature(22.0));
/// assert_eq!(request.field(), DeviceField::SetTemperature);
/// assert_eq!(request.value(), "22");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRequest {
    id: CommandId,
    change: StateChange,
}

impl ControlRequest {
    /// Creates a request for the given change with a fresh ID.
    #[must_use]
    pub fn new(change: StateChange) -> Self {
        Self {
            id: CommandId::new(),
            change,
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Returns the typed change being requested.
    #[must_use]
    pub fn change(&self) -> StateChange {
        self.change
    }

    /// Returns the field being written.
    #[must_use]
    pub fn field(&self) -> DeviceField {
        self.change.field()
    }

    /// Returns the wire value being written.
    #[must_use]
    pub fn value(&self) -> String {
        self.change.wire_value()
    }

    /// Formats the request as a `DeviceControl` message for the unit.
    ///
    /// `duid` is the device identifier (MAC address without separators).
    /// Framing and encryption are left to the link.
    #[must_use]
    pub fn to_device_control(&self, duid: &str) -> String {
        format!(
            r#"<Request Type="DeviceControl"><Control CommandID="{}" DUID="{}"><Attr ID="{}" Value="{}" /></Control></Request>"#,
            self.id,
            duid,
            self.field(),
            self.value()
        )
    }
}

impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field(), self.value())
    }
}
