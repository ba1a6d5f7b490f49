// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device-facing side of the accessory.
//!
//! The unit speaks a line-oriented protocol of partial state notifications
//! and single-field control requests. The transport (TLS socket, token
//! handshake, keep-alive, reconnection) lives behind the [`DeviceLink`]
//! trait; this module defines the values that cross it.
//!
//! - [`StateUpdate`]: a partial notification, keyed by wire field name
//! - [`ControlRequest`]: one field to change, correlated by [`CommandId`]
//! - [`DeviceField`]: the six fields the thermostat tracks
//!
//! # Examples
//!
//! ```
//! use aircon_thermostat::link::{ControlRequest, DeviceField, StateUpdate};
//! use aircon_thermostat::state::StateChange;
//!
//! let update = StateUpdate::new().with(DeviceField::SetTemperature, "24");
//! assert_eq!(update.to_state_changes().unwrap(), vec![StateChange::SetTemperature(24.0)]);
//!
//! let request = ControlRequest::new(StateChange::SetTemperature(22.5));
//! assert_eq!(request.to_string(), "AC_FUN_TEMPSET=22.5");
//! ```

mod driver;
mod field;
mod request;
mod update;

use std::future::Future;

use tokio::sync::mpsc;

pub use driver::{spawn_command_driver, spawn_notification_forwarder};
pub use field::DeviceField;
pub use request::{CommandId, ControlRequest};
pub use update::StateUpdate;

use crate::error::LinkError;

/// Connection to one air-conditioner unit.
///
/// Implementations own the transport. Requests are issued one at a time by
/// the command driver, in the order the engine emitted them.
///
/// Implementations may use `async fn`; the returned futures must be `Send`
/// because they run on spawned tasks.
pub trait DeviceLink: Send + Sync + 'static {
    /// Connects to the unit and returns its notification stream.
    ///
    /// The stream should start with a full state report. Reconnection is the
    /// link's business; the stream ends only when the link gives up.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::ConnectionFailed`] if the unit cannot be reached.
    fn connect(
        &self,
    ) -> impl Future<Output = Result<mpsc::Receiver<StateUpdate>, LinkError>> + Send;

    /// Sends one control request and waits for the unit to acknowledge it.
    ///
    /// Acknowledgement does not change the engine's view of the unit; only a
    /// later notification does.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] if the request was not delivered or the unit
    /// rejected it.
    fn control(
        &self,
        request: ControlRequest,
    ) -> impl Future<Output = Result<(), LinkError>> + Send;
}
