// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasks moving messages between a [`DeviceLink`] and the engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::ThermostatHandle;

use super::{ControlRequest, DeviceLink, StateUpdate};

/// Spawns a task feeding the link's notifications into the engine.
///
/// Ends when the link closes the stream or the engine stops.
pub fn spawn_notification_forwarder(
    mut updates: mpsc::Receiver<StateUpdate>,
    handle: ThermostatHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            tracing::trace!(fields = update.len(), "Notification from unit");
            if handle.notify(update).await.is_err() {
                tracing::debug!("Engine stopped, ending notification forwarder");
                return;
            }
        }
        tracing::info!("Device link closed its notification stream");
    })
}

/// Spawns the task issuing control requests to the unit.
///
/// Requests are sent one at a time, in emission order. Each completion is
/// reported back to the engine, successful or not; failed requests are not
/// retried.
pub fn spawn_command_driver<L: DeviceLink>(
    link: Arc<L>,
    mut commands: mpsc::UnboundedReceiver<ControlRequest>,
    handle: ThermostatHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = commands.recv().await {
            let id = request.id();
            tracing::debug!(command = %id, %request, "Sending command to unit");

            let result = link.control(request).await;
            if let Err(e) = &result {
                tracing::warn!(command = %id, error = %e, "Command failed");
            }

            if handle.report_completion(id, result).await.is_err() {
                tracing::debug!("Engine stopped, ending command driver");
                return;
            }
        }
    })
}
