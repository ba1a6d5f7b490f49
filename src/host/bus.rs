// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast of characteristic updates to the host.

use tokio::sync::broadcast;

use super::{Characteristic, CharacteristicValue};

/// Default channel capacity for the host bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A value pushed to the host for one characteristic.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HostUpdate {
    /// The characteristic that changed.
    pub characteristic: Characteristic,
    /// Its new value.
    pub value: CharacteristicValue,
}

impl HostUpdate {
    /// Creates an update.
    #[must_use]
    pub const fn new(characteristic: Characteristic, value: CharacteristicValue) -> Self {
        Self {
            characteristic,
            value,
        }
    }
}

/// Fan-out of [`HostUpdate`]s to every host adapter that subscribed.
///
/// Slow subscribers lose the oldest updates (`RecvError::Lagged`). Each
/// update carries the full value, so a lagging subscriber only needs the
/// latest update per characteristic or a fresh read through the handle.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::host::{Characteristic, CharacteristicValue, HostBus, HostUpdate};
///
/// let bus = HostBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(HostUpdate::new(
///     Characteristic::CurrentTemperature,
///     CharacteristicValue::Number(24.0),
/// ));
///
/// let update = rx.try_recv().unwrap();
/// assert_eq!(update.characteristic, Characteristic::CurrentTemperature);
/// ```
#[derive(Debug, Clone)]
pub struct HostBus {
    sender: broadcast::Sender<HostUpdate>,
}

impl HostBus {
    /// Creates a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` updates per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to updates published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HostUpdate> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an update. Discarded when nobody is subscribed.
    pub fn publish(&self, update: HostUpdate) {
        tracing::debug!(
            characteristic = %update.characteristic,
            value = ?update.value,
            "Publishing host update"
        );
        let _ = self.sender.send(update);
    }
}

impl Default for HostBus {
    fn default() -> Self {
        Self::new()
    }
}
