// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic thermostat history samples.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::engine::ThermostatHandle;
use crate::types::FanLevel;

/// Interval between history samples.
pub const HISTORY_INTERVAL: Duration = Duration::from_secs(8 * 60);

/// One history entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySample {
    /// When the sample was taken, serialized as Unix seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    /// Room temperature reported by the unit.
    pub current_temp: f64,
    /// Setpoint reported by the unit.
    pub set_temp: f64,
    /// Fan level reported by the unit.
    pub fan_level: FanLevel,
}

/// Receives history samples, typically a persistent history store.
pub trait HistorySink: Send + Sync + 'static {
    /// Records one sample.
    fn add_entry(&self, sample: HistorySample);
}

/// Spawns a task sampling the device state every `interval`.
///
/// The first sample is taken immediately. The task ends when the engine
/// behind `handle` stops.
pub fn spawn_history_sampler(
    handle: ThermostatHandle,
    sink: Arc<dyn HistorySink>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if handle.is_closed() {
                tracing::debug!("Engine stopped, ending history sampler");
                break;
            }
            let device = handle.snapshot().device;
            let sample = HistorySample {
                time: Utc::now(),
                current_temp: device.current_temperature(),
                set_temp: device.set_temperature(),
                fan_level: device.fan_level(),
            };
            tracing::trace!(?sample, "Recording history sample");
            sink.add_entry(sample);
        }
    })
}
