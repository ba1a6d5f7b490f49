// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The reconciliation engine.
//!
//! The unit has one setpoint; the host thinks in a heating/cooling threshold
//! pair. The engine owns the pair, derives the operating state and the
//! setpoint to command from it, and keeps the host informed.
//!
//! # Layers
//!
//! - [`derive()`], [`operating_state`], [`target_setpoint`]: pure functions
//! - [`Reconciler`]: the synchronous core; every step returns an [`Outcome`]
//! - [`spawn_engine`]: runs a reconciler on a task, serializing device
//!   notifications, host writes and command completions through one queue
//! - [`ThermostatHandle`]: cloneable access to the running engine
//!
//! # Concurrency
//!
//! All mutation happens on the engine task, one message at a time, so a
//! notification never interleaves with a host write. Getters read a snapshot
//! published after each step and never wait on the engine.

mod derive;
mod handle;
mod intent;
mod reconciler;
mod snapshot;

pub use derive::{Derived, derive, operating_state, target_setpoint};
pub use handle::{DEFAULT_QUEUE_CAPACITY, ThermostatHandle, spawn_engine};
pub use intent::{HostIntent, ThresholdBound};
pub use reconciler::{Effect, Outcome, Reconciler};
pub use snapshot::ThermostatSnapshot;
