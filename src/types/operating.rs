// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived operating state.

use std::fmt;

/// What the thermostat is currently doing, as shown to the host.
///
/// This is never reported by the unit. It is recomputed from the device
/// state and the threshold pair on every change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum OperatingState {
    /// Not heating or cooling.
    #[default]
    Idle,
    /// Actively heating.
    Heating,
    /// Actively cooling.
    Cooling,
    /// Auto mode running with an inverted threshold pair.
    ///
    /// Only produced under [`InversionPolicy::ReportAutoActive`](crate::config::InversionPolicy).
    AutoActive,
}

impl OperatingState {
    /// Returns a short lowercase label for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Heating => "heating",
            Self::Cooling => "cooling",
            Self::AutoActive => "auto-active",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
