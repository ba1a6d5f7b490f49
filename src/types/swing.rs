// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Louvre swing direction.

use std::fmt;
use std::str::FromStr;

use crate::error::MappingError;

/// Swing direction of the louvres (`AC_FUN_DIRECTION`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum SwingDirection {
    /// Louvres do not move.
    #[default]
    Fixed,
    /// Louvres oscillate vertically.
    SwingUpDown,
}

impl SwingDirection {
    /// Returns the device wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::SwingUpDown => "SwingUD",
        }
    }

    /// Returns `true` if the louvres oscillate.
    #[must_use]
    pub const fn is_swinging(&self) -> bool {
        matches!(self, Self::SwingUpDown)
    }
}

impl fmt::Display for SwingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwingDirection {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fixed" => Ok(Self::Fixed),
            "SwingUD" => Ok(Self::SwingUpDown),
            _ => Err(MappingError::UnknownSwingDirection(s.to_string())),
        }
    }
}

impl From<bool> for SwingDirection {
    fn from(swinging: bool) -> Self {
        if swinging {
            Self::SwingUpDown
        } else {
            Self::Fixed
        }
    }
}
