// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-domain value types.
//!
//! Each enumeration knows its wire name on the unit's protocol and parses
//! strictly: an unknown value is a [`MappingError`](crate::error::MappingError),
//! never a silent default.
//!
//! # Types
//!
//! - [`Power`] - On/Off
//! - [`OperationMode`] - Cool/Heat/Auto plus the device-only Dry/Wind
//! - [`SwingDirection`] - Fixed/SwingUD
//! - [`FanLevel`] - Auto/Low/Mid/High/Turbo
//! - [`OperatingState`] - Derived Idle/Heating/Cooling/AutoActive

mod fan;
mod mode;
mod operating;
mod power;
mod swing;

pub use fan::FanLevel;
pub use mode::OperationMode;
pub use operating::OperatingState;
pub use power::Power;
pub use swing::SwingDirection;
