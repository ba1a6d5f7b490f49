// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static accessory identification.

use serde::{Deserialize, Serialize};

use crate::config::AccessoryConfig;

/// Manufacturer reported to the host.
pub const MANUFACTURER: &str = "Samsung";

/// Identification shown by the host for the accessory.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::config::AccessoryConfig;
/// use aircon_thermostat::host::AccessoryInformation;
///
/// let config = AccessoryConfig::new("Office", "10.0.0.9", "AA:BB:CC:00:11:22", "t");
/// let info = AccessoryInformation::from_config(&config);
///
/// assert_eq!(info.name, "Office");
/// assert_eq!(info.serial_number, "AABBCC001122");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    /// Display name.
    pub name: String,
    /// Serial number; the device identifier.
    pub serial_number: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Firmware revision; the crate version.
    pub firmware_revision: String,
}

impl AccessoryInformation {
    /// Builds the information block for a configured unit.
    #[must_use]
    pub fn from_config(config: &AccessoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            serial_number: config.duid(),
            manufacturer: MANUFACTURER.to_string(),
            model: env!("CARGO_PKG_NAME").to_string(),
            firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firmware_revision_is_crate_version() {
        let config = AccessoryConfig::new("AC", "h", "01-02", "t");
        let info = AccessoryInformation::from_config(&config);
        assert_eq!(info.firmware_revision, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.model, "aircon_thermostat");
        assert_eq!(info.manufacturer, MANUFACTURER);
        assert_eq!(info.serial_number, "0102");
    }
}
