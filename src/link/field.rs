// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device field names.

use std::fmt;

use serde_json::Value;

use crate::error::ParseError;
use crate::state::StateChange;

/// A field of the unit's state, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceField {
    /// `AC_FUN_POWER`
    Power,
    /// `AC_FUN_TEMPNOW`
    CurrentTemperature,
    /// `AC_FUN_TEMPSET`
    SetTemperature,
    /// `AC_FUN_OPMODE`
    OperationMode,
    /// `AC_FUN_DIRECTION`
    SwingDirection,
    /// `AC_FUN_WINDLEVEL`
    FanLevel,
}

impl DeviceField {
    /// All fields, in protocol order.
    pub const ALL: [Self; 6] = [
        Self::Power,
        Self::CurrentTemperature,
        Self::SetTemperature,
        Self::OperationMode,
        Self::SwingDirection,
        Self::FanLevel,
    ];

    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "AC_FUN_POWER",
            Self::CurrentTemperature => "AC_FUN_TEMPNOW",
            Self::SetTemperature => "AC_FUN_TEMPSET",
            Self::OperationMode => "AC_FUN_OPMODE",
            Self::SwingDirection => "AC_FUN_DIRECTION",
            Self::FanLevel => "AC_FUN_WINDLEVEL",
        }
    }

    /// Looks up a field by wire name.
    ///
    /// Returns `None` for fields this crate does not track; the unit reports
    /// many more than the six the thermostat needs.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Decodes a raw notification value for this field.
    ///
    /// Temperatures may arrive as JSON numbers or numeric strings. Enumerated
    /// fields must be strings naming a known variant.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] for a value of the wrong shape and
    /// [`ParseError::Mapping`] for an unknown enumeration value.
    pub fn decode(self, value: &Value) -> Result<StateChange, ParseError> {
        match self {
            Self::CurrentTemperature => {
                decode_temperature(self, value).map(StateChange::CurrentTemperature)
            }
            Self::SetTemperature => decode_temperature(self, value).map(StateChange::SetTemperature),
            Self::Power => Ok(StateChange::Power(expect_str(self, value)?.parse()?)),
            Self::OperationMode => Ok(StateChange::OperationMode(expect_str(self, value)?.parse()?)),
            Self::SwingDirection => Ok(StateChange::SwingDirection(
                expect_str(self, value)?.parse()?,
            )),
            Self::FanLevel => Ok(StateChange::FanLevel(expect_str(self, value)?.parse()?)),
        }
    }
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn expect_str(field: DeviceField, value: &Value) -> Result<&str, ParseError> {
    value.as_str().ok_or_else(|| ParseError::InvalidValue {
        field: field.as_str().to_string(),
        message: format!("expected a string, got {value}"),
    })
}

fn decode_temperature(field: DeviceField, value: &Value) -> Result<f64, ParseError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(t) if t.is_finite() => Ok(t),
        _ => Err(ParseError::InvalidValue {
            field: field.as_str().to_string(),
            message: format!("expected a temperature, got {value}"),
        }),
    }
}
