// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating/cooling threshold pair.

/// The locally owned heating (`min`) and cooling (`max`) thresholds.
///
/// The unit has a single setpoint and knows nothing about this pair. The
/// host may set either bound independently, so `min > max` is a legal value
/// of this type; [`lo`](Self::lo) and [`hi`](Self::hi) give the effective
/// interval regardless of order.
///
/// # Examples
///
/// ```
/// use aircon_thermostat::state::ThresholdPair;
///
/// let pair = ThresholdPair::around(20.0, 2.0);
/// assert_eq!((pair.min(), pair.max()), (18.0, 22.0));
///
/// let inverted = ThresholdPair::new(22.0, 18.0);
/// assert!(inverted.is_inverted());
/// assert_eq!((inverted.lo(), inverted.hi()), (18.0, 22.0));
/// assert_eq!(inverted.normalized(), pair);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThresholdPair {
    min: f64,
    max: f64,
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self::around(crate::state::DeviceState::DEFAULT_TEMPERATURE, 0.0)
    }
}

impl ThresholdPair {
    /// Creates a pair from the heating and cooling thresholds as given.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Creates a symmetric pair `center ± band`.
    #[must_use]
    pub fn around(center: f64, band: f64) -> Self {
        Self {
            min: center - band,
            max: center + band,
        }
    }

    /// Heating threshold as stored.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Cooling threshold as stored.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Lower bound of the effective interval.
    #[must_use]
    pub fn lo(&self) -> f64 {
        self.min.min(self.max)
    }

    /// Upper bound of the effective interval.
    #[must_use]
    pub fn hi(&self) -> f64 {
        self.min.max(self.max)
    }

    /// Returns `true` when the heating threshold exceeds the cooling one.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Returns the pair with `min <= max`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            min: self.lo(),
            max: self.hi(),
        }
    }

    /// Returns the pair with both bounds clamped into `[floor, ceiling]`.
    #[must_use]
    pub fn clamped(&self, floor: f64, ceiling: f64) -> Self {
        Self {
            min: self.min.clamp(floor, ceiling),
            max: self.max.clamp(floor, ceiling),
        }
    }

    /// Returns a copy with the heating threshold replaced.
    #[must_use]
    pub const fn with_min(self, min: f64) -> Self {
        Self { min, ..self }
    }

    /// Returns a copy with the cooling threshold replaced.
    #[must_use]
    pub const fn with_max(self, max: f64) -> Self {
        Self { max, ..self }
    }
}
