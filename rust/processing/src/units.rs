// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal length unit of the host model

use serde::{Deserialize, Serialize};

pub const MILLIMETERS_PER_FOOT: f64 = 304.8;

/// Unit the host stores lengths in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Feet,
    Meters,
    Millimeters,
}

impl LengthUnit {
    #[inline]
    pub fn millimeters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Feet => MILLIMETERS_PER_FOOT,
            LengthUnit::Meters => 1000.0,
            LengthUnit::Millimeters => 1.0,
        }
    }

    /// Millimetres to this unit
    #[inline]
    pub fn from_millimeters(self, mm: f64) -> f64 {
        mm / self.millimeters_per_unit()
    }

    /// This unit to millimetres
    #[inline]
    pub fn to_millimeters(self, value: f64) -> f64 {
        value * self.millimeters_per_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_conversions() {
        assert_relative_eq!(LengthUnit::Feet.from_millimeters(304.8), 1.0);
        assert_relative_eq!(LengthUnit::Meters.from_millimeters(500.0), 0.5);
        assert_relative_eq!(LengthUnit::Millimeters.to_millimeters(12.0), 12.0);
        assert_relative_eq!(LengthUnit::Feet.to_millimeters(LengthUnit::Feet.from_millimeters(50.0)), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_is_feet() {
        assert_eq!(LengthUnit::default(), LengthUnit::Feet);
    }
}
