//! Kilometre markers along a route.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for a milepost that is not a finite, non-negative number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid milepost: {reason}")]
pub struct InvalidMilepost {
    reason: &'static str,
}

/// Largest accepted position. Longer than any federal highway.
pub const MAX_KM: f64 = 100_000.0;

/// A non-negative kilometre position along a route.
///
/// The value is kept as entered; [`Milepost::query_value`] produces the
/// metre-precision form the upstream service expects.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Milepost(f64);

impl Milepost {
    /// Create a milepost from a kilometre value.
    pub fn new(km: f64) -> Result<Self, InvalidMilepost> {
        if !km.is_finite() {
            return Err(InvalidMilepost {
                reason: "must be a finite number",
            });
        }
        if km < 0.0 {
            return Err(InvalidMilepost {
                reason: "must not be negative",
            });
        }
        if km > MAX_KM {
            return Err(InvalidMilepost {
                reason: "must not exceed 100000 km",
            });
        }
        // Normalise -0.0 so it renders as "0.000".
        Ok(Milepost(km + 0.0))
    }

    /// Parse a plain decimal such as `"12.5"` or `"7"`.
    ///
    /// Grouping separators and exponents are rejected.
    pub fn parse(s: &str) -> Result<Self, InvalidMilepost> {
        let s = s.trim();
        let well_formed = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+')
            && s.bytes().filter(|&b| b == b'.').count() <= 1
            && s.bytes().any(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(InvalidMilepost {
                reason: "must be a decimal number",
            });
        }
        let km: f64 = s.parse().map_err(|_| InvalidMilepost {
            reason: "must be a decimal number",
        })?;
        Self::new(km)
    }

    /// The raw kilometre value.
    pub fn km(&self) -> f64 {
        self.0
    }

    /// The position rounded half away from zero to whole metres.
    ///
    /// Two mileposts are distinct upstream only if their metres differ.
    pub fn metres(&self) -> u64 {
        // Bounded by MAX_KM, so the cast cannot saturate.
        (self.0 * 1000.0).round() as u64
    }

    /// Fixed-point form with exactly three fractional digits and no grouping,
    /// rounding half away from zero: `5` becomes `"5.000"`.
    pub fn query_value(&self) -> String {
        let metres = self.metres();
        format!("{}.{:03}", metres / 1000, metres % 1000)
    }
}

impl TryFrom<f64> for Milepost {
    type Error = InvalidMilepost;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Milepost> for f64 {
    fn from(milepost: Milepost) -> Self {
        milepost.0
    }
}

impl fmt::Debug for Milepost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Milepost({})", self.query_value())
    }
}

impl fmt::Display for Milepost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_value())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Exactly three fractional digits and only digits around the point.
        #[test]
        fn always_three_fraction_digits(km in 0.0f64..100_000.0) {
            let value = Milepost::new(km).unwrap().query_value();
            let (whole, frac) = value.split_once('.').unwrap();
            prop_assert!(!whole.is_empty());
            prop_assert!(whole.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(frac.len(), 3);
            prop_assert!(frac.bytes().all(|b| b.is_ascii_digit()));
        }

        /// The rendered value is within half a millimetre of the input.
        #[test]
        fn rendering_is_close(km in 0.0f64..100_000.0) {
            let rendered: f64 = Milepost::new(km).unwrap().query_value().parse().unwrap();
            prop_assert!((rendered - km).abs() <= 0.0005 + 1e-9);
        }

        /// Whole metres render exactly.
        #[test]
        fn whole_metres_exact(metres in 0u64..10_000_000) {
            let km = metres as f64 / 1000.0;
            let expected = format!("{}.{:03}", metres / 1000, metres % 1000);
            prop_assert_eq!(Milepost::new(km).unwrap().query_value(), expected);
        }
    }
}
