//! Federal highway route numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid route number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route number: {reason}")]
pub struct InvalidRouteNumber {
    reason: &'static str,
}

/// A federal highway number (the `BR` in `BR-040`).
///
/// Stored numerically so that `"40"` and `"040"` are the same route. Always
/// rendered zero-padded to three digits, which is the form the upstream
/// geometry service expects.
///
/// # Examples
///
/// ```
/// use segment_server::domain::RouteNumber;
///
/// let br = RouteNumber::parse("10").unwrap();
/// assert_eq!(br.query_value(), "010");
/// assert_eq!(RouteNumber::parse("010").unwrap(), br);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteNumber(u16);

impl RouteNumber {
    /// Parse a route number made of 1 to 3 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteNumber> {
        let s = s.trim();

        if s.is_empty() || s.len() > 3 {
            return Err(InvalidRouteNumber {
                reason: "must be 1 to 3 digits",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidRouteNumber {
                reason: "must contain only digits",
            });
        }

        s.parse().map(RouteNumber).map_err(|_| InvalidRouteNumber {
            reason: "must be 1 to 3 digits",
        })
    }

    /// The numeric value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Zero-padded 3-character form, e.g. `"010"`.
    pub fn query_value(&self) -> String {
        format!("{:03}", self.0)
    }
}

impl TryFrom<String> for RouteNumber {
    type Error = InvalidRouteNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RouteNumber> for String {
    fn from(route: RouteNumber) -> Self {
        route.query_value()
    }
}

impl fmt::Debug for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteNumber({:03})", self.0)
    }
}

impl fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_three_digits() {
        assert_eq!(RouteNumber::parse("10").unwrap().query_value(), "010");
        assert_eq!(RouteNumber::parse("7").unwrap().query_value(), "007");
        assert_eq!(RouteNumber::parse("040").unwrap().query_value(), "040");
        assert_eq!(RouteNumber::parse("479").unwrap().query_value(), "479");
    }

    #[test]
    fn rejects_non_digits_and_long_input() {
        assert!(RouteNumber::parse("").is_err());
        assert!(RouteNumber::parse("BR-040").is_err());
        assert!(RouteNumber::parse("4a").is_err());
        assert!(RouteNumber::parse("1000").is_err());
        assert!(RouteNumber::parse("-10").is_err());
    }

    #[test]
    fn padded_and_unpadded_are_equal() {
        assert_eq!(
            RouteNumber::parse("40").unwrap(),
            RouteNumber::parse("040").unwrap()
        );
    }

    #[test]
    fn serde_uses_padded_string() {
        let route = RouteNumber::parse("50").unwrap();
        assert_eq!(serde_json::to_string(&route).unwrap(), "\"050\"");
        let back: RouteNumber = serde_json::from_str("\"50\"").unwrap();
        assert_eq!(back, route);
    }
}
