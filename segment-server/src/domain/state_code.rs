//! Federative unit (state) codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid state code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid state code: {reason}")]
pub struct InvalidStateCode {
    reason: &'static str,
}

/// A valid two-letter state abbreviation (e.g. `MG`, `SP`).
///
/// This is the short code sent to the upstream service as `uf`. It is
/// distinct from the internal [`StateId`](super::StateId) used by forms and
/// the record store.
///
/// # Examples
///
/// ```
/// use segment_server::domain::StateCode;
///
/// let mg = StateCode::parse("MG").unwrap();
/// assert_eq!(mg.as_str(), "MG");
///
/// assert!(StateCode::parse("mg").is_err());
/// assert!(StateCode::parse("MGX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode([u8; 2]);

impl StateCode {
    /// Parse a state code. The input must be exactly 2 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidStateCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidStateCode {
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidStateCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(StateCode([bytes[0], bytes[1]]))
    }

    /// Parse after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStateCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl TryFrom<String> for StateCode {
    type Error = InvalidStateCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Debug for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCode({})", self.as_str())
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(StateCode::parse("MG").is_ok());
        assert!(StateCode::parse("SP").is_ok());
        assert!(StateCode::parse("DF").is_ok());
    }

    #[test]
    fn reject_lowercase_and_length() {
        assert!(StateCode::parse("mg").is_err());
        assert!(StateCode::parse("Mg").is_err());
        assert!(StateCode::parse("").is_err());
        assert!(StateCode::parse("M").is_err());
        assert!(StateCode::parse("MGS").is_err());
        assert!(StateCode::parse("M1").is_err());
    }

    #[test]
    fn parse_normalized_accepts_lowercase() {
        let code = StateCode::parse_normalized(" rj ").unwrap();
        assert_eq!(code.as_str(), "RJ");
    }

    #[test]
    fn serde_as_plain_string() {
        let code = StateCode::parse("BA").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"BA\"");

        let back: StateCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);

        assert!(serde_json::from_str::<StateCode>("\"bahia\"").is_err());
    }

    #[test]
    fn debug_and_display() {
        let code = StateCode::parse("PR").unwrap();
        assert_eq!(format!("{code}"), "PR");
        assert_eq!(format!("{code:?}"), "StateCode(PR)");
    }
}
