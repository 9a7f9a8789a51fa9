//! The date a segment's geometry refers to.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted input formats: ISO (HTML date inputs) and day-first.
const FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Error returned for an unparseable reference date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reference date: {input:?}")]
pub struct InvalidReferenceDate {
    input: String,
}

/// A validated calendar date that remembers how the caller wrote it.
///
/// The upstream service receives the date exactly as submitted, so the raw
/// text is kept alongside the parsed value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceDate {
    raw: String,
    date: NaiveDate,
}

impl ReferenceDate {
    /// Parse `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub fn parse(s: &str) -> Result<Self, InvalidReferenceDate> {
        let raw = s.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .map(|date| Self {
                raw: raw.to_string(),
                date,
            })
            .ok_or_else(|| InvalidReferenceDate {
                input: s.to_string(),
            })
    }

    /// The date as the caller wrote it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl TryFrom<String> for ReferenceDate {
    type Error = InvalidReferenceDate;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferenceDate> for String {
    fn from(date: ReferenceDate) -> Self {
        date.raw
    }
}

impl fmt::Debug for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceDate({})", self.date)
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
