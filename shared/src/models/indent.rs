//! Indent number formatting and parsing
//!
//! An indent number identifies a fulfilled order and is built from a
//! prefix, the fulfillment date and a per-day sequence value, rendered
//! as `KIET20250115/3`. Sequence values start at 1 each day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fully-formed indent number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndentNumber {
    prefix: String,
    date: NaiveDate,
    sequence: u32,
}

impl IndentNumber {
    /// Compose an indent number from its parts
    ///
    /// Returns an error if the prefix is empty or contains the `/`
    /// separator, or if the sequence is zero.
    pub fn new(
        prefix: impl Into<String>,
        date: NaiveDate,
        sequence: u32,
    ) -> Result<Self, IndentNumberError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(IndentNumberError::EmptyPrefix);
        }
        if prefix.contains('/') {
            return Err(IndentNumberError::PrefixContainsSeparator);
        }
        if sequence == 0 {
            return Err(IndentNumberError::ZeroSequence);
        }
        Ok(Self {
            prefix,
            date,
            sequence,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Filename-safe form with the `/` separator replaced by `-`,
    /// e.g. `KIET20250115-3`
    pub fn file_stem(&self) -> String {
        self.to_string().replace('/', "-")
    }
}

impl std::fmt::Display for IndentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}/{}",
            self.prefix,
            self.date.format("%Y%m%d"),
            self.sequence
        )
    }
}

impl std::str::FromStr for IndentNumber {
    type Err = IndentNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, seq) = s.split_once('/').ok_or(IndentNumberError::MissingSeparator)?;
        let sequence: u32 = seq
            .parse()
            .map_err(|_| IndentNumberError::BadSequence(seq.to_string()))?;
        if sequence == 0 {
            return Err(IndentNumberError::ZeroSequence);
        }
        if head.len() <= 8 {
            return Err(IndentNumberError::EmptyPrefix);
        }
        let (prefix, date_str) = head.split_at(head.len() - 8);
        if !date_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IndentNumberError::BadDate(date_str.to_string()));
        }
        let date = NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .map_err(|_| IndentNumberError::BadDate(date_str.to_string()))?;
        Ok(Self {
            prefix: prefix.to_string(),
            date,
            sequence,
        })
    }
}

impl TryFrom<String> for IndentNumber {
    type Error = IndentNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndentNumber> for String {
    fn from(value: IndentNumber) -> Self {
        value.to_string()
    }
}

/// Errors for malformed indent numbers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndentNumberError {
    #[error("indent number has no '/' separator")]
    MissingSeparator,
    #[error("indent number prefix is empty")]
    EmptyPrefix,
    #[error("indent number prefix must not contain '/'")]
    PrefixContainsSeparator,
    #[error("invalid date in indent number: {0}")]
    BadDate(String),
    #[error("invalid sequence in indent number: {0}")]
    BadSequence(String),
    #[error("indent sequence starts at 1")]
    ZeroSequence,
}
