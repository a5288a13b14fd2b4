//! Canonical byte encoding for typed values.
//!
//! Every value kind has exactly one byte representation, and both ends of
//! the pipeline depend on it byte-for-byte: the blind index hashes the
//! canonical bytes, and decryption parses them back into a typed value. The
//! encoding is a pure function of (value, kind, timezone policy) — nothing
//! here may consult ambient locale or clock state.

use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical date format (ISO-8601).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical naive datetime format: ISO-8601 without offset, fractional
/// seconds printed only when non-zero.
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Closed enumeration of storable value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `"True"` / `"False"`
    Boolean,
    /// Decimal string of a 64-bit signed integer
    Integer,
    /// Shortest round-trip fixed-point decimal string
    Decimal,
    /// UTF-8 text
    Text,
    /// ISO-8601 `YYYY-MM-DD`
    Date,
    /// ISO-8601, with or without UTC offset per the field's timezone policy
    DateTime,
    /// Raw bytes, unencoded; never searchable
    Binary,
    /// Compact JSON with sorted object keys
    Json,
}

impl ValueKind {
    /// Returns the kind's lowercase name, as used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a datetime field stores offset-carrying or naive values.
///
/// Fixed per field, never inferred per value: round-trips must be
/// deterministic regardless of what a particular row happens to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// Values carry an offset and are normalized to UTC on encode.
    #[default]
    Utc,
    /// Values are naive; the canonical form carries no offset.
    Naive,
}

/// A typed domain value accepted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    /// Timezone-aware datetime, for fields with [`TimezonePolicy::Utc`].
    DateTime(DateTime<Utc>),
    /// Naive datetime, for fields with [`TimezonePolicy::Naive`].
    NaiveDateTime(NaiveDateTime),
    Binary(Vec<u8>),
    Json(serde_json::Value),
}

impl Value {
    /// Returns the kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Text(_) => ValueKind::Text,
            Self::Date(_) => ValueKind::Date,
            Self::DateTime(_) | Self::NaiveDateTime(_) => ValueKind::DateTime,
            Self::Binary(_) => ValueKind::Binary,
            Self::Json(_) => ValueKind::Json,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::NaiveDateTime(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Encodes a value into its canonical bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the value does not match the declared
/// kind, a datetime value contradicts the field's timezone policy, or a
/// JSON value is not serializable.
pub fn encode(value: &Value, kind: ValueKind, policy: TimezonePolicy) -> Result<Vec<u8>, Error> {
    match (kind, value) {
        (ValueKind::Boolean, Value::Boolean(v)) => {
            Ok(if *v { b"True".to_vec() } else { b"False".to_vec() })
        }
        (ValueKind::Integer, Value::Integer(v)) => Ok(v.to_string().into_bytes()),
        (ValueKind::Decimal, Value::Decimal(v)) => Ok(v.to_string().into_bytes()),
        (ValueKind::Text, Value::Text(v)) => Ok(v.clone().into_bytes()),
        (ValueKind::Date, Value::Date(v)) => {
            Ok(v.format(DATE_FORMAT).to_string().into_bytes())
        }
        (ValueKind::DateTime, Value::DateTime(v)) => match policy {
            TimezonePolicy::Utc => {
                Ok(v.to_rfc3339_opts(SecondsFormat::AutoSi, false).into_bytes())
            }
            TimezonePolicy::Naive => Err(Error::Encoding(
                "naive datetime field received a timezone-aware value".to_string(),
            )),
        },
        (ValueKind::DateTime, Value::NaiveDateTime(v)) => match policy {
            TimezonePolicy::Naive => {
                Ok(v.format(NAIVE_DATETIME_FORMAT).to_string().into_bytes())
            }
            TimezonePolicy::Utc => Err(Error::Encoding(
                "timezone-aware datetime field received a naive value".to_string(),
            )),
        },
        (ValueKind::Binary, Value::Binary(v)) => Ok(v.clone()),
        (ValueKind::Json, Value::Json(v)) => serde_json::to_vec(v)
            .map_err(|e| Error::Encoding(format!("JSON value is not serializable: {e}"))),
        (kind, value) => Err(Error::Encoding(format!(
            "value of kind `{}` does not match field kind `{kind}`",
            value.kind()
        ))),
    }
}

/// Parses canonical bytes back into a typed value.
///
/// Inverse of [`encode`] for every kind; binary is the identity.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a canonical encoding of
/// the declared kind.
pub fn decode(bytes: &[u8], kind: ValueKind, policy: TimezonePolicy) -> Result<Value, Error> {
    if kind == ValueKind::Binary {
        return Ok(Value::Binary(bytes.to_vec()));
    }

    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Encoding(format!("{kind} value is not valid UTF-8: {e}")))?;

    match kind {
        ValueKind::Boolean => match text {
            "True" => Ok(Value::Boolean(true)),
            "False" => Ok(Value::Boolean(false)),
            other => Err(Error::Encoding(format!("invalid boolean literal: `{other}`"))),
        },
        ValueKind::Integer => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| Error::Encoding(format!("invalid integer `{text}`: {e}"))),
        ValueKind::Decimal => text
            .parse::<Decimal>()
            .map(Value::Decimal)
            .map_err(|e| Error::Encoding(format!("invalid decimal `{text}`: {e}"))),
        ValueKind::Text => Ok(Value::Text(text.to_string())),
        ValueKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| Error::Encoding(format!("invalid date `{text}`: {e}"))),
        ValueKind::DateTime => match policy {
            TimezonePolicy::Utc => DateTime::parse_from_rfc3339(text)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| Error::Encoding(format!("invalid datetime `{text}`: {e}"))),
            TimezonePolicy::Naive => text
                .parse::<NaiveDateTime>()
                .map(Value::NaiveDateTime)
                .map_err(|e| Error::Encoding(format!("invalid naive datetime `{text}`: {e}"))),
        },
        ValueKind::Json => serde_json::from_slice(bytes)
            .map(Value::Json)
            .map_err(|e| Error::Encoding(format!("invalid JSON document: {e}"))),
        ValueKind::Binary => unreachable!("handled above"),
    }
}
