//! Well-known types: `google.protobuf.Timestamp`, `Duration` and `Any`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::descriptor::{FieldKind, MessageDescriptor};
use crate::encoder::ProtoEncoder;
use crate::error::{EncodeError, JsonError, SchemaError};
use crate::value::{MessageValue, ProtoValue};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// `0001-01-01T00:00:00Z`
const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// `9999-12-31T23:59:59Z`
const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

// ---------------------------------------------------------------- Timestamp

/// A point in time as seconds and nanoseconds since the Unix epoch.
///
/// `nanos` is always in `0..1_000_000_000`, also for instants before the
/// epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }

    /// RFC 3339 in UTC with 0, 3, 6 or 9 fractional digits.
    pub fn to_rfc3339(&self) -> Result<String, JsonError> {
        if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&self.seconds) {
            return Err(JsonError::InvalidTimestamp(format!(
                "{} seconds is out of range",
                self.seconds
            )));
        }
        let datetime = self.to_datetime().ok_or_else(|| {
            JsonError::InvalidTimestamp(format!("{}s {}ns", self.seconds, self.nanos))
        })?;
        Ok(datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    /// Parses RFC 3339; any offset is normalized to UTC.
    pub fn parse_rfc3339(text: &str) -> Result<Self, JsonError> {
        let datetime = DateTime::parse_from_rfc3339(text)
            .map_err(|err| JsonError::InvalidTimestamp(format!("{text:?}: {err}")))?;
        let timestamp = Self::from(datetime.with_timezone(&Utc));
        if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&timestamp.seconds) {
            return Err(JsonError::InvalidTimestamp(format!("{text:?} is out of range")));
        }
        Ok(timestamp)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(val: DateTime<Utc>) -> Self {
        Self {
            seconds: val.timestamp(),
            nanos: val.timestamp_subsec_nanos() as i32,
        }
    }
}

// ---------------------------------------------------------------- Duration

/// A signed span of time. `seconds` and `nanos` never have opposite signs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    pub seconds: i64,
    pub nanos: i32,
}

impl Duration {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn total_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND + self.nanos as i128
    }

    pub fn from_nanos(total: i128) -> Option<Self> {
        let seconds = i64::try_from(total / NANOS_PER_SECOND).ok()?;
        let nanos = (total % NANOS_PER_SECOND) as i32;
        Some(Self { seconds, nanos })
    }

    /// `None` for negative durations.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        let seconds = u64::try_from(self.seconds).ok()?;
        let nanos = u32::try_from(self.nanos).ok()?;
        Some(std::time::Duration::new(seconds, nanos))
    }

    /// Parses the JSON form, e.g. `"1.5s"` or `"-0.000000001s"`.
    pub fn parse_json(text: &str) -> Result<Self, JsonError> {
        let invalid = || JsonError::InvalidDuration(text.to_string());
        let body = text.strip_suffix('s').ok_or_else(invalid)?;
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seconds: i64 = whole.parse().map_err(|_| invalid())?;
        let nanos: i32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}").parse().map_err(|_| invalid())?
        };
        Ok(if negative {
            Self::new(-seconds, -nanos)
        } else {
            Self::new(seconds, nanos)
        })
    }
}

/// The JSON form: seconds with 0, 3, 6 or 9 fractional digits and an `s`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 || self.nanos < 0 { "-" } else { "" };
        let seconds = self.seconds.unsigned_abs();
        let nanos = self.nanos.unsigned_abs();
        if nanos == 0 {
            write!(f, "{sign}{seconds}s")
        } else if nanos % 1_000_000 == 0 {
            write!(f, "{sign}{seconds}.{:03}s", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            write!(f, "{sign}{seconds}.{:06}s", nanos / 1_000)
        } else {
            write!(f, "{sign}{seconds}.{nanos:09}s")
        }
    }
}

impl From<std::time::Duration> for Duration {
    fn from(val: std::time::Duration) -> Self {
        Self {
            seconds: i64::try_from(val.as_secs()).unwrap_or(i64::MAX),
            nanos: val.subsec_nanos() as i32,
        }
    }
}

// ---------------------------------------------------------------- Any

/// A message of any type together with its type URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Encodes `message` and wraps it under the descriptor's type URL.
    pub fn pack(message: &MessageValue, descriptor: &MessageDescriptor) -> Result<Self, EncodeError> {
        let value = ProtoEncoder::new().encode(message, descriptor)?;
        Ok(Self::new(descriptor.type_url(), value))
    }

    /// The `google.protobuf.Any` message value.
    pub fn to_message(&self) -> MessageValue {
        MessageValue::new()
            .with("type_url", self.type_url.as_str())
            .with("value", self.value.clone())
    }

    /// Reads a `google.protobuf.Any` message value; missing fields default.
    pub fn from_message(message: &MessageValue) -> Result<Self, SchemaError> {
        let type_url = match message.get("type_url") {
            None => String::new(),
            Some(ProtoValue::String(s)) => s.clone(),
            Some(_) => return Err(SchemaError::InvalidAny("type_url is not a string")),
        };
        let value = match message.get("value") {
            None => Vec::new(),
            Some(ProtoValue::Bytes(b)) => b.clone(),
            Some(_) => return Err(SchemaError::InvalidAny("value is not bytes")),
        };
        Ok(Self { type_url, value })
    }
}

// ---------------------------------------------------------------- descriptors

pub fn timestamp_descriptor() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("google.protobuf.Timestamp")
            .field("seconds", 1, FieldKind::Int64)
            .field("nanos", 2, FieldKind::Int32),
    )
}

pub fn duration_descriptor() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("google.protobuf.Duration")
            .field("seconds", 1, FieldKind::Int64)
            .field("nanos", 2, FieldKind::Int32),
    )
}

pub fn any_descriptor() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new("google.protobuf.Any")
            .field("type_url", 1, FieldKind::String)
            .field("value", 2, FieldKind::Bytes),
    )
}
