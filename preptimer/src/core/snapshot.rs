//! Order snapshot: the read-only input of the timer engine.
//!
//! Snapshots are produced by an external order system and are untrusted.
//! Decoding is total: any JSON value becomes an [`OrderSnapshot`], and fields
//! that cannot be used are left as `None` so the engine can fall back to its
//! sentinel values instead of failing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ISO-8601 layouts with an offset that RFC 3339 rejects: minute precision,
/// `Z`, or an offset without a colon.
const OFFSET_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Offset-less layouts. These are read as UTC.
const NAIVE_LAYOUTS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Lifecycle phase of an order, owned by the external order system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPhase {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Status tag that does not name a known lifecycle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPhase(pub String);

impl fmt::Display for UnknownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status '{}'", self.0)
    }
}

impl std::error::Error for UnknownPhase {}

impl FromStr for OrderPhase {
    type Err = UnknownPhase;

    /// Status tags arrive both lowercase and uppercase; comparison ignores case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownPhase(raw.to_string())),
        }
    }
}

/// Raw timestamp as stored by the order system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// ISO-8601 / RFC 3339 text.
    Text(String),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
}

impl Timestamp {
    /// Resolve to an instant, or `None` when the value does not parse.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Text(text) => parse_text(text),
            Timestamp::EpochMillis(millis) => Utc.timestamp_millis_opt(*millis).single(),
        }
    }

    /// True when the raw value is non-empty (the order system set the field).
    pub fn is_set(&self) -> bool {
        match self {
            Timestamp::Text(text) => !text.is_empty(),
            Timestamp::EpochMillis(millis) => *millis != 0,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::Text(instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(text, layout).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
    {
        return Some(naive.and_utc());
    }
    // Date only: midnight UTC.
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Point-in-time view of an order's preparation-relevant fields.
///
/// Deserializes from any JSON value. Both `camelCase` and `snake_case` keys
/// are accepted; serialization emits `camelCase`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct OrderSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Estimated preparation duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<Timestamp>,
}

impl OrderSnapshot {
    /// Decode a snapshot from an arbitrary JSON value.
    ///
    /// Non-objects yield an empty snapshot. Numeric strings are coerced for
    /// `preparationTime`; numbers are read as epoch milliseconds for timestamps.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            status: field(fields, "status", "status").and_then(decode_status),
            preparation_time: field(fields, "preparationTime", "preparation_time")
                .and_then(decode_minutes),
            preparing_at: field(fields, "preparingAt", "preparing_at").and_then(decode_timestamp),
            ready_at: field(fields, "readyAt", "ready_at").and_then(decode_timestamp),
        }
    }

    /// Lifecycle phase, if the status names a known one.
    pub fn phase(&self) -> Option<OrderPhase> {
        self.status.as_deref()?.parse().ok()
    }

    /// Instant preparation began.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.preparing_at.as_ref()?.parse()
    }

    /// Instant preparation finished.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.ready_at.as_ref()?.parse()
    }

    /// Estimate usable for historical comparison: finite and positive.
    pub fn estimated_minutes(&self) -> Option<f64> {
        self.preparation_time
            .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
    }
}

impl From<Value> for OrderSnapshot {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn field<'a>(fields: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    fields.get(camel).or_else(|| fields.get(snake))
}

fn decode_status(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn decode_minutes(value: &Value) -> Option<f64> {
    let minutes = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    minutes.is_finite().then_some(minutes)
}

fn decode_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(text) => Some(Timestamp::Text(text.clone())),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
            .map(Timestamp::EpochMillis),
        _ => None,
    }
}
