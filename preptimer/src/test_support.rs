//! Test-only builders for snapshots and order records.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::core::snapshot::{OrderSnapshot, Timestamp};
use crate::io::snapshot_store::OrderRecord;

/// Fixed reference instant used as "now" across tests.
pub fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid reference instant")
}

/// Instant `seconds` before [`base_instant`].
pub fn seconds_ago(seconds: i64) -> DateTime<Utc> {
    base_instant() - TimeDelta::seconds(seconds)
}

/// Snapshot of an order that started preparing at `started`.
pub fn preparing_snapshot(minutes: f64, started: DateTime<Utc>) -> OrderSnapshot {
    OrderSnapshot {
        status: Some("preparing".to_string()),
        preparation_time: Some(minutes),
        preparing_at: Some(Timestamp::from(started)),
        ready_at: None,
    }
}

/// Snapshot of an order that was ready `took` after `started`.
pub fn completed_snapshot(minutes: f64, started: DateTime<Utc>, took: TimeDelta) -> OrderSnapshot {
    OrderSnapshot {
        status: Some("completed".to_string()),
        preparation_time: Some(minutes),
        preparing_at: Some(Timestamp::from(started)),
        ready_at: Some(Timestamp::from(started + took)),
    }
}

pub fn record(id: &str, snapshot: OrderSnapshot) -> OrderRecord {
    OrderRecord::new(id, snapshot)
}
