//! Value types returned by the timer engine.
//!
//! Every type here is computed, returned and discarded. None of them is stored
//! by the engine, and all of them serialize to `camelCase` JSON for display or
//! logging.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Live countdown for one snapshot at one instant.
///
/// While counting down, `remaining_seconds` is the time until the deadline.
/// Once the deadline has passed it holds the elapsed overtime instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub is_overtime: bool,
    /// Window progress in `[0, 100]`.
    pub progress_percent: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Sentinel returned for snapshots that cannot drive a countdown.
    pub fn zero() -> Self {
        Self {
            remaining_seconds: 0,
            is_overtime: false,
            progress_percent: 0.0,
            start_time: None,
            end_time: None,
        }
    }

    /// True when the state carries a resolved preparation window.
    pub fn has_window(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Estimated vs. actual preparation duration for a finished order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingSummary {
    pub estimated_minutes: Option<f64>,
    pub actual_minutes: Option<f64>,
    /// Present only when actual exceeded the estimate.
    pub overtime_minutes: Option<f64>,
    pub has_timing_data: bool,
    pub was_on_time: bool,
    pub was_overtime: bool,
}

/// Outcome of validating a user-entered preparation estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Three-way classification of a finished order's timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingStatusKind {
    NoData,
    OnTime,
    Overtime,
}

/// Display badge for a finished order's timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingStatus {
    pub status: TimingStatusKind,
    pub color: &'static str,
    pub icon: &'static str,
    pub label: String,
}

/// Aggregate timing accuracy over many finished orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub orders: usize,
    /// Orders with both an estimate and a measured duration.
    pub tracked: usize,
    pub on_time: usize,
    pub overtime: usize,
    /// `on_time / tracked`, absent when nothing was tracked.
    pub on_time_rate: Option<f64>,
    pub average_actual_minutes: Option<f64>,
    /// Mean overtime across overtime orders only.
    pub average_overtime_minutes: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_serializes_with_null_window() {
        let json = serde_json::to_value(TimerState::zero()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "remainingSeconds": 0,
                "isOvertime": false,
                "progressPercent": 0.0,
                "startTime": null,
                "endTime": null
            })
        );
    }

    #[test]
    fn timing_status_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&TimingStatusKind::NoData).expect("serialize");
        assert_eq!(json, "\"no-data\"");
    }
}
