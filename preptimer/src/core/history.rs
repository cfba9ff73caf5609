//! Post-hoc timing accuracy for finished orders.
//!
//! Compares the estimate against the measured `[preparingAt, readyAt]`
//! duration. Missing or inconsistent data yields `None` or an empty summary.

use crate::core::format::{format_minutes, format_overtime_minutes};
use crate::core::snapshot::OrderSnapshot;
use crate::core::types::{HistoryReport, TimingStatus, TimingStatusKind, TimingSummary};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Measured preparation duration, rounded to the nearest whole minute.
///
/// `None` unless both timestamps parse and `readyAt >= preparingAt`.
pub fn get_actual_preparation_time(snapshot: Option<&OrderSnapshot>) -> Option<f64> {
    let snapshot = snapshot?;
    let started = snapshot.started_at()?;
    let finished = snapshot.finished_at()?;
    if finished < started {
        return None;
    }
    let millis = finished.signed_duration_since(started).num_milliseconds();
    Some((millis as f64 / MILLIS_PER_MINUTE).round())
}

/// Minutes past the estimate; `None` when on time, early, or unmeasurable.
pub fn get_overtime_duration(snapshot: Option<&OrderSnapshot>) -> Option<f64> {
    let actual = get_actual_preparation_time(snapshot)?;
    let estimated = snapshot?.estimated_minutes()?;
    let overtime = actual - estimated;
    (overtime > 0.0).then_some(overtime)
}

pub fn get_timing_summary(snapshot: Option<&OrderSnapshot>) -> TimingSummary {
    let estimated_minutes = snapshot.and_then(OrderSnapshot::estimated_minutes);
    let actual_minutes = get_actual_preparation_time(snapshot);
    let overtime_minutes = get_overtime_duration(snapshot);
    let has_timing_data = estimated_minutes.is_some() && actual_minutes.is_some();
    TimingSummary {
        estimated_minutes,
        actual_minutes,
        overtime_minutes,
        has_timing_data,
        was_on_time: has_timing_data && overtime_minutes.is_none(),
        was_overtime: has_timing_data && overtime_minutes.is_some_and(|minutes| minutes > 0.0),
    }
}

/// One-line comparison of actual vs. estimated preparation time.
pub fn format_timing_comparison(snapshot: Option<&OrderSnapshot>) -> String {
    let summary = get_timing_summary(snapshot);
    let (Some(actual), Some(estimated)) = (summary.actual_minutes, summary.estimated_minutes)
    else {
        return "Preparation timing was not tracked".to_string();
    };
    let head = format!(
        "Prepared in {} min (estimated {} min)",
        format_minutes(actual),
        format_minutes(estimated)
    );
    match summary.overtime_minutes {
        Some(overtime) => {
            format!("{head}, {} min overtime", format_overtime_minutes(overtime))
        }
        None => format!("{head}, on time"),
    }
}

pub fn get_timing_status(snapshot: Option<&OrderSnapshot>) -> TimingStatus {
    let summary = get_timing_summary(snapshot);
    if !summary.has_timing_data {
        return TimingStatus {
            status: TimingStatusKind::NoData,
            color: "gray",
            icon: "⏱️",
            label: "No timing data".to_string(),
        };
    }
    match summary.overtime_minutes {
        Some(overtime) if summary.was_overtime => TimingStatus {
            status: TimingStatusKind::Overtime,
            color: "red",
            icon: "⚠️",
            label: format!("+{}min overtime", format_overtime_minutes(overtime)),
        },
        _ => TimingStatus {
            status: TimingStatusKind::OnTime,
            color: "green",
            icon: "✅",
            label: "On time".to_string(),
        },
    }
}

/// Aggregate timing accuracy across finished orders.
pub fn summarize_history<'a, I>(snapshots: I) -> HistoryReport
where
    I: IntoIterator<Item = &'a OrderSnapshot>,
{
    let mut orders = 0usize;
    let mut tracked = 0usize;
    let mut on_time = 0usize;
    let mut overtime = 0usize;
    let mut actual_total = 0.0;
    let mut overtime_total = 0.0;

    for snapshot in snapshots {
        orders += 1;
        let summary = get_timing_summary(Some(snapshot));
        if !summary.has_timing_data {
            continue;
        }
        tracked += 1;
        actual_total += summary.actual_minutes.unwrap_or_default();
        if summary.was_on_time {
            on_time += 1;
        }
        if let Some(minutes) = summary.overtime_minutes {
            overtime += 1;
            overtime_total += minutes;
        }
    }

    HistoryReport {
        orders,
        tracked,
        on_time,
        overtime,
        on_time_rate: ratio(on_time as f64, tracked),
        average_actual_minutes: ratio(actual_total, tracked),
        average_overtime_minutes: ratio(overtime_total, overtime),
    }
}

fn ratio(total: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| total / count as f64)
}
