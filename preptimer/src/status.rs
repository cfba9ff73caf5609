//! Live countdown report for `preptimer status` and the order board.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::countdown::calculate_timer_state;
use crate::core::format::format_timer;
use crate::core::preparing::is_order_preparing;
use crate::core::types::TimerState;
use crate::io::snapshot_store::{OrderRecord, load_orders};

/// Countdown line for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    pub id: String,
    pub preparing: bool,
    /// `MM:SS`, `+MM:SS` once overtime, `-` when there is no countdown.
    pub display: String,
    pub state: TimerState,
}

/// Build a status row; orders outside the preparing phase get the zero state.
pub fn status_row(record: &OrderRecord, now: DateTime<Utc>) -> StatusRow {
    let preparing = is_order_preparing(Some(&record.snapshot));
    if !preparing {
        return StatusRow {
            id: record.id.clone(),
            preparing,
            display: "-".to_string(),
            state: TimerState::zero(),
        };
    }
    let state = calculate_timer_state(Some(&record.snapshot), now);
    let display = if state.has_window() {
        format_timer(&state)
    } else {
        "-".to_string()
    };
    StatusRow {
        id: record.id.clone(),
        preparing,
        display,
        state,
    }
}

/// Status rows in file order.
pub fn status_rows(records: &[OrderRecord], now: DateTime<Utc>) -> Vec<StatusRow> {
    records.iter().map(|record| status_row(record, now)).collect()
}

/// Load an order file and report every order at `now`.
pub fn status_from_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<StatusRow>> {
    let records = load_orders(path).with_context(|| "load orders for status")?;
    Ok(status_rows(&records, now))
}

/// Single-line text rendering of a row.
pub fn render_row(row: &StatusRow) -> String {
    if !row.preparing {
        return format!("{} idle", row.id);
    }
    if !row.state.has_window() {
        return format!("{} untimed", row.id);
    }
    format!(
        "{} {} {} progress={:.1}%",
        row.id,
        if row.state.is_overtime {
            "overtime"
        } else {
            "remaining"
        },
        row.display,
        row.state.progress_percent
    )
}
