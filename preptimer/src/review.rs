//! Timing review of finished orders for `preptimer history`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::history::{
    format_timing_comparison, get_timing_status, get_timing_summary, summarize_history,
};
use crate::core::types::{HistoryReport, TimingStatus, TimingSummary};
use crate::io::snapshot_store::{OrderRecord, load_orders};

/// Per-order review line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub id: String,
    pub comparison: String,
    pub status: TimingStatus,
    pub summary: TimingSummary,
}

/// Per-order rows plus the aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub rows: Vec<ReviewRow>,
    pub report: HistoryReport,
}

pub fn review_orders(records: &[OrderRecord]) -> Review {
    let rows = records
        .iter()
        .map(|record| ReviewRow {
            id: record.id.clone(),
            comparison: format_timing_comparison(Some(&record.snapshot)),
            status: get_timing_status(Some(&record.snapshot)),
            summary: get_timing_summary(Some(&record.snapshot)),
        })
        .collect();
    let report = summarize_history(records.iter().map(|record| &record.snapshot));
    Review { rows, report }
}

/// Load an order file and review every order in it.
pub fn review_from_file(path: &Path) -> Result<Review> {
    let records = load_orders(path).with_context(|| "load orders for review")?;
    Ok(review_orders(&records))
}

/// Text rendering: one line per order, then the aggregate.
pub fn render_review(review: &Review) -> Vec<String> {
    let mut lines: Vec<String> = review
        .rows
        .iter()
        .map(|row| format!("{} [{}] {}", row.id, row.status.label, row.comparison))
        .collect();
    let report = &review.report;
    lines.push(format!(
        "orders={} tracked={} on_time={} overtime={}",
        report.orders, report.tracked, report.on_time, report.overtime
    ));
    if let Some(rate) = report.on_time_rate {
        lines.push(format!("on_time_rate={:.1}%", rate * 100.0));
    }
    if let Some(avg) = report.average_overtime_minutes {
        lines.push(format!("avg_overtime_minutes={:.1}", avg));
    }
    lines
}
