//! Wall-clock countdown for a single preparation window.
//!
//! The window is `[preparingAt, preparingAt + preparationTime]`. Results depend
//! only on the snapshot and the instant passed in, so many timers can be
//! recomputed independently and a restarted process reproduces the same state.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::core::clock::Clock;
use crate::core::snapshot::OrderSnapshot;
use crate::core::types::TimerState;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Compute the live countdown for `snapshot` at `now`.
///
/// Returns [`TimerState::zero`] when the snapshot is absent, lacks a
/// preparation time or start, has an unparsable start, or has a negative
/// (or non-finite) estimate. A start in the future is tolerated: the timer
/// counts down from beyond the nominal window with progress held at 0.
pub fn calculate_timer_state(
    snapshot: Option<&OrderSnapshot>,
    now: DateTime<Utc>,
) -> TimerState {
    match resolve_window(snapshot) {
        Some(window) => window.state_at(now),
        None => TimerState::zero(),
    }
}

/// [`calculate_timer_state`] at the instant reported by `clock`.
pub fn calculate_timer_state_with(
    snapshot: Option<&OrderSnapshot>,
    clock: &dyn Clock,
) -> TimerState {
    calculate_timer_state(snapshot, clock.now())
}

/// Resolved preparation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    total_ms: i64,
}

fn resolve_window(snapshot: Option<&OrderSnapshot>) -> Option<Window> {
    let snapshot = snapshot?;
    let minutes = snapshot.preparation_time?;
    if !minutes.is_finite() || minutes < 0.0 {
        debug!(minutes, "preparation time unusable for countdown");
        return None;
    }
    let Some(start) = snapshot.started_at() else {
        debug!(preparing_at = ?snapshot.preparing_at, "preparation start missing or unparsable");
        return None;
    };
    // Saturating cast; out-of-range windows fail the checked add below.
    let total_ms = (minutes * MILLIS_PER_MINUTE).round() as i64;
    let end = start.checked_add_signed(TimeDelta::try_milliseconds(total_ms)?)?;
    Some(Window {
        start,
        end,
        total_ms,
    })
}

impl Window {
    fn state_at(&self, now: DateTime<Utc>) -> TimerState {
        let until_end_ms = self.end.signed_duration_since(now).num_milliseconds();
        let elapsed_ms = now.signed_duration_since(self.start).num_milliseconds();
        let (remaining_seconds, is_overtime) = if until_end_ms > 0 {
            (whole_seconds(until_end_ms), false)
        } else {
            (whole_seconds(until_end_ms.saturating_neg()), true)
        };
        TimerState {
            remaining_seconds,
            is_overtime,
            progress_percent: progress_percent(elapsed_ms, self.total_ms),
            start_time: Some(self.start),
            end_time: Some(self.end),
        }
    }
}

fn whole_seconds(millis: i64) -> u64 {
    u64::try_from(millis / 1000).unwrap_or(0)
}

fn progress_percent(elapsed_ms: i64, total_ms: i64) -> f64 {
    if total_ms <= 0 {
        return if elapsed_ms >= 0 { 100.0 } else { 0.0 };
    }
    (elapsed_ms as f64 / total_ms as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::Timestamp;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn snapshot(minutes: f64, started: DateTime<Utc>) -> OrderSnapshot {
        OrderSnapshot {
            status: Some("preparing".to_string()),
            preparation_time: Some(minutes),
            preparing_at: Some(Timestamp::from(started)),
            ready_at: None,
        }
    }

    #[test]
    fn counts_down_inside_window() {
        let order = snapshot(15.0, now() - TimeDelta::seconds(600));
        let state = calculate_timer_state(Some(&order), now());
        assert_eq!(state.remaining_seconds, 300);
        assert!(!state.is_overtime);
        assert!((state.progress_percent - 66.666).abs() < 0.01);
        assert_eq!(state.end_time, Some(now() + TimeDelta::seconds(300)));
    }

    #[test]
    fn reports_overtime_after_window() {
        let order = snapshot(15.0, now() - TimeDelta::seconds(1000));
        let state = calculate_timer_state(Some(&order), now());
        assert_eq!(state.remaining_seconds, 100);
        assert!(state.is_overtime);
        assert_eq!(state.progress_percent, 100.0);
    }

    #[test]
    fn deadline_instant_is_overtime_with_zero_elapsed() {
        let order = snapshot(10.0, now() - TimeDelta::minutes(10));
        let state = calculate_timer_state(Some(&order), now());
        assert_eq!(state.remaining_seconds, 0);
        assert!(state.is_overtime);
    }

    #[test]
    fn future_start_keeps_counting_down_with_zero_progress() {
        let order = snapshot(5.0, now() + TimeDelta::seconds(120));
        let state = calculate_timer_state(Some(&order), now());
        assert_eq!(state.remaining_seconds, 420);
        assert!(!state.is_overtime);
        assert_eq!(state.progress_percent, 0.0);
    }

    #[test]
    fn fractional_minutes_extend_window_by_milliseconds() {
        let order = snapshot(1.5, now());
        let state = calculate_timer_state(Some(&order), now());
        assert_eq!(state.remaining_seconds, 90);
    }

    #[test]
    fn zero_minute_window_is_overtime_from_start() {
        let order = snapshot(0.0, now() - TimeDelta::seconds(30));
        let state = calculate_timer_state(Some(&order), now());
        assert!(state.is_overtime);
        assert_eq!(state.remaining_seconds, 30);
        assert_eq!(state.progress_percent, 100.0);
    }

    #[test]
    fn unusable_snapshots_return_zero_sentinel() {
        let started = now() - TimeDelta::seconds(60);
        let mut negative = snapshot(-1.0, started);
        let mut unparsable = snapshot(10.0, started);
        unparsable.preparing_at = Some(Timestamp::Text("not a date".to_string()));
        let mut missing_start = snapshot(10.0, started);
        missing_start.preparing_at = None;
        let mut missing_minutes = snapshot(10.0, started);
        missing_minutes.preparation_time = None;
        let mut not_finite = snapshot(10.0, started);
        not_finite.preparation_time = Some(f64::NAN);

        assert_eq!(calculate_timer_state(None, now()), TimerState::zero());
        for order in [&negative, &unparsable, &missing_start, &missing_minutes, &not_finite] {
            assert_eq!(calculate_timer_state(Some(order), now()), TimerState::zero());
        }

        negative.preparation_time = Some(f64::INFINITY);
        assert_eq!(calculate_timer_state(Some(&negative), now()), TimerState::zero());
    }

    #[test]
    fn short_iso8601_start_times_drive_the_countdown() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let at = midnight + TimeDelta::minutes(5);
        for text in ["2024-05-01", "2024-05-01T00:00Z", "2024-05-01T00:00:00.000+0000"] {
            let mut order = snapshot(15.0, midnight);
            order.preparing_at = Some(Timestamp::Text(text.to_string()));
            let state = calculate_timer_state(Some(&order), at);
            assert_eq!(state.remaining_seconds, 600, "{text}");
            assert_eq!(state.start_time, Some(midnight), "{text}");
        }
    }

    #[test]
    fn overflowing_window_returns_zero_sentinel() {
        let order = snapshot(1e300, now());
        assert_eq!(calculate_timer_state(Some(&order), now()), TimerState::zero());
    }

    #[test]
    fn clock_trait_feeds_now() {
        let clock = crate::core::clock::FixedClock::new(now());
        let order = snapshot(15.0, now() - TimeDelta::seconds(600));
        assert_eq!(
            calculate_timer_state_with(Some(&order), &clock),
            calculate_timer_state(Some(&order), now())
        );
    }
}
