//! Display formatting for countdowns and minute counts.

use serde_json::Value;

use crate::core::types::TimerState;

/// Rendered for any input that is not a non-negative finite number.
pub const ZERO_DISPLAY: &str = "00:00";

/// Format seconds as `MM:SS`.
///
/// Minutes are zero-padded to two digits but not capped, so long windows
/// render as e.g. `125:07`. Fractional seconds are truncated. Negative,
/// NaN and infinite inputs render as [`ZERO_DISPLAY`].
pub fn format_time(total_seconds: f64) -> String {
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return ZERO_DISPLAY.to_string();
    }
    format_seconds(total_seconds.floor() as u64)
}

/// Format whole seconds as `MM:SS`.
pub fn format_seconds(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// [`format_time`] for untyped input; anything but a JSON number renders as
/// [`ZERO_DISPLAY`].
pub fn format_time_value(value: &Value) -> String {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map_or_else(|| ZERO_DISPLAY.to_string(), format_time),
        _ => ZERO_DISPLAY.to_string(),
    }
}

/// Dashboard rendering of a timer: `MM:SS`, prefixed with `+` once overtime.
pub fn format_timer(state: &TimerState) -> String {
    let clock = format_seconds(state.remaining_seconds);
    if state.is_overtime {
        format!("+{clock}")
    } else {
        clock
    }
}

/// Minute counts print without a fraction when whole (`17`), else one decimal.
pub fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{minutes:.0}")
    } else {
        format!("{minutes:.1}")
    }
}

/// Overtime minutes for display; any positive overtime shows as at least `0.1`.
pub fn format_overtime_minutes(minutes: f64) -> String {
    if minutes > 0.0 {
        format_minutes(minutes.max(0.1))
    } else {
        format_minutes(minutes)
    }
}
