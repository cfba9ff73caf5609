//! Bounds checking for user-entered preparation estimates.
//!
//! Independent of the countdown guard: this is the user-facing check run on
//! form input, the countdown guard is the silent fallback for stored data.

use std::fmt;

use serde_json::Value;

use crate::core::types::ValidationResult;

pub const MIN_PREPARATION_MINUTES: f64 = 1.0;
pub const MAX_PREPARATION_MINUTES: f64 = 120.0;

/// Raw preparation-time entry as it arrives from a form or JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum PrepTimeInput {
    Missing,
    Text(String),
    Number(f64),
    /// Booleans, arrays and objects. Never coerced.
    Unsupported,
}

impl From<&str> for PrepTimeInput {
    fn from(text: &str) -> Self {
        PrepTimeInput::Text(text.to_string())
    }
}

impl From<Option<&str>> for PrepTimeInput {
    fn from(text: Option<&str>) -> Self {
        text.map_or(PrepTimeInput::Missing, PrepTimeInput::from)
    }
}

impl From<f64> for PrepTimeInput {
    fn from(minutes: f64) -> Self {
        PrepTimeInput::Number(minutes)
    }
}

impl From<&Value> for PrepTimeInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => PrepTimeInput::Missing,
            Value::String(text) => PrepTimeInput::Text(text.clone()),
            Value::Number(number) => PrepTimeInput::Number(number.as_f64().unwrap_or(f64::NAN)),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => PrepTimeInput::Unsupported,
        }
    }
}

/// Reason a preparation estimate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepTimeError {
    Required,
    NotANumber,
    BelowMinimum,
    AboveMaximum,
}

impl fmt::Display for PrepTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepTimeError::Required => write!(f, "Preparation time is required"),
            PrepTimeError::NotANumber => write!(f, "Preparation time must be a valid number"),
            PrepTimeError::BelowMinimum => write!(
                f,
                "Preparation time must be at least {MIN_PREPARATION_MINUTES} minute"
            ),
            PrepTimeError::AboveMaximum => write!(
                f,
                "Preparation time cannot exceed {MAX_PREPARATION_MINUTES} minutes"
            ),
        }
    }
}

impl std::error::Error for PrepTimeError {}

/// Coerce and bounds-check a preparation estimate, returning minutes.
///
/// Numeric strings are trimmed and parsed; fractional minutes inside
/// `[1, 120]` are accepted.
pub fn parse_preparation_time(raw: impl Into<PrepTimeInput>) -> Result<f64, PrepTimeError> {
    let minutes = match raw.into() {
        PrepTimeInput::Missing => return Err(PrepTimeError::Required),
        PrepTimeInput::Text(text) if text.trim().is_empty() => {
            return Err(PrepTimeError::Required);
        }
        PrepTimeInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| PrepTimeError::NotANumber)?,
        PrepTimeInput::Number(minutes) => minutes,
        PrepTimeInput::Unsupported => return Err(PrepTimeError::NotANumber),
    };
    if !minutes.is_finite() {
        return Err(PrepTimeError::NotANumber);
    }
    if minutes < MIN_PREPARATION_MINUTES {
        return Err(PrepTimeError::BelowMinimum);
    }
    if minutes > MAX_PREPARATION_MINUTES {
        return Err(PrepTimeError::AboveMaximum);
    }
    Ok(minutes)
}

/// Validate a preparation estimate for display; never fails.
pub fn validate_preparation_time(raw: impl Into<PrepTimeInput>) -> ValidationResult {
    match parse_preparation_time(raw) {
        Ok(_) => ValidationResult::valid(),
        Err(err) => ValidationResult::invalid(err.to_string()),
    }
}
