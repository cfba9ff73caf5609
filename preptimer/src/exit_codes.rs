//! Stable exit codes for `preptimer` CLI commands.

/// Command succeeded (or the validated value is acceptable).
pub const OK: i32 = 0;
/// Command failed: unreadable order file, bad arguments, or a rejected value.
pub const INVALID: i32 = 1;
