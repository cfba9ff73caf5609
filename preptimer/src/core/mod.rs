//! Deterministic, pure timer engine.
//!
//! Core modules must be free of I/O side effects. Every function takes the
//! snapshot and the current instant as arguments and returns a fresh value,
//! so repeated, interleaved or post-restart calls agree.

pub mod clock;
pub mod countdown;
pub mod format;
pub mod history;
pub mod preparing;
pub mod snapshot;
pub mod types;
pub mod validate;
