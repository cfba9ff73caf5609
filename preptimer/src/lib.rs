//! Preparation-timer engine for a food-order storefront.
//!
//! Converts an order's preparation window (estimate in minutes plus a start
//! timestamp) into a live countdown, measures overtime, validates entered
//! estimates, and summarizes timing accuracy of finished orders. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic engine. No I/O, no state between calls;
//!   "now" is always an argument.
//! - **[`io`]**: Order files and configuration.
//!
//! Orchestration modules ([`status`], [`review`]) combine the two for the
//! `preptimer` CLI and the order board.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod review;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
