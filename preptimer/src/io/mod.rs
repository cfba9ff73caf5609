//! I/O helpers for the CLI and the board: order files and configuration.

pub mod config;
pub mod snapshot_store;
