//! Preparation-timer CLI.
//!
//! Reads an order file (`[{ "id": ..., "status": ..., "preparationTime": ...,
//! "preparingAt": ..., "readyAt": ... }]`) and reports live countdowns or
//! historical timing accuracy. Also exposes the estimate validator and the
//! `MM:SS` formatter for shell use.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use preptimer::core::clock::{Clock, SystemClock};
use preptimer::core::format::format_time;
use preptimer::core::validate::validate_preparation_time;
use preptimer::exit_codes;
use preptimer::logging;
use preptimer::review::{render_review, review_from_file};
use preptimer::status::{render_row, status_from_file};

#[derive(Parser)]
#[command(
    name = "preptimer",
    version,
    about = "Preparation countdowns and timing review for food orders"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the live countdown of every order in the file.
    Status {
        /// JSON array of order records.
        #[arg(long)]
        orders: PathBuf,
        /// Evaluate at this RFC 3339 instant instead of the wall clock.
        #[arg(long)]
        now: Option<String>,
        /// Emit JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
    /// Compare estimated and actual preparation time of finished orders.
    History {
        #[arg(long)]
        orders: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check a preparation estimate in minutes (1 to 120).
    Validate {
        /// Raw value as typed by the user.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Render seconds as `MM:SS`.
    Format {
        #[arg(allow_hyphen_values = true)]
        seconds: String,
    },
}

fn main() -> ExitCode {
    logging::init("warn");
    match run() {
        Ok(code) => exit_code(code),
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code(exit_codes::INVALID)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Status { orders, now, json } => cmd_status(&orders, now.as_deref(), json),
        Command::History { orders, json } => cmd_history(&orders, json),
        Command::Validate { value } => Ok(cmd_validate(&value)),
        Command::Format { seconds } => Ok(cmd_format(&seconds)),
    }
}

fn cmd_status(orders: &Path, now: Option<&str>, json: bool) -> Result<i32> {
    let now = resolve_now(now)?;
    debug!(now = %now, "evaluating status");
    let rows = status_from_file(orders, now)?;
    if json {
        print_json(&rows)?;
    } else {
        for row in &rows {
            println!("{}", render_row(row));
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_history(orders: &Path, json: bool) -> Result<i32> {
    let review = review_from_file(orders)?;
    if json {
        print_json(&review)?;
    } else {
        for line in render_review(&review) {
            println!("{}", line);
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_validate(value: &str) -> i32 {
    let result = validate_preparation_time(value);
    match result.error {
        None => {
            println!("ok");
            exit_codes::OK
        }
        Some(message) => {
            println!("{}", message);
            exit_codes::INVALID
        }
    }
}

fn cmd_format(seconds: &str) -> i32 {
    let seconds = seconds.trim().parse::<f64>().unwrap_or(f64::NAN);
    println!("{}", format_time(seconds));
    exit_codes::OK
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(SystemClock.now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .with_context(|| format!("parse --now '{raw}' as RFC 3339")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}
