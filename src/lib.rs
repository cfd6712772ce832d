//! # nettop-notch
//!
//! An interactive per-process network rate viewer for macOS, built on top of
//! the `nettop` utility.
//!
//! ## Features
//!
//! - Per-process IN/OUT rates in KB/s derived from successive `nettop` samples
//! - Δ (asymmetry) or SUM column, sortable by IN, OUT or Δ
//! - Grouping by process or by remote endpoint
//! - Highlighting of rows above a configurable threshold
//! - Full-screen terminal UI with a plain stream fallback
//!
//! ## Example
//!
//! ```rust,no_run
//! use nettop_notch::cli::Args;
//! use nettop_notch::run;
//!
//! let args = Args {
//!     interval: 1.0,
//!     top: 10,
//!     ..Default::default()
//! };
//!
//! run(args).expect("Failed to run nettop-notch");
//! ```

pub mod cadence;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod fmt;
pub mod input;
pub mod interfaces;
pub mod rates;
pub mod rows;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod stream;
pub mod validation;

use anyhow::Result;
use cli::Args;
use error::NotchError;
use source::{NettopSource, SnapshotSource};
use std::io::IsTerminal;
use std::sync::mpsc::{self, Receiver};

/// Main entry point for nettop-notch.
///
/// Resolves the configuration, checks that `nettop` can be run and then
/// drives either the interactive view or, when that is not possible, the
/// plain stream output.
///
/// # Example
///
/// ```rust,no_run
/// use nettop_notch::{cli::Args, run};
///
/// let args = Args::default();
/// run(args).expect("Failed to run nettop-notch");
/// ```
pub fn run(args: Args) -> Result<()> {
    let config = config::Config::from_args(&args)?;
    let source = NettopSource::new(&config.nettop_args);

    if !source.is_available() {
        return Err(NotchError::Platform(
            "`nettop` was not found in PATH (it ships with macOS)".to_string(),
        )
        .into());
    }

    let interrupt = interrupt_channel();

    if !use_interactive(config.force_stream) {
        log::info!("no interactive terminal, using stream output");
        return Ok(stream::run(&config, &source, &interrupt)?);
    }

    match display::run(&config, &source, &interrupt) {
        Err(NotchError::Terminal(reason)) => {
            eprintln!("(UI disabled: {reason})");
            log::warn!("interactive view unavailable: {reason}");
            Ok(stream::run(&config, &source, &interrupt)?)
        }
        other => Ok(other?),
    }
}

/// Routes Ctrl+C into a channel both renderers watch. The handler can only be
/// installed once per process.
fn interrupt_channel() -> Receiver<()> {
    let (tx, rx) = mpsc::channel();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = tx.send(());
    }) {
        log::warn!("Failed to set Ctrl-C handler: {e}");
    }
    rx
}

fn use_interactive(force_stream: bool) -> bool {
    !force_stream
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
        && std::env::var_os("TERM").is_some_and(|term| !term.is_empty() && term != "dumb")
}
