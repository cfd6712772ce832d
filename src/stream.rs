//! Plain stdout renderer used when no interactive terminal is available.

use crate::config::Config;
use crate::error::Result;
use crate::fmt;
use crate::rows::Row;
use crate::source::SnapshotSource;
use crate::state::LoopState;
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

pub const DEFAULT_WIDTH: usize = 150;

const CLEAR: &str = "\x1b[H\x1b[J";
const HILITE: &str = "\x1b[92m\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Streams a refreshed table to stdout every tick until a Ctrl+C arrives
/// on `interrupt`.
pub fn run(
    config: &Config,
    source: &dyn SnapshotSource,
    interrupt: &Receiver<()>,
) -> Result<()> {
    log::info!("stream output started ({})", source.command_line());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    stream_loop(config, source, &mut out, interrupt)
}

/// Tick loop behind [`run`]. A message on `interrupt` ends the wait
/// between ticks immediately.
pub fn stream_loop<W: Write>(
    config: &Config,
    source: &dyn SnapshotSource,
    out: &mut W,
    interrupt: &Receiver<()>,
) -> Result<()> {
    let command = source.command_line();
    let mut state = LoopState::warm_up(source, config.interval);

    loop {
        let rows = state.tick(source, config.group);
        write_tick(
            out,
            config,
            &state,
            &command,
            &rows,
            terminal_width(),
            Local::now(),
        )?;
        out.flush()?;

        let wait = state.cadence.schedule_next(Instant::now());
        match interrupt.recv_timeout(wait) {
            Ok(()) => {
                writeln!(out, "\nExiting.")?;
                log::info!("stream output interrupted");
                return Ok(());
            }
            Err(RecvTimeoutError::Timeout) => {}
            // No handler installed; the default signal behaviour applies.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(wait),
        }
    }
}

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .ok()
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

pub fn write_tick<W: Write>(
    out: &mut W,
    config: &Config,
    state: &LoopState,
    command: &str,
    rows: &[Row],
    width: usize,
    now: DateTime<Local>,
) -> io::Result<()> {
    let separator = "-".repeat(width);

    write!(out, "{CLEAR}")?;
    writeln!(out, "{separator}")?;
    writeln!(out, "{}", fmt::title_line(config, state.interval(), now))?;
    writeln!(out, "{}", fmt::command_line(command))?;
    writeln!(out, "{}", fmt::STREAM_HINT)?;
    writeln!(out, "{separator}")?;
    writeln!(out, "{}", fmt::header_line(state.metric))?;
    writeln!(out, "{separator}")?;

    for row in rows.iter().take(config.top) {
        let line = fmt::row_line(row, state.metric);
        if config.highlight(state.metric.value(row.rate())) {
            writeln!(out, "{HILITE}{line}{RESET}")?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    if rows.is_empty() {
        writeln!(out, "{}", fmt::NO_TRAFFIC)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::Duration;
    use std::sync::mpsc;

    struct ScriptedSource {
        captures: RefCell<VecDeque<String>>,
    }

    impl SnapshotSource for ScriptedSource {
        fn fetch(&self) -> String {
            self.captures.borrow_mut().pop_front().unwrap_or_default()
        }

        fn command_line(&self) -> String {
            "nettop -n -x -L 1".to_string()
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn source(captures: &[&str]) -> ScriptedSource {
        ScriptedSource {
            captures: RefCell::new(captures.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn config() -> Config {
        Config {
            interval: Duration::from_millis(100),
            top: 2,
            threshold_kbps: 1.0,
            ..Config::default()
        }
    }

    const HEADER: &str = "time,,interface,state,bytes_in,bytes_out";

    #[test]
    fn test_interrupt_ends_loop() {
        let source = source(&[
            &format!("{HEADER}\nt,big.1,,,0,0\nt,small.2,,,0,0\nt,tiny.3,,,0,0\n"),
            &format!("{HEADER}\nt,big.1,,,9000000,0\nt,small.2,,,10,0\nt,tiny.3,,,5,0\n"),
        ]);
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();

        let mut out = Vec::new();
        stream_loop(&config(), &source, &mut out, &rx).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(CLEAR));
        assert!(text.contains(" cmd: nettop -n -x -L 1"));
        assert!(text.contains(fmt::STREAM_HINT));
        assert!(text.contains(HILITE));
        assert!(text.contains("big.1"));
        assert!(text.contains("small.2"));
        // capped at `top`
        assert!(!text.contains("tiny.3"));
        assert!(text.ends_with("\nExiting.\n"));
    }

    #[test]
    fn test_write_tick_without_traffic() {
        let state = LoopState::with_baseline(
            Default::default(),
            Duration::from_secs(3),
            Instant::now(),
        );
        let mut out = Vec::new();
        write_tick(&mut out, &config(), &state, "nettop", &[], 10, Local::now()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.trim_start_matches(CLEAR).lines().collect();

        assert_eq!(lines[0], "----------");
        assert!(lines[1].starts_with(" nettop rates watch  ["));
        assert!(lines[1].contains("interval=3.0s  group=process  threshold=1.0 KB/s"));
        assert_eq!(lines[4], "----------");
        assert!(lines[5].contains("Δ KB/s"));
        assert_eq!(lines[7], fmt::NO_TRAFFIC);
        assert!(!text.contains(HILITE));
    }
}
