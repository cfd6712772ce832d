//! Text shared by the interactive screen and the stream fallback.

use crate::config::Config;
use crate::rows::{Row, SortKey};
use crate::state::DisplayMetric;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Width of the numeric columns.
pub const NUMW: usize = 11;
pub const PROCESS_WIDTH: usize = 30;
pub const IFACE_WIDTH: usize = 12;
pub const STATE_WIDTH: usize = 12;

pub const NO_TRAFFIC: &str = "(no process traffic this interval)";
pub const KEY_LEGEND: &str = " keys: [h] help  [i] sort IN  [o] sort OUT  [d] sort Δ  [m] toggle column (Δ↔SUM)  [t] change interval  [q] quit";
pub const STREAM_HINT: &str =
    " (non-UI fallback) Run in a real TTY for interactive keys: h i o d m t q";
pub const PROMPT_LABEL: &str = " New interval (seconds), Enter to apply, Esc to cancel: ";

/// Bytes/sec as right-aligned KB/s with one decimal.
pub fn kbs(bytes_per_sec: f64) -> String {
    format!("{:>NUMW$.1}", bytes_per_sec / 1024.0)
}

pub fn title_line(config: &Config, interval: Duration, now: DateTime<Local>) -> String {
    format!(
        " nettop rates watch  [{}]  interval={:.1}s  group={}  threshold={:.1} KB/s",
        now.format("%Y-%m-%dT%H:%M:%S"),
        interval.as_secs_f64(),
        config.group.as_str(),
        config.threshold_kbps
    )
}

pub fn command_line(command: &str) -> String {
    format!(" cmd: {command}")
}

pub fn column_line(metric: DisplayMetric, sort_key: SortKey) -> String {
    format!(
        " column: {}   sorting by: {}",
        metric.label(),
        sort_key.label()
    )
}

/// The four banner lines shown while help is visible.
pub fn banner_lines(
    config: &Config,
    interval: Duration,
    command: &str,
    metric: DisplayMetric,
    sort_key: SortKey,
    now: DateTime<Local>,
) -> Vec<String> {
    vec![
        title_line(config, interval, now),
        command_line(command),
        KEY_LEGEND.to_string(),
        column_line(metric, sort_key),
    ]
}

/// Column titles, in display order.
pub fn header_cells(metric: DisplayMetric) -> [String; 7] {
    [
        "IN KB/s".to_string(),
        "OUT KB/s".to_string(),
        metric.column_header().to_string(),
        "PROCESS".to_string(),
        "IFACE(S)".to_string(),
        "STATE".to_string(),
        "CONNECTION".to_string(),
    ]
}

pub fn row_cells(row: &Row, metric: DisplayMetric) -> [String; 7] {
    let rate = row.rate();
    [
        kbs(rate.rin),
        kbs(rate.rout),
        kbs(metric.value(rate)),
        row.process().to_string(),
        row.iface(),
        row.state().to_string(),
        row.connection(),
    ]
}

fn join_cells(cells: &[String; 7]) -> String {
    format!(
        "{:>NUMW$}  {:>NUMW$}  {:>NUMW$}   {:<PROCESS_WIDTH$}  {:<IFACE_WIDTH$}  {:<STATE_WIDTH$}  {}",
        cells[0], cells[1], cells[2], cells[3], cells[4], cells[5], cells[6]
    )
}

pub fn header_line(metric: DisplayMetric) -> String {
    join_cells(&header_cells(metric))
}

pub fn row_line(row: &Row, metric: DisplayMetric) -> String {
    join_cells(&row_cells(row, metric))
}
