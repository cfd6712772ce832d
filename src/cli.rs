use crate::config::{DEFAULT_INTERVAL_SECS, DEFAULT_THRESHOLD_KBPS, DEFAULT_TOP};
use clap::Parser;

pub use crate::rows::GroupMode;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nettop-notch",
    about = "Watch nettop rates (bytes/sec per process) with connection listing & grouping"
)]
#[command(version, long_about = None)]
pub struct Args {
    /// Sampling interval in seconds
    #[arg(short = 'i', long = "interval", default_value = "3.0")]
    pub interval: f64,

    /// Number of rows to show
    #[arg(short = 't', long = "top", default_value = "20")]
    pub top: usize,

    /// Grouping: "process" = one line per process, "remote" = per (process, iface, state, remote)
    #[arg(short = 'g', long = "group", value_enum, default_value = "process")]
    pub group: GroupMode,

    /// Highlight threshold in KB/s for the displayed metric (0 disables)
    #[arg(long = "threshold", default_value = "500.0", allow_negative_numbers = true)]
    pub threshold: f64,

    /// Background: ANSI black, RGB 0,0,0 (trueblack) or the terminal default
    #[arg(long = "bg", value_enum, default_value = "black")]
    pub background: Background,

    /// Print plain text blocks instead of the interactive screen
    #[arg(long = "no-ui")]
    pub no_ui: bool,

    /// Arguments passed through to nettop (put them after --), e.g. -- -t wired -m tcp
    #[arg(last = true, value_name = "NETTOP_ARGS")]
    pub nettop_args: Vec<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            top: DEFAULT_TOP,
            group: GroupMode::Process,
            threshold: DEFAULT_THRESHOLD_KBPS,
            background: Background::Black,
            no_ui: false,
            nettop_args: Vec::new(),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Black,
    #[value(name = "trueblack")]
    TrueBlack,
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["nettop-notch"]);
        assert_eq!(args.interval, 3.0);
        assert_eq!(args.top, 20);
        assert_eq!(args.group, GroupMode::Process);
        assert_eq!(args.threshold, 500.0);
        assert_eq!(args.background, Background::Black);
        assert!(!args.no_ui);
        assert!(args.nettop_args.is_empty());
    }

    #[test]
    fn test_default_matches_parsed_defaults() {
        let parsed = Args::parse_from(["nettop-notch"]);
        let default = Args::default();
        assert_eq!(default.interval, parsed.interval);
        assert_eq!(default.top, parsed.top);
        assert_eq!(default.threshold, parsed.threshold);
        assert_eq!(default.group, parsed.group);
    }

    #[test]
    fn test_passthrough_after_double_dash() {
        let args = Args::parse_from([
            "nettop-notch",
            "-g",
            "remote",
            "--bg",
            "trueblack",
            "--",
            "-t",
            "wired",
            "-m",
            "tcp",
        ]);
        assert_eq!(args.group, GroupMode::Remote);
        assert_eq!(args.background, Background::TrueBlack);
        assert_eq!(args.nettop_args, vec!["-t", "wired", "-m", "tcp"]);
    }

    #[test]
    fn test_negative_threshold_accepted() {
        let args = Args::parse_from(["nettop-notch", "--threshold", "-1"]);
        assert_eq!(args.threshold, -1.0);
    }
}
