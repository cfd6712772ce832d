use crate::cli::{Args, Background, GroupMode};
use crate::error::{NotchError, Result};
use crate::validation;
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: f64 = 3.0;
pub const DEFAULT_TOP: usize = 20;
pub const DEFAULT_THRESHOLD_KBPS: f64 = 500.0;

/// Run-wide settings resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub interval: Duration,
    pub top: usize,
    pub group: GroupMode,
    pub threshold_kbps: f64,
    pub background: Background,
    pub force_stream: bool,
    pub nettop_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
            top: DEFAULT_TOP,
            group: GroupMode::Process,
            threshold_kbps: DEFAULT_THRESHOLD_KBPS,
            background: Background::Black,
            force_stream: false,
            nettop_args: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self::default();
        config.apply_args(args)?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        validation::validate_interval_secs(args.interval)?;
        validation::validate_top(args.top)?;
        validation::validate_threshold(args.threshold)?;

        let nettop_args: Vec<String> = match args.nettop_args.first() {
            Some(first) if first == "--" => args.nettop_args[1..].to_vec(),
            _ => args.nettop_args.clone(),
        };
        for arg in &nettop_args {
            validation::validate_passthrough_arg(arg)?;
        }

        self.interval = Duration::try_from_secs_f64(args.interval)
            .map_err(|e| NotchError::Config(format!("Invalid interval: {e}")))?;
        self.top = args.top;
        self.group = args.group;
        self.threshold_kbps = args.threshold;
        self.background = args.background;
        self.force_stream = args.no_ui;
        self.nettop_args = nettop_args;
        Ok(())
    }

    /// Highlight threshold in bytes/sec, `None` when highlighting is disabled.
    #[must_use]
    pub fn threshold_bytes(&self) -> Option<f64> {
        (self.threshold_kbps > 0.0).then(|| self.threshold_kbps * 1024.0)
    }

    #[must_use]
    pub fn highlight(&self, bytes_per_sec: f64) -> bool {
        self.threshold_bytes()
            .is_some_and(|threshold| bytes_per_sec > threshold)
    }
}
