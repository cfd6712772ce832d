//! Input validation for command-line tunables and interactive entries
//!
//! Every value that ends up driving the sampling loop or the `nettop`
//! command line passes through one of these checks first.

use crate::error::{NotchError, Result};
use std::time::Duration;

/// Minimum allowed sampling interval in seconds
const MIN_INTERVAL_SECS: f64 = 0.1;

/// Maximum allowed sampling interval in seconds
const MAX_INTERVAL_SECS: f64 = 3600.0;

/// Maximum number of rows that may be requested
const MAX_TOP_ROWS: usize = 10_000;

/// Maximum allowed length of a single pass-through argument
const MAX_PASSTHROUGH_ARG_LEN: usize = 256;

/// Validates the sampling interval in seconds
///
/// # Examples
/// ```
/// use nettop_notch::validation::validate_interval_secs;
///
/// assert!(validate_interval_secs(3.0).is_ok());
/// assert!(validate_interval_secs(0.0).is_err());
/// assert!(validate_interval_secs(f64::NAN).is_err());
/// ```
pub fn validate_interval_secs(secs: f64) -> Result<()> {
    if !secs.is_finite() {
        return Err(NotchError::Config(
            "Interval must be a finite number of seconds".to_string(),
        ));
    }

    if secs < MIN_INTERVAL_SECS {
        return Err(NotchError::Config(format!(
            "Interval too small (minimum {MIN_INTERVAL_SECS} s)"
        )));
    }

    if secs > MAX_INTERVAL_SECS {
        return Err(NotchError::Config(format!(
            "Interval too large (maximum {MAX_INTERVAL_SECS} s)"
        )));
    }

    Ok(())
}

/// Parses an interval typed at the interactive prompt.
///
/// Any finite, positive number of seconds that fits a [`Duration`] is taken;
/// the `-i` bounds only apply on the command line. Returns `None` for empty,
/// non-numeric, zero or negative input.
///
/// # Examples
/// ```
/// use nettop_notch::validation::parse_interval;
/// use std::time::Duration;
///
/// assert_eq!(parse_interval("0.05"), Some(Duration::from_millis(50)));
/// assert_eq!(parse_interval("0"), None);
/// ```
pub fn parse_interval(text: &str) -> Option<Duration> {
    let secs: f64 = text.trim().parse().ok()?;
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|interval| !interval.is_zero())
}

pub fn validate_top(top: usize) -> Result<()> {
    if top == 0 {
        return Err(NotchError::Config(
            "Row count must be at least 1".to_string(),
        ));
    }

    if top > MAX_TOP_ROWS {
        return Err(NotchError::Config(format!(
            "Row count too large (maximum {MAX_TOP_ROWS})"
        )));
    }

    Ok(())
}

/// Any finite threshold is accepted; values <= 0 disable highlighting.
pub fn validate_threshold(threshold_kbps: f64) -> Result<()> {
    if !threshold_kbps.is_finite() {
        return Err(NotchError::Config(
            "Threshold must be a finite number of KB/s".to_string(),
        ));
    }
    Ok(())
}

/// Validates an argument forwarded verbatim to `nettop`
///
/// # Security Considerations
/// - Blocks null bytes and control characters
/// - Limits length of each forwarded argument
pub fn validate_passthrough_arg(arg: &str) -> Result<()> {
    if arg.is_empty() {
        return Err(NotchError::Config(
            "Empty argument cannot be passed to nettop".to_string(),
        ));
    }

    if arg.len() > MAX_PASSTHROUGH_ARG_LEN {
        return Err(NotchError::Config(format!(
            "nettop argument too long (max {MAX_PASSTHROUGH_ARG_LEN} characters)"
        )));
    }

    if arg.contains('\0') || arg.chars().any(|c| c.is_control()) {
        log::warn!("rejected nettop argument with control characters: {arg:?}");
        return Err(NotchError::Config(
            "Control characters not allowed in nettop arguments".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_validation() {
        assert!(validate_interval_secs(0.5).is_ok());
        assert!(validate_interval_secs(3.0).is_ok());
        assert!(validate_interval_secs(3600.0).is_ok());

        assert!(validate_interval_secs(0.0).is_err());
        assert!(validate_interval_secs(-2.0).is_err());
        assert!(validate_interval_secs(0.05).is_err());
        assert!(validate_interval_secs(7200.0).is_err());
        assert!(validate_interval_secs(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("2"), Some(Duration::from_secs(2)));
        assert_eq!(parse_interval(" 0.5 "), Some(Duration::from_millis(500)));

        assert_eq!(parse_interval(""), None);
        assert_eq!(parse_interval("abc"), None);
        assert_eq!(parse_interval("0"), None);
        assert_eq!(parse_interval("-1"), None);
        assert_eq!(parse_interval("NaN"), None);
        assert_eq!(parse_interval("inf"), None);
        assert_eq!(parse_interval("1e-12"), None);
        assert_eq!(parse_interval("1e300"), None);
    }

    #[test]
    fn test_parse_interval_ignores_cli_bounds() {
        assert!(validate_interval_secs(0.05).is_err());
        assert_eq!(parse_interval("0.05"), Some(Duration::from_millis(50)));
        assert!(validate_interval_secs(7200.0).is_err());
        assert_eq!(parse_interval("7200"), Some(Duration::from_secs(7200)));
    }

    #[test]
    fn test_top_validation() {
        assert!(validate_top(1).is_ok());
        assert!(validate_top(20).is_ok());
        assert!(validate_top(0).is_err());
        assert!(validate_top(1_000_000).is_err());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(validate_threshold(500.0).is_ok());
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(-5.0).is_ok());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_passthrough_validation() {
        assert!(validate_passthrough_arg("-m").is_ok());
        assert!(validate_passthrough_arg("tcp").is_ok());
        assert!(validate_passthrough_arg("").is_err());
        assert!(validate_passthrough_arg("tcp\x00").is_err());
        assert!(validate_passthrough_arg("a\nb").is_err());
        assert!(validate_passthrough_arg(&"x".repeat(300)).is_err());
    }
}
