use std::env;
use std::path::Path;
use std::process::Command;

pub const NETTOP_PROGRAM: &str = "nettop";

/// Producer of raw tabular snapshots.
///
/// `fetch` never fails: any problem running the producer yields an empty
/// string, which callers treat as "no data this tick".
pub trait SnapshotSource {
    fn fetch(&self) -> String;
    fn command_line(&self) -> String;
    fn is_available(&self) -> bool;
}

/// Runs `nettop` once per sample with CSV output and no name resolution.
#[derive(Debug, Clone)]
pub struct NettopSource {
    program: String,
    args: Vec<String>,
}

impl NettopSource {
    pub fn new(passthrough: &[String]) -> Self {
        Self::with_program(NETTOP_PROGRAM, passthrough)
    }

    pub fn with_program(program: &str, passthrough: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: build_args(passthrough),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Appends the flags the parser relies on unless the caller already chose them:
/// `-n` (no DNS), `-x` (CSV), `-L 1` (single sample).
fn build_args(passthrough: &[String]) -> Vec<String> {
    let mut args: Vec<String> = match passthrough.first() {
        Some(first) if first == "--" => passthrough[1..].to_vec(),
        _ => passthrough.to_vec(),
    };

    if !args.iter().any(|a| a == "-n") {
        args.push("-n".to_string());
    }
    if !args.iter().any(|a| a == "-x") {
        args.push("-x".to_string());
    }
    if !args
        .iter()
        .any(|a| a.starts_with("-l") || a.starts_with("-L"))
    {
        args.push("-L".to_string());
        args.push("1".to_string());
    }
    args
}

impl SnapshotSource for NettopSource {
    fn fetch(&self) -> String {
        let output = match Command::new(&self.program).args(&self.args).output() {
            Ok(output) => output,
            Err(e) => {
                log::warn!("failed to run {}: {e}", self.program);
                return String::new();
            }
        };

        if !output.status.success() {
            log::debug!("{} exited with {}", self.program, output.status);
            return String::new();
        }

        String::from_utf8(output.stdout).unwrap_or_else(|e| {
            log::debug!("{} produced non-UTF-8 output: {e}", self.program);
            String::new()
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_available(&self) -> bool {
        if self.program.contains('/') {
            return Path::new(&self.program).is_file();
        }
        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| dir.join(&self.program).is_file()))
            .unwrap_or(false)
    }
}
