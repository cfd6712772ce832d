//! Replays a few canned `nettop -x` captures through the sampling pipeline
//! and prints them the way the stream output does.
//!
//! Runs anywhere, no macOS needed:
//!
//! ```text
//! cargo run --example replay
//! cargo run --example replay -- remote
//! ```

use chrono::Local;
use nettop_notch::config::Config;
use nettop_notch::rows::GroupMode;
use nettop_notch::snapshot::Snapshot;
use nettop_notch::state::LoopState;
use nettop_notch::stream;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const HEADER: &str = "time,,interface,state,bytes_in,bytes_out,";

/// One capture per tick: (Safari, curl, mDNSResponder) cumulative counters.
const TICKS: [(u64, u64, u64); 4] = [
    (10_000, 4_000, 100),
    (1_600_000, 60_000, 300),
    (2_100_000, 95_000, 900),
    (2_150_000, 4_000_000, 900),
];

fn capture(safari: u64, curl: u64, mdns: u64) -> String {
    format!(
        "{HEADER}
12:00:00.0,Safari.411,,,{safari},{},
12:00:00.0,tcp4 192.168.1.5:50001<->17.253.1.1:443,en0,Established,,,
12:00:00.0,tcp4 192.168.1.5:50002<->17.253.1.1:443,en0,Established,,,
12:00:00.0,tcp4 192.168.1.5:50007<->151.101.1.69:443,en0,Established,,,
12:00:00.0,curl.9120,,,{},{curl},
12:00:00.0,tcp4 10.8.0.2:61000<->203.0.113.7:443,utun3,Established,,,
12:00:00.0,mDNSResponder.180,,,{mdns},{mdns},
12:00:00.0,udp4 *:5353<->*:*,en0,,,,
",
        safari / 20,
        curl / 50,
    )
}

fn main() -> io::Result<()> {
    let group = match std::env::args().nth(1).as_deref() {
        Some("remote") => GroupMode::Remote,
        _ => GroupMode::Process,
    };
    let config = Config {
        interval: Duration::from_secs(1),
        group,
        ..Config::default()
    };

    let start = Instant::now();
    let (first, rest) = TICKS.split_first().expect("at least one capture");
    let mut state = LoopState::with_baseline(
        Snapshot::parse(&capture(first.0, first.1, first.2)).totals,
        config.interval,
        start,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (n, (safari, curl, mdns)) in rest.iter().enumerate() {
        let now = start + config.interval * (n as u32 + 1);
        let rows = state.tick_with(Snapshot::parse(&capture(*safari, *curl, *mdns)), now, group);
        stream::write_tick(
            &mut out,
            &config,
            &state,
            "replay (canned nettop captures)",
            &rows,
            stream::DEFAULT_WIDTH,
            Local::now(),
        )?;
        out.flush()?;
        std::thread::sleep(Duration::from_millis(800));
    }
    writeln!(out)?;
    Ok(())
}
