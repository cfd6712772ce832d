#![no_main]
use libfuzzer_sys::fuzz_target;
use nettop_notch::rows::{build_rows, GroupMode};
use nettop_notch::snapshot::Snapshot;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Arbitrary nettop output must parse and aggregate without panicking
        let snapshot = Snapshot::parse(input);
        let baseline = Snapshot::empty();
        for group in [GroupMode::Process, GroupMode::Remote] {
            let _ = build_rows(group, &baseline.totals, &snapshot.totals, &snapshot.conns, 1.0);
        }
    }
});
