#![no_main]
use libfuzzer_sys::fuzz_target;
use nettop_notch::validation::{parse_interval, validate_passthrough_arg};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Interval prompt entries
        if let Some(interval) = parse_interval(input) {
            assert!(interval.as_secs_f64() > 0.0);
        }

        // nettop pass-through arguments
        let _ = validate_passthrough_arg(input);
    }
});
