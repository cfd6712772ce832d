//! Conversion of cumulative byte counters into per-second rates.

use crate::snapshot::{Counters, ProcTotals};
use std::collections::BTreeMap;

/// Lower bound for the elapsed time between two samples, in seconds.
pub const MIN_ELAPSED_SECS: f64 = 1e-6;

/// Inbound and outbound rate of one process, in bytes/sec.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessRate {
    pub rin: f64,
    pub rout: f64,
}

impl ProcessRate {
    pub fn rsum(&self) -> f64 {
        self.rin + self.rout
    }

    /// Asymmetry between the two directions.
    pub fn rdelta(&self) -> f64 {
        (self.rin - self.rout).abs()
    }
}

/// Bytes transferred between two readings. A counter that went backwards
/// (process restart, wrap) counts as no traffic.
pub fn counter_delta(prev: u64, curr: u64) -> u64 {
    curr.saturating_sub(prev)
}

/// Rates for every process in `curr` that moved at least one byte since `prev`.
///
/// Processes that are new in `curr` are compared against themselves, so they
/// show up only from their second sample on.
pub fn compute_rates(
    prev: &ProcTotals,
    curr: &ProcTotals,
    elapsed_secs: f64,
) -> BTreeMap<String, ProcessRate> {
    let elapsed = if elapsed_secs.is_finite() {
        elapsed_secs.max(MIN_ELAPSED_SECS)
    } else {
        MIN_ELAPSED_SECS
    };

    curr.iter()
        .filter_map(|(process, now)| {
            let before: Counters = prev.get(process).copied().unwrap_or(*now);
            let din = counter_delta(before.bytes_in, now.bytes_in);
            let dout = counter_delta(before.bytes_out, now.bytes_out);
            if din == 0 && dout == 0 {
                return None;
            }
            // Note: Precision loss acceptable for display rates
            #[allow(clippy::cast_precision_loss)]
            let rate = ProcessRate {
                rin: din as f64 / elapsed,
                rout: dout as f64 / elapsed,
            };
            Some((process.clone(), rate))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, u64, u64)]) -> ProcTotals {
        entries
            .iter()
            .map(|(name, bin, bout)| (name.to_string(), Counters::new(*bin, *bout)))
            .collect()
    }

    #[test]
    fn test_counter_delta() {
        assert_eq!(counter_delta(100, 250), 150);
        assert_eq!(counter_delta(7, 7), 0);
        assert_eq!(counter_delta(500, 20), 0);
        assert_eq!(counter_delta(0, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_one_kilobyte_per_second() {
        let prev = totals(&[("P", 0, 0)]);
        let curr = totals(&[("P", 1024, 0)]);
        let rates = compute_rates(&prev, &curr, 1.0);

        let rate = rates["P"];
        assert_eq!(rate.rin / 1024.0, 1.0);
        assert_eq!(rate.rout, 0.0);
        assert_eq!(rate.rsum() / 1024.0, 1.0);
        assert_eq!(rate.rdelta() / 1024.0, 1.0);
    }

    #[test]
    fn test_halving_elapsed_doubles_rates() {
        let prev = totals(&[("P", 1000, 3000)]);
        let curr = totals(&[("P", 5000, 4000)]);
        let slow = compute_rates(&prev, &curr, 2.0)["P"];
        let fast = compute_rates(&prev, &curr, 1.0)["P"];

        assert_eq!(fast.rin, slow.rin * 2.0);
        assert_eq!(fast.rout, slow.rout * 2.0);
        assert_eq!(fast.rsum(), slow.rsum() * 2.0);
        assert_eq!(fast.rdelta(), slow.rdelta() * 2.0);
    }

    #[test]
    fn test_idle_and_new_processes_excluded() {
        let prev = totals(&[("idle", 10, 10)]);
        let curr = totals(&[("idle", 10, 10), ("new", 999, 999)]);
        assert!(compute_rates(&prev, &curr, 1.0).is_empty());
    }

    #[test]
    fn test_counter_reset_clamped() {
        let prev = totals(&[("P", 5000, 100)]);
        let curr = totals(&[("P", 10, 300)]);
        let rate = compute_rates(&prev, &curr, 1.0)["P"];
        assert_eq!(rate.rin, 0.0);
        assert_eq!(rate.rout, 200.0);
        assert_eq!(rate.rdelta(), 200.0);
    }

    #[test]
    fn test_non_positive_elapsed_floored() {
        let prev = totals(&[("P", 0, 0)]);
        let curr = totals(&[("P", 1, 0)]);
        let rate = compute_rates(&prev, &curr, 0.0)["P"];
        assert_eq!(rate.rin, 1.0 / MIN_ELAPSED_SECS);
        let rate = compute_rates(&prev, &curr, -4.0)["P"];
        assert!(rate.rin.is_finite() && rate.rin > 0.0);
    }

    #[test]
    fn test_sum_and_delta_identities() {
        let prev = totals(&[("a", 0, 0), ("b", 0, 0)]);
        let curr = totals(&[("a", 300, 900), ("b", 1200, 5)]);
        for rate in compute_rates(&prev, &curr, 0.7).values() {
            assert!(rate.rin >= 0.0 && rate.rout >= 0.0);
            assert_eq!(rate.rsum(), rate.rin + rate.rout);
            assert_eq!(rate.rdelta(), (rate.rin - rate.rout).abs());
        }
    }
}
