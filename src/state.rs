use crate::cadence::Cadence;
use crate::rates::ProcessRate;
use crate::rows::{build_rows, sort_rows, GroupMode, Row, SortKey};
use crate::snapshot::{ProcTotals, Snapshot};
use crate::source::SnapshotSource;
use crate::validation;
use std::time::{Duration, Instant};

/// Which combined metric fills the third numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMetric {
    #[default]
    Delta,
    Sum,
}

impl DisplayMetric {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Delta => Self::Sum,
            Self::Sum => Self::Delta,
        }
    }

    pub fn value(&self, rate: &ProcessRate) -> f64 {
        match self {
            Self::Delta => rate.rdelta(),
            Self::Sum => rate.rsum(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delta => "Δ = |IN-OUT|",
            Self::Sum => "SUM = IN+OUT",
        }
    }

    pub fn column_header(&self) -> &'static str {
        match self {
            Self::Delta => "Δ KB/s",
            Self::Sum => "SUM KB/s",
        }
    }
}

/// Everything the render loops carry from one tick to the next.
#[derive(Debug, Clone)]
pub struct LoopState {
    prev_totals: ProcTotals,
    prev_time: Instant,
    pub metric: DisplayMetric,
    pub sort_key: SortKey,
    pub show_help: bool,
    pub cadence: Cadence,
}

impl LoopState {
    /// Takes the warm-up sample that the first tick's rates are measured against.
    pub fn warm_up(source: &dyn SnapshotSource, interval: Duration) -> Self {
        let snapshot = Snapshot::parse(&source.fetch());
        Self::with_baseline(snapshot.totals, interval, Instant::now())
    }

    pub fn with_baseline(totals: ProcTotals, interval: Duration, now: Instant) -> Self {
        Self {
            prev_totals: totals,
            prev_time: now,
            metric: DisplayMetric::default(),
            sort_key: SortKey::default(),
            show_help: true,
            cadence: Cadence::new(interval, now),
        }
    }

    pub fn interval(&self) -> Duration {
        self.cadence.interval()
    }

    /// Samples the source and returns this tick's ranked rows.
    pub fn tick(&mut self, source: &dyn SnapshotSource, group: GroupMode) -> Vec<Row> {
        let snapshot = Snapshot::parse(&source.fetch());
        self.tick_with(snapshot, Instant::now(), group)
    }

    pub fn tick_with(&mut self, snapshot: Snapshot, now: Instant, group: GroupMode) -> Vec<Row> {
        let elapsed = now.saturating_duration_since(self.prev_time).as_secs_f64();
        let mut rows = build_rows(
            group,
            &self.prev_totals,
            &snapshot.totals,
            &snapshot.conns,
            elapsed,
        );
        sort_rows(&mut rows, self.sort_key);
        log::debug!(
            "tick: {} processes sampled, {} rows over {elapsed:.3}s",
            snapshot.totals.len(),
            rows.len()
        );

        self.prev_totals = snapshot.totals;
        self.prev_time = now;
        rows
    }

    pub fn set_sort_key(&mut self, key: SortKey, rows: &mut [Row]) {
        self.sort_key = key;
        sort_rows(rows, key);
    }

    /// Applies an interval typed at the prompt. Invalid or empty input
    /// leaves both the interval and the schedule untouched.
    pub fn apply_interval_entry(&mut self, text: &str, now: Instant) -> bool {
        match validation::parse_interval(text) {
            Some(interval) => {
                log::info!("sampling interval changed to {interval:?}");
                self.cadence.reset(interval, now);
                true
            }
            None => false,
        }
    }
}
