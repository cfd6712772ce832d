use crate::interfaces::{self, IfaceSummary};
use crate::rates::{compute_rates, ProcessRate};
use crate::snapshot::{ProcConns, ProcTotals, ENDPOINT_SEPARATOR};
use std::collections::{HashMap, HashSet};

/// Shown instead of an endpoint when a process has no remote peers.
pub const NO_REMOTE: &str = "(no remote)";

/// How connections are folded into rows.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// One row per process
    #[default]
    Process,
    /// One row per (process, iface, state, remote)
    Remote,
}

impl GroupMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Remote => "remote",
        }
    }
}

/// Column the table is ranked by, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    In,
    Out,
    #[default]
    Delta,
}

impl SortKey {
    pub fn value(&self, rate: &ProcessRate) -> f64 {
        match self {
            Self::In => rate.rin,
            Self::Out => rate.rout,
            Self::Delta => rate.rdelta(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Delta => "Δ = |IN-OUT|",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub process: String,
    pub rate: ProcessRate,
    pub iface: IfaceSummary,
    pub first_remote: Option<String>,
    pub distinct_remotes: usize,
    pub sockets: usize,
}

impl ProcessRow {
    /// `  [+R remotes, +S sockets]` when there is more than one of either.
    pub fn overflow(&self) -> Option<String> {
        (self.distinct_remotes > 1 || self.sockets > 1).then(|| {
            format!(
                "  [+{} remotes, +{} sockets]",
                self.distinct_remotes.saturating_sub(1),
                self.sockets.saturating_sub(1)
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRow {
    pub process: String,
    pub rate: ProcessRate,
    pub iface: String,
    pub state: String,
    pub remote: String,
    /// Local endpoints in first-seen order, duplicates kept.
    pub locals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Process(ProcessRow),
    Remote(RemoteRow),
}

impl Row {
    pub fn process(&self) -> &str {
        match self {
            Self::Process(row) => &row.process,
            Self::Remote(row) => &row.process,
        }
    }

    pub fn rate(&self) -> &ProcessRate {
        match self {
            Self::Process(row) => &row.rate,
            Self::Remote(row) => &row.rate,
        }
    }

    pub fn iface(&self) -> String {
        match self {
            Self::Process(row) => row.iface.display(),
            Self::Remote(row) => row.iface.clone(),
        }
    }

    pub fn state(&self) -> &str {
        match self {
            Self::Process(row) => &row.iface.state,
            Self::Remote(row) => &row.state,
        }
    }

    pub fn connection(&self) -> String {
        match self {
            Self::Process(row) => {
                let first = row.first_remote.as_deref().unwrap_or(NO_REMOTE);
                match row.overflow() {
                    Some(extra) => format!("{first}{extra}"),
                    None => first.to_string(),
                }
            }
            Self::Remote(row) => {
                let mut text = String::new();
                if let Some(local) = row.locals.first().filter(|l| !l.is_empty()) {
                    text.push_str(local);
                    text.push_str(ENDPOINT_SEPARATOR);
                }
                text.push_str(&row.remote);
                if row.locals.len() > 1 {
                    text.push_str(&format!(" [+{}]", row.locals.len() - 1));
                }
                text
            }
        }
    }
}

pub fn build_rows(
    group: GroupMode,
    prev: &ProcTotals,
    curr: &ProcTotals,
    conns: &ProcConns,
    elapsed_secs: f64,
) -> Vec<Row> {
    let rates = compute_rates(prev, curr, elapsed_secs);
    match group {
        GroupMode::Process => rates
            .into_iter()
            .map(|(process, rate)| {
                let process_conns = conns.get(&process).map(Vec::as_slice).unwrap_or(&[]);
                let remotes: Vec<&str> = process_conns
                    .iter()
                    .map(|c| c.remote.as_str())
                    .filter(|r| !r.is_empty())
                    .collect();
                let distinct_remotes = remotes.iter().collect::<HashSet<_>>().len();

                Row::Process(ProcessRow {
                    iface: interfaces::summarize(process_conns),
                    first_remote: remotes.first().map(|r| r.to_string()),
                    distinct_remotes,
                    sockets: process_conns.len(),
                    process,
                    rate,
                })
            })
            .collect(),
        GroupMode::Remote => {
            let mut groups: Vec<RemoteRow> = Vec::new();
            let mut index: HashMap<(&str, &str, &str, &str), usize> = HashMap::new();

            for (process, process_conns) in conns {
                let Some(rate) = rates.get(process) else {
                    continue;
                };
                for conn in process_conns {
                    let key = (
                        process.as_str(),
                        conn.iface.as_str(),
                        conn.state.as_str(),
                        conn.remote.as_str(),
                    );
                    match index.get(&key) {
                        Some(&i) => groups[i].locals.push(conn.local.clone()),
                        None => {
                            index.insert(key, groups.len());
                            groups.push(RemoteRow {
                                process: process.clone(),
                                rate: *rate,
                                iface: conn.iface.clone(),
                                state: conn.state.clone(),
                                remote: conn.remote.clone(),
                                locals: vec![conn.local.clone()],
                            });
                        }
                    }
                }
            }

            groups.into_iter().map(Row::Remote).collect()
        }
    }
}

/// Descending by the active key; ties keep their previous relative order.
pub fn sort_rows(rows: &mut [Row], key: SortKey) {
    rows.sort_by(|a, b| {
        key.value(b.rate())
            .partial_cmp(&key.value(a.rate()))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
