//! Parsing of one raw `nettop -x` capture.
//!
//! The capture is CSV. The first line names the columns; every following
//! line is either a process-summary row or a connection row. Connection
//! rows belong to the most recent process-summary row above them.

use std::collections::BTreeMap;

/// Separator between local and remote endpoints in a connection row.
pub const ENDPOINT_SEPARATOR: &str = "<->";

/// Interface / state placeholder for missing values.
pub const PLACEHOLDER: &str = "-";

const TRANSPORT_PREFIXES: [&str; 2] = ["tcp", "udp"];

/// Column holding the process name or the connection endpoints.
const IDENT_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Counters {
    pub fn new(bytes_in: u64, bytes_out: u64) -> Self {
        Self {
            bytes_in,
            bytes_out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub iface: String,
    pub state: String,
    pub local: String,
    pub remote: String,
}

pub type ProcTotals = BTreeMap<String, Counters>;
pub type ProcConns = BTreeMap<String, Vec<ConnectionRecord>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub totals: ProcTotals,
    pub conns: ProcConns,
}

/// Positions of the columns the parser cares about.
#[derive(Debug, Default)]
struct Columns {
    iface: Option<usize>,
    state: Option<usize>,
    bytes_in: Option<usize>,
    bytes_out: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Self {
        let find = |name: &str| {
            header
                .iter()
                .enumerate()
                .rev()
                .find(|(i, h)| column_name(*i, h) == name)
                .map(|(i, _)| i)
        };

        Self {
            iface: find("interface"),
            state: find("state"),
            bytes_in: find("bytes_in"),
            bytes_out: find("bytes_out"),
        }
    }
}

/// nettop leaves the process column unnamed in some releases.
fn column_name(index: usize, raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    if index == IDENT_COLUMN && name.is_empty() {
        "process".to_string()
    } else {
        name
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn counter(row: &[String], column: Option<usize>) -> u64 {
    cell(row, column).parse().unwrap_or(0)
}

fn non_empty_or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

pub fn is_connection_ident(ident: &str) -> bool {
    ident.contains(ENDPOINT_SEPARATOR)
        || TRANSPORT_PREFIXES
            .iter()
            .any(|prefix| ident.starts_with(prefix))
}

/// Splits `local<->remote` on the first separator; no separator means no remote.
pub fn split_endpoints(ident: &str) -> (String, String) {
    match ident.split_once(ENDPOINT_SEPARATOR) {
        Some((local, remote)) => (local.trim().to_string(), remote.trim().to_string()),
        None => (ident.trim().to_string(), String::new()),
    }
}

/// Splits one CSV line. Double quotes group fields and `""` escapes a quote.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty() && self.conns.is_empty()
    }

    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
        let Some(header) = lines.next() else {
            return Self::empty();
        };
        let columns = Columns::from_header(&split_csv_line(header));

        let mut snapshot = Self::empty();
        let mut current: Option<String> = None;

        for line in lines {
            let row = split_csv_line(line);
            let ident = cell(&row, Some(IDENT_COLUMN));

            if is_connection_ident(ident) {
                let Some(owner) = current.as_ref() else {
                    continue;
                };
                let (local, remote) = split_endpoints(ident);
                let record = ConnectionRecord {
                    iface: non_empty_or_placeholder(cell(&row, columns.iface)),
                    state: non_empty_or_placeholder(cell(&row, columns.state)),
                    local,
                    remote,
                };
                snapshot
                    .conns
                    .entry(owner.clone())
                    .or_default()
                    .push(record);
                continue;
            }

            if ident.is_empty() {
                continue;
            }

            let process = ident.to_string();
            snapshot.totals.insert(
                process.clone(),
                Counters::new(
                    counter(&row, columns.bytes_in),
                    counter(&row, columns.bytes_out),
                ),
            );
            snapshot.conns.entry(process.clone()).or_default();
            current = Some(process);
        }

        snapshot
    }
}
