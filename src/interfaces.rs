use crate::snapshot::{ConnectionRecord, PLACEHOLDER};

const LOOPBACKS: [&str; 2] = ["lo", "lo0"];

/// Representative interface for a process's connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfaceSummary {
    pub primary: String,
    /// Distinct real interfaces beyond the primary one.
    pub extra: usize,
    pub state: String,
}

impl IfaceSummary {
    fn placeholder() -> Self {
        Self {
            primary: PLACEHOLDER.to_string(),
            extra: 0,
            state: PLACEHOLDER.to_string(),
        }
    }

    /// `en0`, or `en0 (+2)` when the process uses other interfaces too.
    pub fn display(&self) -> String {
        if self.extra == 0 {
            self.primary.clone()
        } else {
            format!("{} (+{})", self.primary, self.extra)
        }
    }
}

fn is_loopback(iface: &str) -> bool {
    LOOPBACKS.contains(&iface)
}

/// Preference order: wired/Wi-Fi, cellular, VPN tunnels, AWDL, anything else.
pub fn score(iface: &str) -> i32 {
    if iface == PLACEHOLDER {
        return -100;
    }
    let name = iface.to_lowercase();
    if name.starts_with("en") {
        100
    } else if name.starts_with("pdp_ip") {
        90
    } else if name.starts_with("utun") {
        80
    } else if name.starts_with("awdl") {
        40
    } else if is_loopback(&name) {
        -10
    } else {
        50
    }
}

pub fn summarize(conns: &[ConnectionRecord]) -> IfaceSummary {
    let Some(first) = conns.first() else {
        return IfaceSummary::placeholder();
    };

    let mut unique: Vec<&str> = Vec::new();
    for conn in conns {
        if !unique.contains(&conn.iface.as_str()) {
            unique.push(conn.iface.as_str());
        }
    }

    let real: Vec<&str> = unique
        .iter()
        .copied()
        .filter(|iface| *iface != PLACEHOLDER)
        .collect();
    let external: Vec<&str> = real
        .iter()
        .copied()
        .filter(|iface| !is_loopback(iface))
        .collect();

    let candidates = if !external.is_empty() {
        external
    } else if !real.is_empty() {
        real.clone()
    } else {
        vec![PLACEHOLDER]
    };

    let primary = candidates
        .into_iter()
        .max_by(|a, b| score(a).cmp(&score(b)).then_with(|| a.cmp(b)))
        .unwrap_or(PLACEHOLDER);

    let state = conns
        .iter()
        .find(|conn| conn.iface == primary)
        .unwrap_or(first)
        .state
        .clone();

    IfaceSummary {
        primary: primary.to_string(),
        extra: real.len().saturating_sub(1),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(iface: &str, state: &str) -> ConnectionRecord {
        ConnectionRecord {
            iface: iface.to_string(),
            state: state.to_string(),
            local: "tcp4 10.0.0.2:5000".to_string(),
            remote: "1.2.3.4:443".to_string(),
        }
    }

    #[test]
    fn test_empty_connections() {
        assert_eq!(summarize(&[]), IfaceSummary::placeholder());
    }

    #[test]
    fn test_placeholder_only() {
        let summary = summarize(&[conn("-", "-")]);
        assert_eq!(summary.primary, "-");
        assert_eq!(summary.extra, 0);
        assert_eq!(summary.state, "-");
    }

    #[test]
    fn test_external_preferred_over_loopback() {
        let summary = summarize(&[conn("en0", "Established"), conn("lo0", "Listen")]);
        assert_eq!(summary.primary, "en0");
        assert_eq!(summary.extra, 1);
        assert_eq!(summary.state, "Established");
        assert_eq!(summary.display(), "en0 (+1)");
    }

    #[test]
    fn test_loopback_used_when_nothing_else() {
        let summary = summarize(&[conn("-", "Listen"), conn("lo0", "Established")]);
        assert_eq!(summary.primary, "lo0");
        assert_eq!(summary.extra, 0);
        assert_eq!(summary.state, "Established");
        assert_eq!(summary.display(), "lo0");
    }

    #[test]
    fn test_score_ordering() {
        let summary = summarize(&[
            conn("awdl0", "a"),
            conn("utun2", "b"),
            conn("pdp_ip0", "c"),
            conn("en1", "d"),
        ]);
        assert_eq!(summary.primary, "en1");
        assert_eq!(summary.extra, 3);
        assert_eq!(summary.state, "d");

        let summary = summarize(&[conn("bridge0", "a"), conn("utun0", "b")]);
        assert_eq!(summary.primary, "utun0");
    }

    #[test]
    fn test_equal_score_picks_greatest_name() {
        let summary = summarize(&[conn("en0", "first"), conn("en7", "second")]);
        assert_eq!(summary.primary, "en7");
        assert_eq!(summary.state, "second");

        let summary = summarize(&[conn("bridge0", "x"), conn("gif0", "y")]);
        assert_eq!(summary.primary, "gif0");
    }

    #[test]
    fn test_duplicate_interfaces_counted_once() {
        let summary = summarize(&[
            conn("en0", "Established"),
            conn("en0", "CloseWait"),
            conn("-", "-"),
        ]);
        assert_eq!(summary.primary, "en0");
        assert_eq!(summary.extra, 0);
        assert_eq!(summary.state, "Established");
    }
}
