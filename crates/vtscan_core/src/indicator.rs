use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Digit classes are spelled out: `\d` in `regex` also matches non-ASCII digits.
// The octet rule only counts digits, so `999.999.999.999` is accepted.
static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}$").expect("ipv4 pattern"));
static DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$").expect("domain pattern"));
static HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{32,64}$").expect("hash pattern"));

/// What a free-text search query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Domain,
    Ipv4,
    Hash,
}

impl IndicatorKind {
    /// Resource collection that serves reports for this kind.
    pub fn resource(self) -> &'static str {
        match self {
            IndicatorKind::Domain => "domains",
            IndicatorKind::Ipv4 => "ip_addresses",
            IndicatorKind::Hash => "files",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Domain => "domain",
            IndicatorKind::Ipv4 => "ip",
            IndicatorKind::Hash => "hash",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a query as an IPv4 address, a domain or a digest, in that order.
///
/// Returns `None` when nothing matches; callers must not issue a lookup then.
/// The text is matched as given, without trimming.
pub fn classify(text: &str) -> Option<IndicatorKind> {
    if IPV4.is_match(text) {
        Some(IndicatorKind::Ipv4)
    } else if DOMAIN.is_match(text) {
        Some(IndicatorKind::Domain)
    } else if HASH.is_match(text) {
        Some(IndicatorKind::Hash)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_wins_over_domain() {
        // Four numeric labels would never pass the domain rule, but keep the order explicit.
        assert_eq!(classify("10.0.0.1"), Some(IndicatorKind::Ipv4));
    }

    #[test]
    fn hex_lengths_outside_range_are_rejected() {
        assert_eq!(classify(&"a".repeat(31)), None);
        assert_eq!(classify(&"a".repeat(65)), None);
    }
}
