//! Labels — the `SERVICE_*` label vocabulary.
//!
//! Top-level labels (`SERVICE_IGNORE`, `SERVICE_NAME`, `SERVICE_TAGS`) are read
//! directly. Port-indexed check labels are folded in a single pass into one
//! [`CheckFragment`] per private port; nothing is rendered here because the
//! public port a check must target is only known once the port mappings exist.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::error::CompileError;

pub const SERVICE_IGNORE: &str = "SERVICE_IGNORE";
pub const SERVICE_NAME: &str = "SERVICE_NAME";
pub const SERVICE_TAGS: &str = "SERVICE_TAGS";

/// `SERVICE_<n>_CHECK_<FIELD>` or `SERVICE_<n>_INITIAL_STATUS`. `<n>` must be
/// written without leading zeros to name a private port.
static PORT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SERVICE_(0|[1-9]\d*)_(?:CHECK_(HTTPS|HTTP|TCP|SCRIPT|TTL|INTERVAL|TIMEOUT)|INITIAL_STATUS)$")
        .expect("valid regex")
});

/// Health check flavour selected by a `SERVICE_<n>_CHECK_<KIND>` label.
///
/// Declaration order is precedence: when several kinds target the same port
/// the smallest one wins, whatever order the labels were read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckKind {
    Http,
    Https,
    Tcp,
    Script,
    Ttl,
}

impl FromStr for CheckKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTTP" => Ok(CheckKind::Http),
            "HTTPS" => Ok(CheckKind::Https),
            "TCP" => Ok(CheckKind::Tcp),
            "SCRIPT" => Ok(CheckKind::Script),
            "TTL" => Ok(CheckKind::Ttl),
            other => Err(CompileError::UnmatchedCheck(other.to_string())),
        }
    }
}

/// The label that contributed a check kind, kept verbatim for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindLabel {
    pub key: String,
    pub value: String,
}

/// Partial check accumulated from every label sharing one port index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckFragment {
    pub kinds: BTreeMap<CheckKind, KindLabel>,
    pub interval: Option<String>,
    pub timeout: Option<String>,
    pub status: Option<String>,
}

impl CheckFragment {
    /// The winning kind label, if any kind was declared.
    pub fn primary(&self) -> Option<(CheckKind, &KindLabel)> {
        self.kinds.iter().next().map(|(kind, label)| (*kind, label))
    }
}

/// Fragments keyed by private port.
pub type CheckFragments = BTreeMap<u16, CheckFragment>;

/// Fold every port-indexed check label into per-port fragments.
///
/// Keys that do not match the vocabulary are ignored. A `TCP` label only
/// counts when its value is `true` (case-insensitive).
pub fn parse_check_labels(labels: &HashMap<String, String>) -> Result<CheckFragments, CompileError> {
    let mut fragments = CheckFragments::new();

    for (key, value) in labels {
        let Some(caps) = PORT_LABEL.captures(key) else {
            continue;
        };

        let port = match caps[1].parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                tracing::warn!(label = %key, "Port index out of range, ignoring label");
                continue;
            }
        };

        let fragment = fragments.entry(port).or_default();
        match caps.get(2).map(|m| m.as_str()) {
            None => fragment.status = Some(value.clone()),
            Some("INTERVAL") => fragment.interval = Some(value.clone()),
            Some("TIMEOUT") => fragment.timeout = Some(value.clone()),
            Some(kind) => {
                let kind = kind.parse::<CheckKind>()?;
                if kind == CheckKind::Tcp && !value.eq_ignore_ascii_case("true") {
                    continue;
                }
                fragment.kinds.insert(
                    kind,
                    KindLabel {
                        key: key.clone(),
                        value: value.clone(),
                    },
                );
            }
        }
    }

    Ok(fragments)
}

/// `SERVICE_IGNORE` triggers on presence alone; its value is never inspected.
pub fn is_ignored(labels: &HashMap<String, String>) -> bool {
    labels.contains_key(SERVICE_IGNORE)
}

pub fn service_name(labels: &HashMap<String, String>) -> Option<String> {
    labels
        .get(SERVICE_NAME)
        .filter(|name| !name.is_empty())
        .cloned()
}

/// Comma-separated tags, order kept, empty segments kept, no dedup.
pub fn service_tags(labels: &HashMap<String, String>) -> Option<Vec<String>> {
    labels
        .get(SERVICE_TAGS)
        .filter(|tags| !tags.is_empty())
        .map(|tags| tags.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_http_label_creates_fragment() {
        let fragments = parse_check_labels(&labels(&[("SERVICE_80_CHECK_HTTP", "/health")])).unwrap();
        let fragment = &fragments[&80];
        let (kind, label) = fragment.primary().unwrap();
        assert_eq!(kind, CheckKind::Http);
        assert_eq!(label.key, "SERVICE_80_CHECK_HTTP");
        assert_eq!(label.value, "/health");
        assert!(fragment.interval.is_none());
        assert!(fragment.timeout.is_none());
    }

    #[test]
    fn test_overrides_accumulate_on_same_port() {
        let fragments = parse_check_labels(&labels(&[
            ("SERVICE_80_CHECK_INTERVAL", "30s"),
            ("SERVICE_80_CHECK_HTTP", "/"),
            ("SERVICE_80_CHECK_TIMEOUT", "5s"),
            ("SERVICE_80_INITIAL_STATUS", "passing"),
        ]))
        .unwrap();
        assert_eq!(fragments.len(), 1);
        let fragment = &fragments[&80];
        assert_eq!(fragment.interval.as_deref(), Some("30s"));
        assert_eq!(fragment.timeout.as_deref(), Some("5s"));
        assert_eq!(fragment.status.as_deref(), Some("passing"));
        assert!(fragment.primary().is_some());
    }

    #[test]
    fn test_fragments_are_keyed_per_port() {
        let fragments = parse_check_labels(&labels(&[
            ("SERVICE_80_CHECK_HTTP", "/"),
            ("SERVICE_443_CHECK_HTTPS", "/"),
        ]))
        .unwrap();
        assert_eq!(fragments.keys().copied().collect::<Vec<_>>(), vec![80, 443]);
        assert_eq!(fragments[&443].primary().unwrap().0, CheckKind::Https);
    }

    #[test]
    fn test_tcp_requires_true_value() {
        let fragments = parse_check_labels(&labels(&[("SERVICE_6379_CHECK_TCP", "TRUE")])).unwrap();
        assert_eq!(fragments[&6379].primary().unwrap().0, CheckKind::Tcp);

        let fragments = parse_check_labels(&labels(&[("SERVICE_6379_CHECK_TCP", "yes")])).unwrap();
        assert!(fragments[&6379].primary().is_none());
    }

    #[test]
    fn test_kind_precedence_is_fixed() {
        let fragments = parse_check_labels(&labels(&[
            ("SERVICE_80_CHECK_TTL", "15s"),
            ("SERVICE_80_CHECK_SCRIPT", "check.sh"),
            ("SERVICE_80_CHECK_HTTPS", "/secure"),
        ]))
        .unwrap();
        assert_eq!(fragments[&80].primary().unwrap().0, CheckKind::Https);
    }

    #[test]
    fn test_unrelated_labels_are_ignored() {
        let fragments = parse_check_labels(&labels(&[
            ("SERVICE_NAME", "web"),
            ("SERVICE_80_CHECK_GRPC", "x"),
            ("SERVICE_X_CHECK_HTTP", "/"),
            ("io.rancher.stack.name", "prod"),
        ]))
        .unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_out_of_range_port_index_is_ignored() {
        let fragments = parse_check_labels(&labels(&[("SERVICE_99999_CHECK_HTTP", "/")])).unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_leading_zero_port_index_is_ignored() {
        let fragments = parse_check_labels(&labels(&[
            ("SERVICE_080_CHECK_HTTP", "/h"),
            ("SERVICE_00_CHECK_TCP", "true"),
        ]))
        .unwrap();
        assert!(fragments.is_empty());

        let fragments = parse_check_labels(&labels(&[("SERVICE_0_CHECK_TCP", "true")])).unwrap();
        assert_eq!(fragments.keys().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_parse_is_independent_of_insertion_order() {
        let pairs = [
            ("SERVICE_80_CHECK_TTL", "15s"),
            ("SERVICE_80_CHECK_HTTP", "/health"),
            ("SERVICE_80_CHECK_INTERVAL", "5s"),
            ("SERVICE_80_INITIAL_STATUS", "passing"),
            ("SERVICE_443_CHECK_SCRIPT", "check.sh"),
            ("SERVICE_443_CHECK_HTTPS", "/secure"),
            ("SERVICE_6379_CHECK_TCP", "true"),
        ];
        let expected = parse_check_labels(&labels(&pairs)).unwrap();

        let mut reversed = pairs;
        reversed.reverse();
        let mut rotated = pairs;
        rotated.rotate_left(3);

        for order in [&reversed[..], &rotated[..]] {
            // capacity changes the table layout, and with it iteration order
            for capacity in [0, 16, 64] {
                let mut map = HashMap::with_capacity(capacity);
                for (k, v) in order {
                    map.insert(k.to_string(), v.to_string());
                }
                assert_eq!(parse_check_labels(&map).unwrap(), expected);
            }
        }
        assert_eq!(expected[&80].primary().unwrap().0, CheckKind::Http);
        assert_eq!(expected[&443].primary().unwrap().0, CheckKind::Https);
    }

    #[test]
    fn test_unknown_kind_is_unmatched_check() {
        let err = "GRPC".parse::<CheckKind>().unwrap_err();
        assert_eq!(err, CompileError::UnmatchedCheck("GRPC".to_string()));
    }

    #[test]
    fn test_ignore_is_presence_only() {
        assert!(is_ignored(&labels(&[("SERVICE_IGNORE", "")])));
        assert!(is_ignored(&labels(&[("SERVICE_IGNORE", "false")])));
        assert!(!is_ignored(&labels(&[("SERVICE_NAME", "web")])));
    }

    #[test]
    fn test_service_name() {
        assert_eq!(service_name(&labels(&[("SERVICE_NAME", "web")])).as_deref(), Some("web"));
        assert_eq!(service_name(&labels(&[("SERVICE_NAME", "")])), None);
        assert_eq!(service_name(&HashMap::new()), None);
    }

    #[test]
    fn test_service_tags_keep_order_and_empty_segments() {
        assert_eq!(
            service_tags(&labels(&[("SERVICE_TAGS", "a,b,c")])),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(
            service_tags(&labels(&[("SERVICE_TAGS", "b,,b")])),
            Some(vec!["b".to_string(), "".to_string(), "b".to_string()])
        );
        assert_eq!(service_tags(&HashMap::new()), None);
    }
}
