//! Response caching.
//!
//! - [`response::ResponseCache`]: opt-in TTL cache of successful GET
//!   responses, keyed on caller-built fingerprints. Activated by setting a
//!   cache TTL on the client builder.
//!
//! Fingerprints are plain strings of the form
//! `"<operation>:<k1>=<v1>&<k2>=<v2>"`. The part before the first `:` is the
//! fingerprint's category, used for the per-category breakdown in
//! [`CacheInfo`] and handy as a [`ResponseCache::clear`] pattern.

pub mod response;

pub use response::{CacheConfig, CacheInfo, ResponseCache};

/// Separator between a fingerprint's category and its parameters.
pub const CATEGORY_SEPARATOR: char = ':';

/// Build a stable fingerprint from an operation name and its parameters.
///
/// Parameters are sorted so that insertion order does not matter.
pub fn fingerprint(operation: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort();
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{operation}{CATEGORY_SEPARATOR}{joined}")
}

/// Category of a fingerprint: everything before the first separator.
pub fn category(fingerprint: &str) -> &str {
    fingerprint
        .split_once(CATEGORY_SEPARATOR)
        .map_or(fingerprint, |(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fingerprint_ignores_param_order() {
        let a = fingerprint("search_enheter", &params(&[("navn", "x"), ("size", "5")]));
        let b = fingerprint("search_enheter", &params(&[("size", "5"), ("navn", "x")]));
        assert_eq!(a, b);
        assert_eq!(a, "search_enheter:navn=x&size=5");
    }

    #[test]
    fn fingerprint_differs_on_operation() {
        let p = params(&[("navn", "x")]);
        assert_ne!(fingerprint("enheter", &p), fingerprint("underenheter", &p));
    }

    #[test]
    fn category_is_prefix_before_separator() {
        assert_eq!(category("enhet:987654321"), "enhet");
        assert_eq!(category("kommuner:"), "kommuner");
        assert_eq!(category("no-separator"), "no-separator");
    }
}
