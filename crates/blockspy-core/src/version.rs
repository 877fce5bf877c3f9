//! Version string parsing
//!
//! Servers advertise free-text versions such as `Paper 1.20.4`,
//! `Velocity 3.3.0 (1.8.x-1.21)` or just `1.20.4`. The list filters work on
//! the two halves separately: the flavor (server software) and the dotted
//! base version.

use std::sync::LazyLock;

use regex::Regex;

/// Flavor assumed when the string is nothing but a version number.
pub const DEFAULT_FLAVOR: &str = "Vanilla";

static BASE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").expect("Invalid base version regex"));

/// The two halves of an advertised version string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedVersion {
    pub flavor: Option<String>,
    pub base_version: Option<String>,
}

/// Split a raw version string into flavor and base version.
///
/// - empty input gives neither half
/// - the first dotted number is the base version
/// - with a base version, the first word of what remains (parentheses
///   removed) is the flavor, or [`DEFAULT_FLAVOR`] when nothing remains
/// - without one, the first word of the raw string is the flavor
pub fn parse_version(raw: Option<&str>) -> ParsedVersion {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return ParsedVersion::default(),
    };

    match BASE_VERSION_RE.find(raw) {
        Some(m) => {
            let base = m.as_str().to_string();
            let remainder = raw.replacen(m.as_str(), "", 1).replace(['(', ')'], "");
            let flavor = remainder
                .split_whitespace()
                .next()
                .unwrap_or(DEFAULT_FLAVOR)
                .to_string();
            ParsedVersion {
                flavor: Some(flavor),
                base_version: Some(base),
            }
        }
        None => ParsedVersion {
            flavor: raw.split_whitespace().next().map(str::to_string),
            base_version: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(flavor: Option<&str>, base: Option<&str>) -> ParsedVersion {
        ParsedVersion {
            flavor: flavor.map(str::to_string),
            base_version: base.map(str::to_string),
        }
    }

    #[test]
    fn test_flavor_and_version() {
        assert_eq!(
            parse_version(Some("Paper 1.20.4")),
            parsed(Some("Paper"), Some("1.20.4"))
        );
    }

    #[test]
    fn test_bare_version_is_vanilla() {
        assert_eq!(
            parse_version(Some("1.20.4")),
            parsed(Some("Vanilla"), Some("1.20.4"))
        );
    }

    #[test]
    fn test_no_version_number() {
        assert_eq!(
            parse_version(Some("CustomRP")),
            parsed(Some("CustomRP"), None)
        );
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(parse_version(None), ParsedVersion::default());
        assert_eq!(parse_version(Some("")), ParsedVersion::default());
    }

    #[test]
    fn test_parenthesised_range_uses_first_match() {
        assert_eq!(
            parse_version(Some("Velocity 3.3.0 (1.8.x-1.21)")),
            parsed(Some("Velocity"), Some("3.3.0"))
        );
    }

    #[test]
    fn test_version_in_parentheses_is_vanilla() {
        assert_eq!(
            parse_version(Some("(1.19.2)")),
            parsed(Some("Vanilla"), Some("1.19.2"))
        );
    }

    #[test]
    fn test_single_number_is_not_a_version() {
        assert_eq!(
            parse_version(Some("Build 42 beta")),
            parsed(Some("Build"), None)
        );
    }

    #[test]
    fn test_whitespace_only_remainder() {
        assert_eq!(
            parse_version(Some("  1.8.9  ")),
            parsed(Some("Vanilla"), Some("1.8.9"))
        );
    }

    #[test]
    fn test_idempotent() {
        let first = parse_version(Some("Spigot 1.16.5"));
        let second = parse_version(Some("Spigot 1.16.5"));
        assert_eq!(first, second);
    }
}
