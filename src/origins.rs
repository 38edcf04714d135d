//! Crafted `Origin` values for CORS probing
//!
//! The catalogue below is a flat list of rules, each tagging the attack
//! category it exercises. Adding a new probe means adding a rule; the
//! generation loop never changes.

use crate::error::{CorsProbeError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Subdomain label that should never exist on a real target
pub const BLIND_SUBDOMAIN_LABEL: &str = "YshachaR";

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_HOST: &str = "target.com";

/// Attack category an origin belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OriginCategory {
    Reflected,
    KnownBad,
    Null,
    SuffixConfusion,
    PrefixConfusion,
    NestedDomain,
    Concatenation,
    ParserConfusion,
    BlindSubdomain,
    LocalFile,
    BrowserExtension,
    Loopback,
    TrailingDot,
}

impl fmt::Display for OriginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OriginCategory::Reflected => "reflected",
            OriginCategory::KnownBad => "known-bad",
            OriginCategory::Null => "null",
            OriginCategory::SuffixConfusion => "suffix-confusion",
            OriginCategory::PrefixConfusion => "prefix-confusion",
            OriginCategory::NestedDomain => "nested-domain",
            OriginCategory::Concatenation => "concatenation",
            OriginCategory::ParserConfusion => "parser-confusion",
            OriginCategory::BlindSubdomain => "blind-subdomain",
            OriginCategory::LocalFile => "local-file",
            OriginCategory::BrowserExtension => "browser-extension",
            OriginCategory::Loopback => "loopback",
            OriginCategory::TrailingDot => "trailing-dot",
        };
        f.pad(name)
    }
}

/// Inputs every rule builds from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginContext<'a> {
    /// Scheme of the target URL
    pub scheme: String,
    /// Host of the target URL, with its port when one is explicit
    pub host: String,
    /// Attacker-supplied origin, unvalidated
    pub reflected: &'a str,
}

impl<'a> OriginContext<'a> {
    /// Never fails. Scheme and host fall back to `https` and `target.com`
    /// independently, so `//example.com` still yields `https://example.com`.
    pub fn new(target_url: &str, reflected: &'a str) -> Self {
        let (scheme, parsed) = match Url::parse(target_url) {
            Ok(url) => (Some(url.scheme().to_string()), Some(url)),
            // Scheme-relative target: borrow the default scheme only to read the host
            Err(_) if target_url.starts_with("//") => (
                None,
                Url::parse(&format!("{DEFAULT_SCHEME}:{target_url}")).ok(),
            ),
            Err(_) => (None, None),
        };
        let scheme = scheme
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        let host = parsed
            .as_ref()
            .and_then(authority)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Self {
            scheme,
            host,
            reflected,
        }
    }

    fn origin(&self, host: String) -> String {
        format!("{}://{host}", self.scheme)
    }
}

fn authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// One entry of the origin catalogue
pub struct OriginRule {
    pub category: OriginCategory,
    pub build: fn(&OriginContext<'_>) -> Vec<String>,
}

const BASE_RULES: &[OriginRule] = &[
    OriginRule {
        category: OriginCategory::Reflected,
        build: |ctx| vec![ctx.reflected.to_string()],
    },
    OriginRule {
        category: OriginCategory::KnownBad,
        build: |_| {
            [
                "https://evil.com",
                "http://evil.com",
                "https://evil321.ru",
                "http://bulila.bul:8000",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect()
        },
    },
    OriginRule {
        category: OriginCategory::Null,
        build: |_| vec!["null".to_string()],
    },
    OriginRule {
        category: OriginCategory::SuffixConfusion,
        build: |ctx| vec![ctx.origin(format!("{}.evil.com", ctx.host))],
    },
    OriginRule {
        category: OriginCategory::PrefixConfusion,
        build: |ctx| vec![ctx.origin(format!("evil.{}", ctx.host))],
    },
    OriginRule {
        category: OriginCategory::NestedDomain,
        build: |ctx| vec![ctx.origin(format!("attacker.{}.evil.net", ctx.host))],
    },
    OriginRule {
        category: OriginCategory::Concatenation,
        build: |ctx| vec![ctx.origin(format!("attacker{}", ctx.host))],
    },
    OriginRule {
        category: OriginCategory::ParserConfusion,
        build: |ctx| {
            vec![
                ctx.origin(format!("{}%60.attacker.net", ctx.host)),
                ctx.origin(format!("{}%2e.attacker.net", ctx.host)),
            ]
        },
    },
    OriginRule {
        category: OriginCategory::BlindSubdomain,
        build: |ctx| vec![ctx.origin(format!("{BLIND_SUBDOMAIN_LABEL}.{}", ctx.host))],
    },
];

const EXTENDED_RULES: &[OriginRule] = &[
    OriginRule {
        category: OriginCategory::LocalFile,
        build: |_| vec!["file://".to_string()],
    },
    OriginRule {
        category: OriginCategory::BrowserExtension,
        build: |_| {
            vec![
                "chrome-extension://abc123".to_string(),
                "moz-extension://abc123".to_string(),
            ]
        },
    },
    OriginRule {
        category: OriginCategory::Loopback,
        build: |_| {
            vec![
                "https://localhost".to_string(),
                "https://127.0.0.1".to_string(),
            ]
        },
    },
    OriginRule {
        category: OriginCategory::TrailingDot,
        build: |ctx| vec![format!("https://{}.", ctx.host)],
    },
];

/// Returns the rules active for the given mode, base rules first
pub fn catalogue(extended: bool) -> impl Iterator<Item = &'static OriginRule> {
    let extra: &'static [OriginRule] = if extended { EXTENDED_RULES } else { &[] };
    BASE_RULES.iter().chain(extra.iter())
}

/// Every crafted origin with the category that produced it, in catalogue order.
/// May contain duplicates when two rules collide.
pub fn generate_labelled(
    target_url: &str,
    reflected_origin: &str,
    extended: bool,
) -> Vec<(OriginCategory, String)> {
    let ctx = OriginContext::new(target_url, reflected_origin);
    catalogue(extended)
        .flat_map(|rule| {
            (rule.build)(&ctx)
                .into_iter()
                .map(move |origin| (rule.category, origin))
        })
        .collect()
}

/// Builds the deduplicated, sorted set of origins to probe `target_url` with
pub fn generate(target_url: &str, reflected_origin: &str, extended: bool) -> Vec<String> {
    generate_labelled(target_url, reflected_origin, extended)
        .into_iter()
        .map(|(_, origin)| origin)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reduces a target URL to `scheme://host[:port]`, the base probes are sent to
pub fn target_base(target_url: &str) -> Result<String> {
    let url = Url::parse(target_url)?;
    let host = authority(&url)
        .ok_or_else(|| CorsProbeError::ConfigError(format!("Target has no host: {target_url}")))?;
    Ok(format!("{}://{host}", url.scheme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_explicit_port() {
        let ctx = OriginContext::new("http://shop.example.com:8080/api?x=1", "null");
        assert_eq!(ctx.scheme, "http");
        assert_eq!(ctx.host, "shop.example.com:8080");
    }

    #[test]
    fn test_context_falls_back_on_garbage() {
        let ctx = OriginContext::new("not a url", "null");
        assert_eq!(ctx.scheme, "https");
        assert_eq!(ctx.host, "target.com");
    }

    #[test]
    fn test_context_scheme_relative_target_keeps_host() {
        let ctx = OriginContext::new("//example.com:8443/path", "null");
        assert_eq!(ctx.scheme, "https");
        assert_eq!(ctx.host, "example.com:8443");
    }

    #[test]
    fn test_context_missing_host_falls_back_alone() {
        let ctx = OriginContext::new("mailto:admin", "null");
        assert_eq!(ctx.scheme, "mailto");
        assert_eq!(ctx.host, "target.com");
    }

    #[test]
    fn test_extended_rules_are_opt_in() {
        assert_eq!(catalogue(false).count(), BASE_RULES.len());
        assert_eq!(
            catalogue(true).count(),
            BASE_RULES.len() + EXTENDED_RULES.len()
        );
    }

    #[test]
    fn test_target_base_strips_path() {
        assert_eq!(
            target_base("https://example.com/some/path?q=1").expect("base"),
            "https://example.com"
        );
        assert_eq!(
            target_base("http://127.0.0.1:5000/").expect("base"),
            "http://127.0.0.1:5000"
        );
        assert!(target_base("example.com").is_err());
    }
}
