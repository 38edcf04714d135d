//! Endpoint loading and normalisation

use crate::error::{CorsProbeError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

fn endpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[/a-zA-Z0-9_-]+$").expect("static endpoint regex"))
}

/// Normalises a raw endpoint: leading `/` enforced, one trailing `/` dropped.
/// Returns `None` for blank input or anything outside `[/a-zA-Z0-9_-]`.
pub fn clean_endpoint(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut endpoint = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    if endpoint.len() > 1 && endpoint.ends_with('/') {
        endpoint.pop();
    }

    endpoint_pattern().is_match(&endpoint).then_some(endpoint)
}

/// Loads the endpoints to probe.
///
/// A single endpoint takes precedence over the list file. With neither,
/// only the site root is probed.
pub fn load_endpoints(endpoint: Option<&str>, list_file: Option<&Path>) -> Result<Vec<String>> {
    let mut endpoints = BTreeSet::new();

    if let Some(raw) = endpoint {
        match clean_endpoint(raw) {
            Some(ep) => {
                endpoints.insert(ep);
            }
            None => debug!("Skipping invalid endpoint '{raw}'"),
        }
    } else if let Some(path) = list_file {
        if !path.is_file() {
            return Err(CorsProbeError::EndpointFile(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        for line in content.lines() {
            match clean_endpoint(line) {
                Some(ep) => {
                    endpoints.insert(ep);
                }
                None if line.trim().is_empty() => {}
                None => debug!("Skipping invalid endpoint '{}'", line.trim()),
            }
        }
    } else {
        endpoints.insert("/".to_string());
    }

    Ok(endpoints.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_endpoint() {
        assert_eq!(clean_endpoint("api/users/"), Some("/api/users".to_string()));
        assert_eq!(clean_endpoint("  /account_details  "), Some("/account_details".to_string()));
        assert_eq!(clean_endpoint("/"), Some("/".to_string()));
        assert_eq!(clean_endpoint("/search?q=1"), None);
        assert_eq!(clean_endpoint("/a.php"), None);
        assert_eq!(clean_endpoint("   "), None);
    }

    #[test]
    fn test_single_endpoint_wins() {
        let eps = load_endpoints(Some("me"), Some(Path::new("/does/not/exist"))).expect("load");
        assert_eq!(eps, vec!["/me".to_string()]);
    }

    #[test]
    fn test_defaults_to_root() {
        assert_eq!(load_endpoints(None, None).expect("load"), vec!["/".to_string()]);
    }
}
