//! Tests for origin generation

use corsprobe::origins::{generate, generate_labelled, OriginCategory, BLIND_SUBDOMAIN_LABEL};
use std::collections::BTreeSet;

const TARGET: &str = "https://example.com";
const REFLECTED: &str = "https://attacker.com";

#[test]
fn test_generation_is_idempotent_and_deduplicated() {
    let first = generate(TARGET, REFLECTED, false);
    let second = generate(TARGET, REFLECTED, false);
    assert_eq!(first, second);

    let unique: BTreeSet<&String> = first.iter().collect();
    assert_eq!(unique.len(), first.len(), "duplicates in {first:?}");

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(sorted, first);
}

#[test]
fn test_expected_origins_for_example_com() {
    let origins = generate(TARGET, REFLECTED, false);
    let blind = format!("https://{BLIND_SUBDOMAIN_LABEL}.example.com");

    for expected in [
        "https://attacker.com",
        "null",
        "https://example.com.evil.com",
        "https://evil.example.com",
        "https://attacker.example.com.evil.net",
        "https://attackerexample.com",
        "https://example.com%60.attacker.net",
        "https://example.com%2e.attacker.net",
        "https://evil.com",
        "http://evil.com",
        "https://evil321.ru",
        "http://bulila.bul:8000",
        blind.as_str(),
    ] {
        assert!(
            origins.iter().any(|o| o == expected),
            "missing {expected} in {origins:?}"
        );
    }
    assert_eq!(origins.len(), 13);
}

#[test]
fn test_extended_origins_only_when_requested() {
    let base = generate(TARGET, REFLECTED, false);
    let extended = generate(TARGET, REFLECTED, true);

    for extra in [
        "file://",
        "chrome-extension://abc123",
        "moz-extension://abc123",
        "https://localhost",
        "https://127.0.0.1",
        "https://example.com.",
    ] {
        assert!(!base.iter().any(|o| o == extra), "{extra} leaked into base set");
        assert!(extended.iter().any(|o| o == extra), "{extra} missing from extended set");
    }

    let base_set: BTreeSet<&String> = base.iter().collect();
    let extended_set: BTreeSet<&String> = extended.iter().collect();
    assert!(base_set.is_subset(&extended_set));
}

#[test]
fn test_reflected_origin_kept_verbatim_even_if_malformed() {
    for reflected in ["not an origin", "https://evil.com/with/path", ""] {
        let origins = generate(TARGET, reflected, false);
        assert!(origins.iter().any(|o| o == reflected), "{reflected:?} missing");
    }
}

#[test]
fn test_reflected_origin_collision_is_deduplicated() {
    let origins = generate(TARGET, "https://evil.com", false);
    assert_eq!(origins.iter().filter(|o| *o == "https://evil.com").count(), 1);
    assert_eq!(origins.len(), 12);
}

#[test]
fn test_scheme_and_port_follow_target() {
    let origins = generate("http://shop.local:8080/cart", REFLECTED, true);
    assert!(origins.iter().any(|o| o == "http://evil.shop.local:8080"));
    assert!(origins.iter().any(|o| o == "http://shop.local:8080.evil.com"));
    // Trailing-dot probe is always https
    assert!(origins.iter().any(|o| o == "https://shop.local:8080."));
}

#[test]
fn test_unparseable_target_uses_defaults() {
    let origins = generate("example.com", REFLECTED, false);
    assert!(origins.iter().any(|o| o == "https://target.com.evil.com"));
    assert!(origins
        .iter()
        .any(|o| o == &format!("https://{BLIND_SUBDOMAIN_LABEL}.target.com")));
}

#[test]
fn test_scheme_relative_target_keeps_its_host() {
    let origins = generate("//example.com/account", REFLECTED, false);
    assert!(origins.iter().any(|o| o == "https://evil.example.com"));
    assert!(origins.iter().any(|o| o == "https://example.com.evil.com"));
    assert!(!origins.iter().any(|o| o.contains("target.com")));
}

#[test]
fn test_labelled_output_tags_categories() {
    let labelled = generate_labelled(TARGET, REFLECTED, false);
    assert_eq!(labelled[0], (OriginCategory::Reflected, REFLECTED.to_string()));
    let parser: Vec<&String> = labelled
        .iter()
        .filter(|(c, _)| *c == OriginCategory::ParserConfusion)
        .map(|(_, o)| o)
        .collect();
    assert_eq!(parser.len(), 2);
    assert!(!labelled.iter().any(|(c, _)| *c == OriginCategory::LocalFile));
}
