//! Tests for JSON reports, PoC pages, endpoint files and config files

mod common;

use common::probe;
use corsprobe::analyzer::analyze;
use corsprobe::config;
use corsprobe::endpoints::load_endpoints;
use corsprobe::models::{ScanResult, Vulnerability};
use corsprobe::poc::{self, PocKind};
use corsprobe::report;
use std::io::Write;

fn sample_result() -> ScanResult {
    let mut result = ScanResult::new("https://victim.com");
    result.endpoints = vec!["/api/me".to_string()];
    result.findings = analyze(
        &[
            probe("https://evil.com", Some("https://evil.com"), Some("true")),
            probe("null", Some("null"), None),
        ],
        "/api/me",
    );
    result.total_requests = 2;
    result.finish();
    result
}

#[test]
fn test_findings_export_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(report::json::DEFAULT_FINDINGS_FILE);
    let result = sample_result();

    report::json::export_findings(&result.findings, &path).expect("export");

    let raw = std::fs::read_to_string(&path).expect("read back");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let items = value.as_array().expect("array of findings");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["vuln"], "Parser Confusion / Improper Origin Matching");
    assert_eq!(items[0]["endpoint"], "/api/me");
    assert_eq!(items[0]["evidence"]["origin"], "https://evil.com");
    assert_eq!(items[2]["vuln"], "Null Origin Whitelist");
    assert_eq!(items[2]["evidence"]["acac"], "");
}

#[test]
fn test_findings_file_loads_as_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(report::json::DEFAULT_FINDINGS_FILE);
    let result = sample_result();

    report::json::export_findings(&result.findings, &path).expect("export");
    let loaded = report::json::load(&path).expect("load findings array");

    assert_eq!(loaded.findings, result.findings);
    assert_eq!(loaded.endpoints, vec!["/api/me".to_string()]);
    assert_eq!(loaded.count_by_vulnerability(Vulnerability::NullOriginWhitelist), 1);
    assert!(loaded.finished_at.is_some());
}

#[test]
fn test_empty_findings_file_loads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.json");

    report::json::export_findings(&[], &path).expect("export");
    let loaded = report::json::load(&path).expect("load empty array");

    assert!(loaded.findings.is_empty());
    assert!(loaded.endpoints.is_empty());
}

#[test]
fn test_load_rejects_unrelated_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("other.json");
    std::fs::write(&path, r#"{"hello": "world"}"#).expect("write");

    assert!(report::json::load(&path).is_err());
}

#[test]
fn test_full_report_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scan.json");
    let result = sample_result();

    report::json::export(&result, &path).expect("export");
    let loaded = report::json::load(&path).expect("load");

    assert_eq!(loaded.scan_id, result.scan_id);
    assert_eq!(loaded.findings, result.findings);
    assert_eq!(
        loaded.count_by_vulnerability(Vulnerability::ReflectedOriginWithCredentials),
        1
    );
}

#[test]
fn test_load_rejects_garbage() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "not json").expect("write");
    assert!(report::json::load(file.path()).is_err());
}

#[test]
fn test_poc_written_for_finding() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = sample_result();
    let null_finding = result
        .findings
        .iter()
        .find(|f| f.vuln == Vulnerability::NullOriginWhitelist)
        .expect("null finding");

    let kind = PocKind::for_vulnerability(null_finding.vuln).expect("poc kind");
    assert_eq!(kind, PocKind::NullOrigin);

    let path = poc::write(
        kind,
        &result.target,
        &null_finding.endpoint,
        "https://logs.evil.com/",
        dir.path(),
    )
    .expect("write poc");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("poc_null_origin_api_me.html")
    );
    let html = std::fs::read_to_string(&path).expect("read poc");
    assert!(html.contains("https://victim.com/api/me"));
    assert!(html.contains("https://logs.evil.com/log"));
    assert!(html.contains("sandbox="));
}

#[test]
fn test_no_poc_for_wildcard() {
    assert_eq!(PocKind::for_vulnerability(Vulnerability::WildcardWithCredentials), None);
}

#[test]
fn test_endpoint_list_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "users\n/admin/\n/users\n/with space\n").expect("write");

    let endpoints = load_endpoints(None, Some(file.path())).expect("load");
    assert_eq!(endpoints, vec!["/admin".to_string(), "/users".to_string()]);
}

#[test]
fn test_config_file_loading() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "[scan]\ntimeout_secs = 3\nverify_tls = false\n\n[origins]\nextended = true\n"
    )
    .expect("write");

    let config = config::load_config(file.path()).expect("load config");
    assert_eq!(config.timeout_secs, 3);
    assert!(!config.verify_tls);
    assert!(config.extended);
    assert_eq!(config.method, "GET");
}

#[test]
fn test_config_file_missing() {
    assert!(config::load_config(std::path::Path::new("/no/such/corsprobe.toml")).is_err());
}
