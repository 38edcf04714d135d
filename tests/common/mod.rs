//! Common test utilities

#![allow(dead_code)]

use corsprobe::models::{ProbeResult, ResponseHeaders, ScanConfig, ACAC, ACAO};

/// Creates a test ScanConfig pointing to a wiremock server
pub fn test_config(target: &str) -> ScanConfig {
    ScanConfig {
        target: target.to_string(),
        reflected_origin: "https://attacker.com".to_string(),
        timeout_secs: 5,
        user_agent: "corsprobe-test/0.1.0".to_string(),
        concurrency: 4,
        ..ScanConfig::default()
    }
}

/// Builds a ProbeResult carrying the given ACAO / ACAC values; `None` leaves a header out
pub fn probe(origin: &str, acao: Option<&str>, acac: Option<&str>) -> ProbeResult {
    let mut headers = ResponseHeaders::new();
    if let Some(v) = acao {
        headers.insert(ACAO, v);
    }
    if let Some(v) = acac {
        headers.insert(ACAC, v);
    }
    ProbeResult::new(origin, 200, headers)
}
