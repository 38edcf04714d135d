//! Classifies the responses collected for one endpoint into CORS findings

use crate::models::{Finding, ProbeResult, Vulnerability};
use crate::origins::BLIND_SUBDOMAIN_LABEL;
use tracing::debug;

/// A single check: which category it reports and when it fires
pub struct Detector {
    pub vulnerability: Vulnerability,
    pub matches: fn(&ProbeResult) -> bool,
}

/// Detectors in the order their findings are reported
pub const DETECTORS: &[Detector] = &[
    Detector {
        vulnerability: Vulnerability::BlindSubdomainTrust,
        matches: |probe| {
            probe.origin.contains(&format!("{BLIND_SUBDOMAIN_LABEL}."))
                && probe.reflects_origin()
                && probe.allows_credentials()
        },
    },
    Detector {
        vulnerability: Vulnerability::ParserConfusion,
        matches: |probe| probe.reflects_origin() && probe.allows_credentials(),
    },
    Detector {
        vulnerability: Vulnerability::WildcardWithCredentials,
        matches: |probe| probe.acao() == "*" && probe.allows_credentials(),
    },
    Detector {
        vulnerability: Vulnerability::ReflectedOriginWithCredentials,
        matches: |probe| probe.reflects_origin() && probe.allows_credentials(),
    },
    Detector {
        vulnerability: Vulnerability::NullOriginWhitelist,
        matches: |probe| probe.acao() == "null",
    },
];

/// Runs every detector over the full result set.
///
/// Detectors are independent: one probe may produce several findings, and
/// the output is ordered by detector first, then by probe.
pub fn analyze(results: &[ProbeResult], endpoint: &str) -> Vec<Finding> {
    let findings: Vec<Finding> = DETECTORS
        .iter()
        .flat_map(|detector| {
            results
                .iter()
                .filter(move |probe| (detector.matches)(probe))
                .map(move |probe| Finding::new(detector.vulnerability, probe, endpoint))
        })
        .collect();

    debug!(
        "Analyzed {} responses for {endpoint}: {} findings",
        results.len(),
        findings.len()
    );
    findings
}
