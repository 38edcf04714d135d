//! JSON report export

use crate::error::Result;
use crate::models::{Finding, ScanResult};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Default file name for a findings-only export
pub const DEFAULT_FINDINGS_FILE: &str = "cors_findings.json";

/// Exports the full scan result as a JSON file
pub fn export(result: &ScanResult, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(output_path, json)?;
    info!("JSON report saved to {}", output_path.display());
    Ok(())
}

/// Exports just the findings array as a JSON file
pub fn export_findings(findings: &[Finding], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    std::fs::write(output_path, json)?;
    info!("Saved {} findings to {}", findings.len(), output_path.display());
    Ok(())
}

/// Either shape `scan` can write
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedReport {
    Full(ScanResult),
    Findings(Vec<Finding>),
}

/// Loads a report written by [`export`] or [`export_findings`].
///
/// A bare findings array is wrapped in a ScanResult with no target; its
/// endpoints are the distinct endpoints the findings name.
pub fn load(input_path: &Path) -> Result<ScanResult> {
    let content = std::fs::read_to_string(input_path)?;
    match serde_json::from_str(&content)? {
        SavedReport::Full(result) => Ok(result),
        SavedReport::Findings(findings) => {
            debug!("{} holds a findings array", input_path.display());
            let mut result = ScanResult::new("");
            result.endpoints = findings
                .iter()
                .map(|f| f.endpoint.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            result.findings = findings;
            result.finish();
            Ok(result)
        }
    }
}
