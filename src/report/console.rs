//! Terminal rendering of findings

use crate::models::{Finding, ScanResult, Severity, Vulnerability};
use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

fn paint(text: &str, severity: Severity) -> colored::ColoredString {
    text.color(severity.color()).bold()
}

/// Prints each finding with its evidence
pub fn print_findings(findings: &[Finding]) {
    for finding in findings {
        println!(
            "\n  {} {} {}",
            paint(&format!("[{}]", finding.severity), finding.severity),
            finding.vuln.label().bold(),
            format!("({})", finding.endpoint).dimmed()
        );
        for line in finding.info.split(". ") {
            let line = line.trim().trim_end_matches('.');
            if !line.is_empty() {
                println!("    {line}.");
            }
        }
        println!("    {} {}", "Origin:".bold(), finding.evidence.origin.cyan());
        println!("    {} {}", "ACAO:".bold(), finding.evidence.acao);
        println!("    {} {}", "ACAC:".bold(), finding.evidence.acac);
    }
}

/// Prints a per-category count table
pub fn print_summary(result: &ScanResult) {
    println!("\n{}", "  Scan Summary".bold());
    println!("  {}", "─".repeat(35));

    let mut builder = Builder::default();
    builder.push_record(["Vulnerability", "Severity", "Count"]);
    for vuln in Vulnerability::ALL {
        builder.push_record([
            vuln.label().to_string(),
            vuln.severity().to_string(),
            result.count_by_vulnerability(vuln).to_string(),
        ]);
    }
    builder.push_record([
        "Total".to_string(),
        String::new(),
        result.findings.len().to_string(),
    ]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    println!(
        "\n  {} endpoints, {} requests",
        result.endpoints.len().to_string().cyan(),
        result.total_requests.to_string().cyan()
    );

    if result.findings.is_empty() {
        println!("  {}", "No CORS misconfigurations detected.".green());
    } else {
        println!(
            "  {} {} {}",
            format!("{} Critical", result.count_by_severity(Severity::Critical)).red().bold(),
            format!("{} High", result.count_by_severity(Severity::High)).bright_red(),
            format!("{} Medium", result.count_by_severity(Severity::Medium)).yellow(),
        );
    }
}
