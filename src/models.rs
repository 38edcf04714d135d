//! Core data models for corsprobe

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Name of the `Access-Control-Allow-Origin` response header
pub const ACAO: &str = "Access-Control-Allow-Origin";
/// Name of the `Access-Control-Allow-Credentials` response header
pub const ACAC: &str = "Access-Control-Allow-Credentials";

/// Severity level for CORS findings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
        }
    }
}

impl Severity {
    /// Returns the color name for terminal output
    pub fn color(&self) -> &str {
        match self {
            Severity::Critical => "red",
            Severity::High => "bright red",
            Severity::Medium => "yellow",
        }
    }
}

/// CORS misconfiguration categories reported by the analyzer.
///
/// Serialized as the human-readable label so that saved reports carry the
/// same `vuln` strings shown on the console.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Vulnerability {
    #[serde(rename = "Blind Subdomain Trust")]
    BlindSubdomainTrust,
    #[serde(rename = "Parser Confusion / Improper Origin Matching")]
    ParserConfusion,
    #[serde(rename = "Wildcard (*) + Credentials")]
    WildcardWithCredentials,
    #[serde(rename = "Reflected Origin + Allow-Credentials true")]
    ReflectedOriginWithCredentials,
    #[serde(rename = "Null Origin Whitelist")]
    NullOriginWhitelist,
}

impl Vulnerability {
    /// All categories in analyzer order
    pub const ALL: [Vulnerability; 5] = [
        Vulnerability::BlindSubdomainTrust,
        Vulnerability::ParserConfusion,
        Vulnerability::WildcardWithCredentials,
        Vulnerability::ReflectedOriginWithCredentials,
        Vulnerability::NullOriginWhitelist,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Vulnerability::BlindSubdomainTrust => "Blind Subdomain Trust",
            Vulnerability::ParserConfusion => "Parser Confusion / Improper Origin Matching",
            Vulnerability::WildcardWithCredentials => "Wildcard (*) + Credentials",
            Vulnerability::ReflectedOriginWithCredentials => {
                "Reflected Origin + Allow-Credentials true"
            }
            Vulnerability::NullOriginWhitelist => "Null Origin Whitelist",
        }
    }

    /// Explanation attached to every finding of this category
    pub fn info(&self) -> &'static str {
        match self {
            Vulnerability::BlindSubdomainTrust => {
                "The server accepts origins from subdomains that may not actually exist or be \
                 controlled. This can lead to CORS exploitation if the attacker is able to \
                 register such subdomains or use DNS rebinding techniques."
            }
            Vulnerability::ParserConfusion => {
                "The server reflected a crafted origin that looks similar to the real domain. \
                 This suggests the origin whitelist uses loose string matching, which may allow \
                 bypass via parser tricks (suffix, encoded dot, concatenation)."
            }
            Vulnerability::WildcardWithCredentials => {
                "The server responds with Access-Control-Allow-Origin: * and \
                 Access-Control-Allow-Credentials: true. This combination is forbidden by the \
                 CORS specification and may expose protected resources if a client enforces it \
                 improperly."
            }
            Vulnerability::ReflectedOriginWithCredentials => {
                "The server reflects the Origin value in the ACAO header while allowing \
                 credentials. Arbitrary origins can read authenticated responses, enabling \
                 cross-origin theft of sensitive data."
            }
            Vulnerability::NullOriginWhitelist => {
                "The server responds with ACAO: null, indicating it accepts the null origin. \
                 Null origins are produced by sandboxed iframes and file-based documents, and are \
                 especially dangerous combined with credentialed requests."
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Vulnerability::WildcardWithCredentials
            | Vulnerability::ReflectedOriginWithCredentials => Severity::Critical,
            Vulnerability::BlindSubdomainTrust | Vulnerability::ParserConfusion => Severity::High,
            Vulnerability::NullOriginWhitelist => Severity::Medium,
        }
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Response headers with case-insensitive lookup.
///
/// Names are folded to ASCII lowercase on insertion. Repeated headers are
/// joined with `", "` into one value, so a response carrying two ACAO
/// headers never compares equal to a single origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct ResponseHeaders {
    inner: BTreeMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, appending to any value already stored under the same name
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let value = value.into();
        self.inner
            .entry(name.as_ref().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }

    /// Looks up a header by name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Looks up a header, treating absence as the empty string
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl From<BTreeMap<String, String>> for ResponseHeaders {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ResponseHeaders> for BTreeMap<String, String> {
    fn from(headers: ResponseHeaders) -> Self {
        headers.inner
    }
}

/// One trial: the origin that was sent and what the server answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Value sent in the `Origin` request header
    pub origin: String,
    /// HTTP status code (0 when the request failed)
    pub status: u16,
    /// Response headers
    pub headers: ResponseHeaders,
    /// Response body
    pub body: String,
}

impl ProbeResult {
    pub fn new(origin: impl Into<String>, status: u16, headers: ResponseHeaders) -> Self {
        Self {
            origin: origin.into(),
            status,
            headers,
            body: String::new(),
        }
    }

    /// Result recorded when the request could not be completed
    pub fn failed(origin: impl Into<String>) -> Self {
        Self::new(origin, 0, ResponseHeaders::new())
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// `Access-Control-Allow-Origin` value, empty when absent
    pub fn acao(&self) -> &str {
        self.headers.get_or_empty(ACAO)
    }

    /// `Access-Control-Allow-Credentials` value, empty when absent
    pub fn acac(&self) -> &str {
        self.headers.get_or_empty(ACAC)
    }

    /// Whether ACAC is the literal `true`, ignoring case
    pub fn allows_credentials(&self) -> bool {
        self.acac().eq_ignore_ascii_case("true")
    }

    /// Whether ACAO echoes back exactly the origin that was sent
    pub fn reflects_origin(&self) -> bool {
        self.acao() == self.origin
    }
}

/// Header values observed for the triggering probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub origin: String,
    pub acao: String,
    pub acac: String,
}

impl Evidence {
    pub fn from_probe(probe: &ProbeResult) -> Self {
        Self {
            origin: probe.origin.clone(),
            acao: probe.acao().to_string(),
            acac: probe.acac().to_string(),
        }
    }
}

/// A CORS misconfiguration tied to the probe that revealed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Category label
    pub vuln: Vulnerability,
    /// Human-readable explanation
    pub info: String,
    pub evidence: Evidence,
    /// Endpoint path the probe was sent to
    pub endpoint: String,
    pub severity: Severity,
    /// Status code of the triggering response
    pub status: u16,
}

impl Finding {
    pub fn new(vuln: Vulnerability, probe: &ProbeResult, endpoint: impl Into<String>) -> Self {
        Self {
            vuln,
            info: vuln.info().to_string(),
            evidence: Evidence::from_probe(probe),
            endpoint: endpoint.into(),
            severity: vuln.severity(),
            status: probe.status,
        }
    }
}

/// Result of a complete scan across all endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Target base URL (scheme + host)
    pub target: String,
    /// Unique scan identifier
    pub scan_id: String,
    /// Scan start time (local timezone)
    pub started_at: DateTime<Local>,
    /// Scan end time (local timezone)
    pub finished_at: Option<DateTime<Local>>,
    /// Endpoints that were probed
    pub endpoints: Vec<String>,
    /// All findings, grouped by endpoint in analyzer order
    pub findings: Vec<Finding>,
    /// Total HTTP requests made
    pub total_requests: u64,
}

impl ScanResult {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            scan_id: uuid::Uuid::new_v4().to_string(),
            started_at: Local::now(),
            finished_at: None,
            endpoints: Vec::new(),
            findings: Vec::new(),
            total_requests: 0,
        }
    }

    /// Returns count of findings of the given category
    pub fn count_by_vulnerability(&self, vuln: Vulnerability) -> usize {
        self.findings.iter().filter(|f| f.vuln == vuln).count()
    }

    /// Returns count of findings by severity
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Marks the scan as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }
}

/// Configuration for a scan session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Target URL; only scheme and authority are used
    pub target: String,
    /// Single endpoint to probe (takes precedence over `endpoint_list`)
    pub endpoint: Option<String>,
    /// File with one endpoint per line
    pub endpoint_list: Option<PathBuf>,
    /// Attacker origin sent verbatim as the reflection probe
    pub reflected_origin: String,
    /// Include local-file, extension, loopback and trailing-dot origins
    pub extended: bool,
    /// HTTP method for probes
    pub method: String,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,
    /// Verify TLS certificates
    pub verify_tls: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Maximum in-flight probes per endpoint
    pub concurrency: usize,
    /// Check that the target answers before probing
    #[serde(default = "default_check_reachability")]
    pub check_reachability: bool,
}

fn default_check_reachability() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            endpoint: None,
            endpoint_list: None,
            reflected_origin: "https://attacker.com".to_string(),
            extended: false,
            method: "GET".to_string(),
            headers: HashMap::new(),
            proxy: None,
            verify_tls: true,
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_5) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/59.0.3071.115 Safari/537.36"
                .to_string(),
            concurrency: 10,
            check_reachability: true,
        }
    }
}
