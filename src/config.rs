//! Configuration management for corsprobe

use crate::error::{CorsProbeError, Result};
use crate::models::ScanConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File-based configuration structure matching default.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    scan: Option<ScanSection>,
    origins: Option<OriginsSection>,
    proxy: Option<ProxySection>,
}

#[derive(Debug, Deserialize)]
struct ScanSection {
    method: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    concurrency: Option<usize>,
    verify_tls: Option<bool>,
    check_reachability: Option<bool>,
    headers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OriginsSection {
    reflected: Option<String>,
    extended: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ProxySection {
    url: Option<String>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path).map_err(CorsProbeError::IoError)?;
    parse_config(&content)
}

/// Parses TOML configuration text on top of [`ScanConfig::default`]
pub fn parse_config(content: &str) -> Result<ScanConfig> {
    let file_config: FileConfig = toml::from_str(content)?;
    let mut config = ScanConfig::default();

    if let Some(scan) = file_config.scan {
        if let Some(method) = scan.method {
            config.method = method;
        }
        if let Some(timeout) = scan.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(ua) = scan.user_agent {
            config.user_agent = ua;
        }
        if let Some(concurrency) = scan.concurrency {
            if concurrency == 0 {
                return Err(CorsProbeError::ConfigError(
                    "scan.concurrency must be at least 1".to_string(),
                ));
            }
            config.concurrency = concurrency;
        }
        if let Some(verify) = scan.verify_tls {
            config.verify_tls = verify;
        }
        if let Some(check) = scan.check_reachability {
            config.check_reachability = check;
        }
        if let Some(headers) = scan.headers {
            insert_headers(&mut config, headers);
        }
    }

    if let Some(origins) = file_config.origins {
        if let Some(reflected) = origins.reflected {
            config.reflected_origin = reflected;
        }
        if let Some(extended) = origins.extended {
            config.extended = extended;
        }
    }

    if let Some(proxy) = file_config.proxy {
        config.proxy = proxy.url;
    }

    Ok(config)
}

/// Command-line overrides; `None` keeps the configured value
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub target: String,
    pub endpoint: Option<String>,
    pub endpoint_list: Option<PathBuf>,
    pub reflected_origin: Option<String>,
    pub extended: bool,
    pub method: Option<String>,
    pub timeout: Option<u64>,
    pub concurrency: Option<usize>,
    pub proxy: Option<String>,
    pub insecure: bool,
    pub skip_reachability: bool,
    pub headers: Option<Vec<String>>,
}

/// Merges CLI arguments into an existing ScanConfig
pub fn merge_cli_args(config: &mut ScanConfig, cli: CliOverrides) {
    config.target = cli.target;

    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint;
    }
    if cli.endpoint_list.is_some() {
        config.endpoint_list = cli.endpoint_list;
    }
    if let Some(origin) = cli.reflected_origin {
        config.reflected_origin = origin;
    }
    if cli.extended {
        config.extended = true;
    }
    if let Some(m) = cli.method {
        config.method = m;
    }
    if let Some(t) = cli.timeout {
        config.timeout_secs = t;
    }
    if let Some(c) = cli.concurrency {
        config.concurrency = c.max(1);
    }
    if let Some(p) = cli.proxy {
        config.proxy = Some(p);
    }
    if cli.insecure {
        config.verify_tls = false;
    }
    if cli.skip_reachability {
        config.check_reachability = false;
    }
    if let Some(h) = cli.headers {
        insert_headers(config, h);
    }
}

/// Parses `Key: Value` strings; entries without a colon are ignored
fn insert_headers(config: &mut ScanConfig, headers: Vec<String>) {
    for header in headers {
        if let Some((key, value)) = header.split_once(':') {
            config
                .headers
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }
}
