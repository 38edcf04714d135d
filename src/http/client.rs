//! reqwest-backed requester with request tracking

use crate::error::{CorsProbeError, Result};
use crate::http::Requester;
use crate::models::{ProbeResult, ResponseHeaders, ScanConfig};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const REACHABILITY_TIMEOUT_SECS: u64 = 5;

/// HTTP client that sends CORS probes
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    reach_client: Client,
    method: Method,
    extra_headers: Vec<(String, String)>,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let method = Method::from_bytes(config.method.to_uppercase().as_bytes())
            .map_err(|_| {
                CorsProbeError::ConfigError(format!("Invalid HTTP method: {}", config.method))
            })?;

        // Probes must see the response to the crafted origin, not a redirect target
        let client = Self::base_builder(config)?
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let reach_client = Self::base_builder(config)?
            .timeout(Duration::from_secs(REACHABILITY_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let mut extra_headers: Vec<(String, String)> = config
            .headers
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case("origin"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        extra_headers.sort();

        Ok(Self {
            client,
            reach_client,
            method,
            extra_headers,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    fn base_builder(config: &ScanConfig) -> Result<ClientBuilder> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| CorsProbeError::ConfigError(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }

    /// Checks that the target answers with a 2xx or 3xx status, returning it
    pub async fn reachability(&self, url: &str) -> Result<u16> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let response = self
            .reach_client
            .get(url)
            .send()
            .await
            .map_err(|e| CorsProbeError::TargetUnreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            info!("Target URL is reachable: {url} ({status})");
            Ok(status.as_u16())
        } else {
            Err(CorsProbeError::TargetUnreachable(format!(
                "{url} responded with status code {status}"
            )))
        }
    }

    async fn send(&self, url: &str, origin: &str) -> Result<ProbeResult> {
        let mut req = self
            .client
            .request(self.method.clone(), url)
            .header("Origin", origin);
        for (key, value) in &self.extra_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.unwrap_or_default();

        Ok(ProbeResult::new(origin, status, headers).with_body(body))
    }
}

#[async_trait]
impl Requester for HttpClient {
    async fn probe(&self, url: &str, origin: &str) -> ProbeResult {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        match self.send(url, origin).await {
            Ok(result) => {
                debug!(
                    "Origin '{origin}' -> {} (ACAO: '{}', ACAC: '{}')",
                    result.status,
                    result.acao(),
                    result.acac()
                );
                result
            }
            Err(e) => {
                warn!("Request to {url} with origin {origin} failed: {e}");
                ProbeResult::failed(origin)
            }
        }
    }

    async fn check_reachable(&self, url: &str) -> Result<()> {
        self.reachability(url).await.map(|_| ())
    }

    fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
