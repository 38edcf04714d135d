//! Scan orchestration: origins in, findings out, one endpoint at a time

use crate::analyzer;
use crate::endpoints;
use crate::error::Result;
use crate::http::Requester;
use crate::models::{Finding, ProbeResult, ScanConfig, ScanResult};
use crate::origins;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Drives probes through a [`Requester`] and feeds the analyzer
pub struct ScanEngine {
    requester: Arc<dyn Requester>,
}

impl ScanEngine {
    pub fn new(requester: Arc<dyn Requester>) -> Self {
        Self { requester }
    }

    /// Sends every origin to `url` and returns once all responses are in.
    ///
    /// At most `concurrency` requests are in flight. Results are sorted by
    /// origin so reports do not depend on completion order.
    pub async fn probe_all(
        &self,
        url: &str,
        origins: &[String],
        concurrency: usize,
    ) -> Vec<ProbeResult> {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut set = JoinSet::new();

        for origin in origins {
            let requester = Arc::clone(&self.requester);
            let permits = Arc::clone(&permits);
            let url = url.to_string();
            let origin = origin.clone();

            set.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                requester.probe(&url, &origin).await
            });
        }

        let mut results = Vec::with_capacity(origins.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!("Probe task panicked: {e}"),
            }
        }

        results.sort_by(|a, b| a.origin.cmp(&b.origin));
        results
    }

    /// Generates origins for `base`, probes `endpoint` with them and analyzes the answers
    pub async fn scan_endpoint(
        &self,
        base: &str,
        endpoint: &str,
        config: &ScanConfig,
    ) -> Vec<Finding> {
        let origins = origins::generate(base, &config.reflected_origin, config.extended);
        let url = format!("{base}{endpoint}");
        info!("Probing {url} with {} origins", origins.len());

        let results = self.probe_all(&url, &origins, config.concurrency).await;
        let findings = analyzer::analyze(&results, endpoint);
        info!("Endpoint '{endpoint}' completed: {} findings", findings.len());
        findings
    }

    /// Runs a full scan as described by `config`
    pub async fn run(&self, config: &ScanConfig) -> Result<ScanResult> {
        let base = origins::target_base(&config.target)?;
        let mut result = ScanResult::new(&base);

        if config.check_reachability {
            self.requester.check_reachable(&base).await?;
        }

        let endpoints =
            endpoints::load_endpoints(config.endpoint.as_deref(), config.endpoint_list.as_deref())?;
        info!("Loaded {} endpoints for {base}", endpoints.len());

        let pb = ProgressBar::new(endpoints.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        for endpoint in &endpoints {
            pb.set_message(format!("Probing {endpoint}..."));
            let findings = self.scan_endpoint(&base, endpoint, config).await;
            result.findings.extend(findings);
            pb.inc(1);
        }
        pb.finish_with_message("Scan complete");

        result.endpoints = endpoints;
        result.total_requests = self.requester.request_count();
        result.finish();
        Ok(result)
    }
}
