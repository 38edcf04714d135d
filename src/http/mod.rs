//! HTTP transport for origin probes

pub mod client;
pub use client::HttpClient;

use crate::error::Result;
use crate::models::ProbeResult;
use async_trait::async_trait;

/// Sends one request carrying a crafted `Origin` and records the answer.
///
/// Implementations must not fail: transport errors are reported as a
/// [`ProbeResult::failed`] so the rest of the scan carries on.
#[async_trait]
pub trait Requester: Send + Sync {
    async fn probe(&self, url: &str, origin: &str) -> ProbeResult;

    /// Fails when the target should not be scanned at all
    async fn check_reachable(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    /// Total number of requests issued so far
    fn request_count(&self) -> u64 {
        0
    }
}
