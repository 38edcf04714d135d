//! corsprobe - CORS misconfiguration prober
//!
//! Sends requests carrying crafted `Origin` headers to each endpoint of a
//! target and classifies the `Access-Control-Allow-*` answers into findings
//! such as reflected origins with credentials, null-origin trust and
//! wildcard-with-credentials responses.

pub mod analyzer;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod origins;
pub mod poc;
pub mod report;
pub mod scanner;
pub mod validation;
