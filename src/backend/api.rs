use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use super::model::RawGraph;

const SCAN_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Serialize)]
struct ScanRequest<'a> {
    repo_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// Blocking client for the repository analysis service. Scans are slow
/// (clone + static analysis), so callers run this off the UI thread.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(SCAN_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// Scan (or rescan) a repository. Both share one backend operation; a
    /// rescan is just a scan of an already-known URL.
    pub fn analyze_repository(&self, repo_url: &str, branch: Option<&str>) -> Result<RawGraph> {
        let url = format!("{}/api/librarian/scan", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&ScanRequest { repo_url, branch })
            .send()
            .with_context(|| format!("scan request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(anyhow!("backend scan failed ({status}): {detail}"));
        }

        response
            .json::<RawGraph>()
            .context("invalid scan response from backend")
    }
}
