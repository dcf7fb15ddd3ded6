use super::AnalysisReport;
use crate::github::sanitize_error_body;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default analysis backend
pub const DEFAULT_API_URL: &str = "https://codeatlas1.onrender.com";

/// Cookie name the backend's login sets
const SESSION_COOKIE_NAME: &str = "session";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    repo_url: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Thin client for `POST /api/analyze`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    api_url: String,
    session: Option<String>,
    timeout: Duration,
}

impl AnalysisClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session: None,
            timeout: Duration::from_secs(120),
        }
    }

    /// Attach the login session. Accepts either `name=value` or a bare value.
    pub fn with_session(mut self, session: Option<String>) -> Self {
        self.session = session.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/analyze", self.api_url)
    }

    fn cookie_header(&self) -> Option<String> {
        let session = self.session.as_deref()?.trim();
        if session.contains('=') {
            Some(session.to_string())
        } else {
            Some(format!("{}={}", SESSION_COOKIE_NAME, session))
        }
    }

    pub async fn analyze(&self, repo_url: &str) -> Result<AnalysisReport> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let mut request = client
            .post(self.endpoint())
            .header("User-Agent", "codeatlas")
            .json(&AnalyzeRequest { repo_url });
        if let Some(cookie) = self.cookie_header() {
            request = request.header("Cookie", cookie);
        }

        tracing::info!(endpoint = %self.endpoint(), repo_url, "requesting analysis");
        let resp = request
            .send()
            .await
            .with_context(|| format!("Failed to reach analysis service at {}", self.api_url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .context("Failed to read analysis response")?;
        parse_analyze_response(status, &body)
    }
}

/// Map an `/api/analyze` response to a report or an error message.
///
/// Non-2xx uses the body's `error` field when there is one. A 2xx body can
/// also carry `error`, which is treated as a failure.
pub fn parse_analyze_response(status: u16, body: &str) -> Result<AnalysisReport> {
    let error_field = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty());

    if !(200..300).contains(&status) {
        if let Some(error) = error_field {
            anyhow::bail!(error);
        }
        tracing::debug!(status, body = %sanitize_error_body(body), "analysis request failed");
        anyhow::bail!("Request failed with status {}", status);
    }
    if let Some(error) = error_field {
        anyhow::bail!(error);
    }

    serde_json::from_str(body).context("Analysis service returned an unexpected response")
}
