//! GitHub repository identity and file listing
//!
//! Identity is parsed client-side from whatever URL the user pasted and is
//! only used for labels. The tree fetch is an alternative to the analysis
//! backend when all that is wanted is the file graph.

use crate::tree::FileIndex;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Token Management
// ============================================================================

/// Token from `GITHUB_TOKEN`, or None when unset or empty.
pub fn get_stored_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Maximum length for error body content in error messages
const MAX_ERROR_BODY_LEN: usize = 200;

/// Sanitize an API error body to prevent credential leakage.
/// Truncates long responses and redacts potential secrets.
pub(crate) fn sanitize_error_body(body: &str) -> String {
    const SECRET_PATTERNS: &[&str] = &[
        "token",
        "secret",
        "password",
        "credential",
        "bearer",
        "ghp_",        // GitHub personal access token prefix
        "gho_",        // GitHub OAuth token prefix
        "ghu_",        // GitHub user token prefix
        "github_pat_", // GitHub PAT prefix
    ];

    let truncated = if body.chars().count() > MAX_ERROR_BODY_LEN {
        let head: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        format!("{}... (truncated)", head)
    } else {
        body.to_string()
    };

    let lower = truncated.to_lowercase();
    if SECRET_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return "(error details redacted - may contain sensitive data)".to_string();
    }

    truncated
}

// ============================================================================
// Repository Identity
// ============================================================================

pub const INVALID_URL_MESSAGE: &str =
    "Invalid GitHub URL. Please use the format: https://github.com/owner/repo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
    /// `owner/name`
    pub full_name: String,
}

impl RepoIdentity {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
        }
    }

    /// Extract `owner/name` from a GitHub URL.
    ///
    /// Supports:
    /// - https://github.com/owner/repo (with or without `.git`, extra segments ignored)
    /// - github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');

        // SSH format: git@github.com:owner/repo.git
        if let Some(rest) = url.strip_prefix("git@github.com:") {
            return Self::from_path(rest);
        }

        if url.contains("://") {
            let parsed = url::Url::parse(url).ok()?;
            let host = parsed.host_str()?;
            if host != "github.com" && host != "www.github.com" {
                return None;
            }
            return Self::from_path(parsed.path());
        }

        // No scheme: github.com/owner/repo
        let rest = url
            .strip_prefix("www.github.com/")
            .or_else(|| url.strip_prefix("github.com/"))?;
        Self::from_path(rest)
    }

    fn from_path(path: &str) -> Option<Self> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let name = segments.next()?.trim_end_matches(".git");
        if name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}", self.full_name)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

// ============================================================================
// GitHub API Operations
// ============================================================================

const GITHUB_API_URL: &str = "https://api.github.com";
const API_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    message: String,
}

/// Blob paths from a recursive git tree listing.
fn parse_tree_response(body: &str) -> Result<FileIndex> {
    let response: TreeResponse =
        serde_json::from_str(body).context("Failed to parse git tree response")?;
    if response.truncated {
        tracing::warn!(
            entries = response.tree.len(),
            "GitHub truncated the tree listing; some files are missing"
        );
    }
    Ok(FileIndex::from_entries(
        response
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path),
    ))
}

fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(body) {
        return anyhow::anyhow!("GitHub API error ({}): {}", status, api_error.message);
    }
    anyhow::anyhow!(
        "GitHub API error ({}): {}",
        status,
        sanitize_error_body(body)
    )
}

async fn get_text(client: &reqwest::Client, url: &str, token: Option<&str>) -> Result<String> {
    let mut request = client
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", "codeatlas")
        .header("X-GitHub-Api-Version", "2022-11-28");
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let resp = request
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(api_error(status, &body))
    }
}

/// List every file on the repository's default branch.
pub async fn fetch_file_index(identity: &RepoIdentity, token: Option<&str>) -> Result<FileIndex> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(API_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;

    let repo_url = format!(
        "{}/repos/{}/{}",
        GITHUB_API_URL, identity.owner, identity.name
    );
    let body = get_text(&client, &repo_url, token)
        .await
        .with_context(|| format!("Could not look up {}", identity))?;
    let repo: RepoResponse =
        serde_json::from_str(&body).context("Failed to parse repository response")?;

    let tree_url = format!(
        "{}/git/trees/{}?recursive=1",
        repo_url, repo.default_branch
    );
    let body = get_text(&client, &tree_url, token)
        .await
        .with_context(|| format!("Could not fetch file structure for {}", identity))?;
    let index = parse_tree_response(&body)?;

    tracing::info!(
        repo = %identity,
        branch = %repo.default_branch,
        files = index.len(),
        "fetched file tree from GitHub"
    );
    Ok(index)
}

// ============================================================================
// Tests
// ============================================================================
