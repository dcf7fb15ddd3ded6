//! Placeholder structure for the graph view
//!
//! Shown before an analysis arrives, or when the analysis carried no file
//! list. It is presentation data, not a model of any real repository.

use super::index::Level;
use super::path::TreePath;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const BUILTIN_SAMPLE: &str = include_str!("sample.toml");

/// Level key used for the empty path.
pub const ROOT_KEY: &str = "root";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleTree {
    #[serde(default)]
    levels: HashMap<String, Level>,
}

impl SampleTree {
    pub fn builtin() -> &'static SampleTree {
        static SAMPLE: OnceLock<SampleTree> = OnceLock::new();
        SAMPLE.get_or_init(|| match Self::parse(BUILTIN_SAMPLE) {
            Ok(sample) => sample,
            Err(err) => {
                tracing::error!(error = %err, "embedded sample tree is invalid");
                SampleTree::default()
            }
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse sample tree")
    }

    /// Contents for `path`, keyed by its last segment.
    ///
    /// Unknown keys produce an empty level, so a sample directory without its
    /// own table still renders (with only the back node).
    pub fn level(&self, path: &TreePath) -> Level {
        let key = path.last().unwrap_or(ROOT_KEY);
        self.levels.get(key).cloned().unwrap_or_default()
    }
}
