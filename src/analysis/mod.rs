//! Repository analysis results
//!
//! The analysis backend is an opaque HTTP service. It returns three HTML
//! summaries plus the repository file list; only the file list feeds the
//! graph, the summaries are shown alongside it.

pub mod client;
pub mod summary;

pub use client::AnalysisClient;

use crate::tree::NodeSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub readme_summary: String,
    #[serde(default)]
    pub structure_analysis: String,
    #[serde(default)]
    pub setup_guide: String,
    /// Newline-delimited repository paths. Absent means "use the sample tree".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_structure: Option<String>,
}

impl AnalysisReport {
    /// Report carrying only a file list (local checkout, GitHub tree).
    pub fn from_file_structure(file_structure: String) -> Self {
        Self {
            file_structure: Some(file_structure),
            ..Self::default()
        }
    }

    pub fn node_source(&self) -> NodeSource {
        NodeSource::from_file_structure(self.file_structure.as_deref())
    }

    pub fn has_summaries(&self) -> bool {
        !(self.readme_summary.trim().is_empty()
            && self.structure_analysis.trim().is_empty()
            && self.setup_guide.trim().is_empty())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}

/// The three summary panes, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryTab {
    #[default]
    Readme,
    Structure,
    Setup,
}

impl SummaryTab {
    pub const ALL: [SummaryTab; 3] = [SummaryTab::Readme, SummaryTab::Structure, SummaryTab::Setup];

    pub fn title(&self) -> &'static str {
        match self {
            SummaryTab::Readme => "README",
            SummaryTab::Structure => "Structure",
            SummaryTab::Setup => "Setup",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SummaryTab::Readme => 0,
            SummaryTab::Structure => 1,
            SummaryTab::Setup => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn html<'a>(&self, report: &'a AnalysisReport) -> &'a str {
        match self {
            SummaryTab::Readme => &report.readme_summary,
            SummaryTab::Structure => &report.structure_analysis,
            SummaryTab::Setup => &report.setup_guide,
        }
    }
}
