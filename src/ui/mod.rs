//! Terminal dashboard for codeatlas
//!
//! [`App`] is plain state. Rendering reads it, the input handlers in
//! `crate::app` mutate it, and nothing else touches it.

pub mod graph;
pub mod helpers;
pub mod markdown;
mod render;
pub mod theme;

pub use graph::Viewport;
pub use render::{breadcrumb_hits, render, BreadcrumbHit, ScreenLayout};

use crate::analysis::{summary, AnalysisReport, SummaryTab};
use crate::explorer::Explorer;
use crate::github::RepoIdentity;
use ratatui::layout::Rect;
use std::time::Instant;

/// Toast notification kind - affects duration and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 3,
            ToastKind::Success => 3,
            ToastKind::Error => 10, // Errors stay longer
        }
    }
}

/// Toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str) -> Self {
        // Success markers win over error keywords ("+ Loaded error.rs")
        let kind = if message.starts_with('+') {
            ToastKind::Success
        } else if message.contains("failed")
            || message.contains("error")
            || message.contains("Error")
        {
            ToastKind::Error
        } else {
            ToastKind::Info
        };
        Self::with_kind(message, kind)
    }

    pub fn with_kind(message: &str, kind: ToastKind) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help {
        scroll: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Analyzing,
}

/// Where the file tree on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataOrigin {
    #[default]
    Sample,
    Service,
    GitHub,
    Local,
    FileList,
    SavedReport,
}

impl DataOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            DataOrigin::Sample => "sample project",
            DataOrigin::Service => "analysis service",
            DataOrigin::GitHub => "GitHub",
            DataOrigin::Local => "local checkout",
            DataOrigin::FileList => "file list",
            DataOrigin::SavedReport => "saved report",
        }
    }
}

pub struct App {
    pub explorer: Explorer,
    pub repo: Option<RepoIdentity>,
    pub report: Option<AnalysisReport>,
    pub origin: DataOrigin,
    /// Summary tabs converted to display Markdown, in `SummaryTab::ALL` order
    pub summaries: Vec<Vec<String>>,
    pub summary_tab: SummaryTab,
    pub summary_scroll: usize,
    pub overlay: Overlay,
    pub toast: Option<Toast>,
    pub loading: LoadingState,
    pub loading_frame: usize,
    pub last_error: Option<String>,
    /// `r` has something to re-run
    pub can_rerun: bool,
    pub should_quit: bool,
    screen: Rect,
    viewport: Viewport,
}

impl App {
    pub fn new(explorer: Explorer) -> Self {
        Self {
            explorer,
            repo: None,
            report: None,
            origin: DataOrigin::Sample,
            summaries: vec![Vec::new(); SummaryTab::ALL.len()],
            summary_tab: SummaryTab::default(),
            summary_scroll: 0,
            overlay: Overlay::None,
            toast: None,
            loading: LoadingState::Idle,
            loading_frame: 0,
            last_error: None,
            can_rerun: false,
            should_quit: false,
            screen: Rect::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn with_repo(mut self, repo: Option<RepoIdentity>) -> Self {
        self.repo = repo;
        self
    }

    /// Show a finished analysis. The explorer goes back to the root.
    pub fn apply_report(&mut self, report: AnalysisReport, origin: DataOrigin) {
        let source = report.node_source();
        self.origin = if source.is_sample() {
            DataOrigin::Sample
        } else {
            origin
        };
        self.summaries = SummaryTab::ALL
            .iter()
            .map(|tab| summary::to_plain_lines(tab.html(&report)))
            .collect();
        self.explorer.load(source);
        self.report = Some(report);
        self.summary_scroll = 0;
        self.loading = LoadingState::Idle;
        self.last_error = None;
    }

    /// A failed analysis leaves whatever is on screen in place.
    pub fn analysis_failed(&mut self, message: &str) {
        self.loading = LoadingState::Idle;
        self.last_error = Some(message.to_string());
        self.show_toast(&format!("Analysis failed: {}", message));
    }

    pub fn start_loading(&mut self) {
        self.loading = LoadingState::Analyzing;
        self.loading_frame = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.loading == LoadingState::Analyzing
    }

    pub fn spinner(&self) -> char {
        theme::Theme::SPINNER_BRAILLE[self.loading_frame % theme::Theme::SPINNER_BRAILLE.len()]
    }

    /// One UI frame: advance the spinner and the layout.
    pub fn tick(&mut self) {
        if self.is_loading() {
            self.loading_frame = self.loading_frame.wrapping_add(1);
        }
        self.explorer.tick();
    }

    /// Record the terminal size and fit the layout world to the graph panel.
    pub fn set_screen(&mut self, area: Rect) {
        self.screen = area;
        let viewport = Viewport::new(ScreenLayout::new(area).graph_inner());
        if viewport != self.viewport {
            let (width, height) = viewport.world_size();
            if width > 0.0 && height > 0.0 {
                self.explorer.resize(width, height);
            }
            self.viewport = viewport;
        }
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn summary_lines(&self) -> &[String] {
        self.summaries
            .get(self.summary_tab.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn select_tab(&mut self, tab: SummaryTab) {
        if self.summary_tab != tab {
            self.summary_tab = tab;
            self.summary_scroll = 0;
        }
    }

    pub fn scroll_summary(&mut self, delta: isize) {
        let max = self.summary_lines().len().saturating_sub(1);
        self.summary_scroll = self.summary_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Help { .. } => Overlay::None,
            Overlay::None => Overlay::Help { scroll: 0 },
        };
    }

    /// Clear expired toast
    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn show_toast(&mut self, message: &str) {
        self.toast = Some(Toast::new(message));
    }

    pub fn show_info(&mut self, message: &str) {
        self.toast = Some(Toast::with_kind(message, ToastKind::Info));
    }
}
