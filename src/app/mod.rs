//! Event loop side of the dashboard: keyboard and mouse input, the
//! background analysis task and the channel that brings its result back.

pub mod background;
pub mod input;
pub mod messages;
pub mod runtime;

pub use background::AnalysisRequest;
pub use messages::BackgroundMessage;
pub use runtime::run_tui;

use std::path::PathBuf;
use std::sync::mpsc;

/// Everything input handlers need besides the [`crate::ui::App`] itself.
pub struct RuntimeContext {
    pub tx: mpsc::Sender<BackgroundMessage>,
    /// What `r` re-runs; `None` when the data came from a file
    pub request: Option<AnalysisRequest>,
    /// Write each finished analysis here
    pub save_report: Option<PathBuf>,
}
