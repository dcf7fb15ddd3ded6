use crate::analysis::AnalysisReport;
use crate::ui::DataOrigin;

/// Messages from background tasks to the main UI thread
#[derive(Debug)]
pub enum BackgroundMessage {
    AnalysisReady {
        report: AnalysisReport,
        origin: DataOrigin,
    },
    AnalysisError(String),
    /// A background task panicked
    Error(String),
}
