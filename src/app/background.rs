//! Background task handling for codeatlas
//!
//! Channel sends use `let _ =`: a failed send means the UI has already shut
//! down and nobody is listening for the result.

use crate::analysis::{AnalysisClient, AnalysisReport};
use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::github::{fetch_file_index, RepoIdentity};
use crate::tree::FileIndex;
use crate::ui::{App, DataOrigin};
use anyhow::{Context, Result};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::mpsc;

/// One way of getting a repository's analysis.
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    /// `POST /api/analyze` on the analysis service
    Service {
        client: AnalysisClient,
        repo_url: String,
    },
    /// File list straight from the GitHub API; no summaries
    GitHub {
        identity: RepoIdentity,
        token: Option<String>,
    },
    /// Walk a checkout on disk; no summaries
    Local(PathBuf),
}

impl AnalysisRequest {
    pub fn origin(&self) -> DataOrigin {
        match self {
            AnalysisRequest::Service { .. } => DataOrigin::Service,
            AnalysisRequest::GitHub { .. } => DataOrigin::GitHub,
            AnalysisRequest::Local(_) => DataOrigin::Local,
        }
    }

    pub async fn run(self) -> Result<AnalysisReport> {
        match self {
            AnalysisRequest::Service { client, repo_url } => client.analyze(&repo_url).await,
            AnalysisRequest::GitHub { identity, token } => {
                let index = fetch_file_index(&identity, token.as_deref()).await?;
                Ok(AnalysisReport::from_file_structure(index.to_text()))
            }
            AnalysisRequest::Local(dir) => {
                let index = tokio::task::spawn_blocking(move || FileIndex::from_directory(&dir))
                    .await
                    .context("Directory scan did not finish")??;
                Ok(AnalysisReport::from_file_structure(index.to_text()))
            }
        }
    }
}

/// Start (or restart) the configured analysis in the background.
pub fn spawn_analysis(app: &mut App, ctx: &RuntimeContext) {
    let Some(request) = ctx.request.clone() else {
        app.show_info("Nothing to re-run: the data was loaded from a file");
        return;
    };
    if app.is_loading() {
        app.show_info("Analysis already running");
        return;
    }

    app.start_loading();
    let origin = request.origin();
    let tx = ctx.tx.clone();
    tracing::info!(origin = origin.label(), "starting analysis");
    spawn_background(ctx.tx.clone(), "analysis", async move {
        let message = match request.run().await {
            Ok(report) => BackgroundMessage::AnalysisReady { report, origin },
            Err(e) => BackgroundMessage::AnalysisError(format!("{:#}", e)),
        };
        let _ = tx.send(message);
    });
}

pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<BackgroundMessage>, ctx: &RuntimeContext) {
    while let Ok(msg) = rx.try_recv() {
        handle_message(app, msg, ctx);
    }
}

fn handle_message(app: &mut App, msg: BackgroundMessage, ctx: &RuntimeContext) {
    match msg {
        BackgroundMessage::AnalysisReady { report, origin } => {
            if let Some(path) = &ctx.save_report {
                match report.save(path) {
                    Ok(()) => tracing::info!(path = %path.display(), "report saved"),
                    Err(e) => {
                        tracing::error!(error = %format!("{:#}", e), "saving report failed");
                        app.show_toast(&format!("Saving report failed: {}", e));
                    }
                }
            }
            app.apply_report(report, origin);
            let files = app.explorer.source().file_count();
            tracing::info!(files, origin = app.origin.label(), "analysis loaded");
            if app.explorer.source().is_sample() {
                app.show_info("The analysis had no file list; showing sample data");
            } else {
                app.show_toast(&format!("+ Loaded {} files", files));
            }
        }
        BackgroundMessage::AnalysisError(e) => {
            tracing::warn!(error = %e, "analysis failed");
            app.analysis_failed(&e);
        }
        BackgroundMessage::Error(e) => {
            tracing::error!(error = %e, "background task failed");
            app.analysis_failed(&e);
        }
    }
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            let _ = tx.send(BackgroundMessage::Error(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name, detail
            )));
        }
    });
}
