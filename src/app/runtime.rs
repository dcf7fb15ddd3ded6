//! TUI runtime for codeatlas
//!
//! One synchronous loop owns the [`App`]: drain background results, advance
//! the layout, draw, then handle whatever input arrived during the frame.

use crate::app::messages::BackgroundMessage;
use crate::app::{background, input, AnalysisRequest, RuntimeContext};
use crate::ui;
use crate::ui::App;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

/// ~30 frames a second keeps the layout animation smooth
const FRAME: Duration = Duration::from_millis(33);

/// Run the dashboard until the user quits. `request`, when given, is started
/// right away and is what `r` re-runs.
pub async fn run_tui(
    mut app: App,
    request: Option<AnalysisRequest>,
    save_report: Option<PathBuf>,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let ctx = RuntimeContext {
        tx,
        request,
        save_report,
    };
    app.can_rerun = ctx.request.is_some();
    if ctx.request.is_some() {
        background::spawn_analysis(&mut app, &ctx);
    }

    let result = run_loop(&mut terminal, &mut app, &rx, &ctx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "dashboard exited with an error");
    }
    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mpsc::Receiver<BackgroundMessage>,
    ctx: &RuntimeContext,
) -> Result<()> {
    loop {
        app.clear_expired_toast();

        // Check for background messages (non-blocking)
        background::drain_messages(app, rx, ctx);

        let size = terminal.size()?;
        app.set_screen(Rect::new(0, 0, size.width, size.height));
        app.tick();

        terminal.draw(|f| ui::render(f, app))?;

        // Handle everything that queued up during the frame, so drags keep up
        if event::poll(FRAME)? {
            loop {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        input::handle_key_event(app, key, ctx)?
                    }
                    Event::Mouse(mouse) => input::handle_mouse_event(app, mouse),
                    _ => {}
                }
                if app.should_quit || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
