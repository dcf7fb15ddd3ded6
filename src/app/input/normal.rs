use crate::analysis::SummaryTab;
use crate::app::{background, RuntimeContext};
use crate::explorer::ClickOutcome;
use crate::ui::App;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

const PAGE: isize = 10;

/// Handle key events on the dashboard
pub(super) fn handle_normal_mode(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => {
            app.explorer.focus_next();
        }
        KeyCode::BackTab => {
            app.explorer.focus_prev();
        }
        KeyCode::Enter => {
            let outcome = app.explorer.activate_focused();
            report_outcome(app, &outcome);
        }
        KeyCode::Backspace | KeyCode::Left => {
            if !app.explorer.navigate_back() {
                app.show_info("Already at the root");
            }
        }
        KeyCode::Char('i') => match app.explorer.focused().map(|n| n.id.clone()) {
            Some(id) => {
                if !app.explorer.select(&id) {
                    app.show_info("The back node has no details");
                }
            }
            None => app.show_info("Press Tab to focus a node first"),
        },
        KeyCode::Char('x') => {
            app.explorer.close_detail();
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(tab) = SummaryTab::from_index(c as usize - '1' as usize) {
                app.select_tab(tab);
            }
        }
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('r') => background::spawn_analysis(app, ctx),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_summary(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_summary(-1),
        KeyCode::PageDown => app.scroll_summary(PAGE),
        KeyCode::PageUp => app.scroll_summary(-PAGE),
        _ => {}
    }
    Ok(())
}

/// Log what a click did. Navigation and the detail panel are their own feedback.
pub(super) fn report_outcome(app: &mut App, outcome: &ClickOutcome) {
    match outcome {
        ClickOutcome::Entered(name) => {
            tracing::debug!(name = %name, path = %app.explorer.path(), "entered directory")
        }
        ClickOutcome::WentBack => tracing::debug!(path = %app.explorer.path(), "went back"),
        ClickOutcome::Opened(id) => tracing::debug!(id = %id, "opened details"),
        ClickOutcome::Ignored => {}
    }
}
