//! Input handling for the codeatlas TUI

use crate::app::RuntimeContext;
use crate::ui::{App, Overlay};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

mod mouse;
mod normal;
mod overlay;

pub use mouse::handle_mouse_event;

use normal::handle_normal_mode;
use overlay::handle_overlay_input;

/// Main key event handler - dispatches to the overlay or the dashboard
pub fn handle_key_event(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    if app.overlay != Overlay::None {
        return handle_overlay_input(app, key);
    }

    handle_normal_mode(app, key, ctx)
}
