use crate::ui::{App, Overlay};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle key events when an overlay is active
pub(super) fn handle_overlay_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let Overlay::Help { scroll } = &mut app.overlay else {
        return Ok(());
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.overlay = Overlay::None,
        KeyCode::Down | KeyCode::Char('j') => *scroll += 1,
        KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::Explorer;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_scrolls_and_closes_without_quitting() {
        let mut app = App::new(Explorer::default());
        app.toggle_help();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        handle_overlay_input(&mut app, key(KeyCode::Down)).unwrap();
        handle_overlay_input(&mut app, key(KeyCode::Down)).unwrap();
        handle_overlay_input(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.overlay, Overlay::Help { scroll: 1 });

        handle_overlay_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert_eq!(app.overlay, Overlay::None);
        assert!(!app.should_quit);
    }
}
