use super::normal::report_outcome;
use crate::ui::{breadcrumb_hits, App, Overlay, ScreenLayout};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

const WHEEL_STEP: isize = 3;

/// Pointer gestures: hover, drag (press + move + release), click (press +
/// release without movement), breadcrumb jumps and summary scrolling.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    let layout = ScreenLayout::new(app.screen());

    match mouse.kind {
        MouseEventKind::Moved => match app.viewport().to_world(column, row) {
            Some((x, y)) => app.explorer.hover_at(x, y),
            None if !app.explorer.is_dragging() => app.explorer.hover(None),
            None => {}
        },
        MouseEventKind::Down(MouseButton::Left) => {
            if app.overlay != Overlay::None {
                app.overlay = Overlay::None;
                return;
            }
            if let Some((x, y)) = app.viewport().to_world(column, row) {
                if let Some(id) = app.explorer.begin_drag(x, y) {
                    tracing::trace!(id = %id, "drag started");
                }
            } else if layout.breadcrumbs.height > 0 && row == layout.breadcrumbs.y {
                let target = breadcrumb_hits(layout.breadcrumbs, app.explorer.navigator())
                    .into_iter()
                    .find(|hit| hit.contains(column))
                    .map(|hit| hit.path);
                if let Some(path) = target {
                    app.explorer.navigate_to(&path);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.explorer.is_dragging() {
                let (x, y) = app.viewport().clamped_world(column, row);
                app.explorer.drag_to(x, y);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(outcome) = app.explorer.end_drag() {
                report_outcome(app, &outcome);
            }
        }
        MouseEventKind::ScrollDown if contains(layout.side, column, row) => {
            app.scroll_summary(WHEEL_STEP)
        }
        MouseEventKind::ScrollUp if contains(layout.side, column, row) => {
            app.scroll_summary(-WHEEL_STEP)
        }
        _ => {}
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::Explorer;
    use crate::tree::TreePath;
    use crate::ui::graph::{WORLD_PER_COL, WORLD_PER_ROW};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut app = App::new(Explorer::default());
        app.set_screen(Rect::new(0, 0, 120, 40));
        app.explorer.settle(300);
        app
    }

    fn event(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Terminal cell over a node's center.
    fn cell_of(app: &App, id: &str) -> (u16, u16) {
        let (x, y) = app.explorer.simulation().position(id).unwrap();
        let area = app.viewport().area();
        (
            area.x + (x / WORLD_PER_COL) as u16,
            area.y + (y / WORLD_PER_ROW) as u16,
        )
    }

    #[test]
    fn test_click_on_directory_drills_down() {
        let mut app = app();
        let (col, row) = cell_of(&app, "src");
        handle_mouse_event(&mut app, event(MouseEventKind::Down(MouseButton::Left), col, row));
        assert!(app.explorer.is_dragging());
        handle_mouse_event(&mut app, event(MouseEventKind::Up(MouseButton::Left), col, row));
        assert_eq!(app.explorer.path(), &TreePath::parse("src"));
    }

    #[test]
    fn test_drag_moves_node_without_clicking() {
        let mut app = app();
        let (col, row) = cell_of(&app, "src");
        handle_mouse_event(&mut app, event(MouseEventKind::Down(MouseButton::Left), col, row));
        handle_mouse_event(&mut app, event(MouseEventKind::Drag(MouseButton::Left), col + 5, row + 2));
        assert!(app.explorer.simulation().body("src").unwrap().is_pinned());
        handle_mouse_event(&mut app, event(MouseEventKind::Up(MouseButton::Left), col + 5, row + 2));
        assert!(app.explorer.path().is_root());
        assert!(!app.explorer.is_dragging());
        assert!(!app.explorer.simulation().body("src").unwrap().is_pinned());
    }

    #[test]
    fn test_hover_and_hover_exit() {
        let mut app = app();
        let (col, row) = cell_of(&app, "README.md");
        handle_mouse_event(&mut app, event(MouseEventKind::Moved, col, row));
        assert_eq!(app.explorer.hovered(), Some("README.md"));
        // Footer is outside the graph panel
        handle_mouse_event(&mut app, event(MouseEventKind::Moved, 0, 39));
        assert_eq!(app.explorer.hovered(), None);
    }

    #[test]
    fn test_breadcrumb_click_jumps() {
        let mut app = app();
        app.explorer.navigate_into("src");
        app.explorer.navigate_into("components");
        let layout = ScreenLayout::new(app.screen());
        // "  Root › src › components": "src" starts at column 9
        handle_mouse_event(
            &mut app,
            event(MouseEventKind::Down(MouseButton::Left), 10, layout.breadcrumbs.y),
        );
        assert_eq!(app.explorer.path(), &TreePath::parse("src"));
    }

    #[test]
    fn test_click_closes_help_first() {
        let mut app = app();
        app.toggle_help();
        let (col, row) = cell_of(&app, "src");
        handle_mouse_event(&mut app, event(MouseEventKind::Down(MouseButton::Left), col, row));
        assert_eq!(app.overlay, Overlay::None);
        assert!(!app.explorer.is_dragging());
    }
}
