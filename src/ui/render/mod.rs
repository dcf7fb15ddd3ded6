mod breadcrumbs;
mod footer;
mod graph;
mod header;
mod overlays;
mod panels;
mod toast;

use crate::ui::theme::Theme;
use crate::ui::{App, Overlay};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

pub use breadcrumbs::{breadcrumb_hits, BreadcrumbHit};

use breadcrumbs::render_breadcrumbs;
use footer::render_footer;
use graph::render_graph;
use header::render_header;
use overlays::render_help;
use panels::render_side;
use toast::render_toast;

/// Where each part of the screen goes. Input handling uses the same layout
/// for hit-testing, so it must only depend on the terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub breadcrumbs: Rect,
    pub graph: Rect,
    pub side: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(1), // Breadcrumbs
                Constraint::Min(6),    // Graph + side panels
                Constraint::Length(2), // Footer
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[2]);

        Self {
            header: rows[0],
            breadcrumbs: rows[1],
            graph: columns[0],
            side: columns[1],
            footer: rows[3],
        }
    }

    /// Graph panel minus its border.
    pub fn graph_inner(&self) -> Rect {
        Block::bordered().inner(self.graph)
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with dark background
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

    let layout = ScreenLayout::new(area);
    render_header(frame, layout.header, app);
    render_breadcrumbs(frame, layout.breadcrumbs, app);
    render_graph(frame, layout.graph, app);
    render_side(frame, layout.side, app);
    render_footer(frame, layout.footer, app);

    if let Overlay::Help { scroll } = app.overlay {
        render_help(frame, scroll);
    }

    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{buffer_text, draw};
    use super::*;
    use crate::analysis::AnalysisReport;
    use crate::explorer::Explorer;
    use crate::ui::DataOrigin;

    #[test]
    fn test_layout_fits_screen() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.header.height, 2);
        assert_eq!(layout.breadcrumbs.y, 2);
        assert_eq!(layout.footer.bottom(), 40);
        assert_eq!(layout.graph.width + layout.side.width, 120);
        assert_eq!(layout.graph_inner().x, layout.graph.x + 1);
    }

    #[test]
    fn test_renders_sample_dashboard() {
        let mut app = App::new(Explorer::default());
        app.explorer.settle(300);
        let text = buffer_text(&draw(&mut app, 120, 40));
        assert!(text.contains("codeatlas"));
        assert!(text.contains("Root"));
        assert!(text.contains("README"));
        assert!(text.contains("quit"));
        assert!(text.contains("6 nodes"));
    }

    #[test]
    fn test_renders_help_and_toast() {
        let mut app = App::new(Explorer::default());
        app.toggle_help();
        app.show_toast("+ Loaded 3 files");
        let text = buffer_text(&draw(&mut app, 100, 40));
        assert!(text.contains("Help"));
        assert!(text.contains("Loaded 3 files"));
    }

    #[test]
    fn test_renders_report_summary_and_detail() {
        let mut app = App::new(Explorer::default());
        app.apply_report(
            AnalysisReport {
                readme_summary: "<h2>Overview</h2><p>A todo app</p>".to_string(),
                file_structure: Some("README.md\nsrc/App.js".to_string()),
                ..AnalysisReport::default()
            },
            DataOrigin::Service,
        );
        app.explorer.select("README.md");
        let text = buffer_text(&draw(&mut app, 120, 40));
        assert!(text.contains("Overview"));
        assert!(text.contains("A todo app"));
        assert!(text.contains("Details"));
        assert!(text.contains("md"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = App::new(Explorer::default());
        app.toggle_help();
        app.show_toast("Analysis failed: timeout");
        draw(&mut app, 10, 4);
        draw(&mut app, 1, 1);
    }
}
