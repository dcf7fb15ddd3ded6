use crate::tree::{Navigator, TreePath};
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const INDENT: u16 = 2;

/// Screen columns `[start, end)` of one clickable crumb on the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbHit {
    pub start: u16,
    pub end: u16,
    pub path: TreePath,
}

impl BreadcrumbHit {
    pub fn contains(&self, column: u16) -> bool {
        column >= self.start && column < self.end
    }
}

/// Column spans of every crumb as drawn on a bar at `area`.
pub fn breadcrumb_hits(area: Rect, navigator: &Navigator) -> Vec<BreadcrumbHit> {
    let separator = Theme::BREADCRUMB_SEPARATOR.width() as u16;
    let mut x = area.x.saturating_add(INDENT);
    let mut hits = Vec::new();
    for (i, crumb) in navigator.breadcrumbs().iter().enumerate() {
        if i > 0 {
            x = x.saturating_add(separator);
        }
        let end = x.saturating_add(crumb.label.width() as u16).min(area.right());
        if x >= end {
            break;
        }
        hits.push(BreadcrumbHit {
            start: x,
            end,
            path: crumb.path.clone(),
        });
        x = end;
    }
    hits
}

pub(super) fn render_breadcrumbs(frame: &mut Frame, area: Rect, app: &App) {
    let crumbs = app.explorer.navigator().breadcrumbs();
    let mut spans = vec![Span::raw(" ".repeat(INDENT as usize))];
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                Theme::BREADCRUMB_SEPARATOR,
                Style::default().fg(Theme::GREY_500),
            ));
        }
        let style = if i + 1 == crumbs.len() {
            Theme::selected()
        } else {
            Style::default()
                .fg(Theme::GREY_300)
                .add_modifier(Modifier::UNDERLINED)
        };
        spans.push(Span::styled(crumb.label.clone(), style));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Theme::GREY_800));
    frame.render_widget(bar, area);
}
