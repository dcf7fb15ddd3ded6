use crate::tree::NodeKind;
use crate::ui::helpers::truncate_to_width;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

fn hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str) {
    spans.push(Span::styled(format!(" {} ", key), Theme::key_badge()));
    spans.push(Span::styled(format!(" {} ", label), Theme::key_label()));
}

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut buttons: Vec<Span<'static>> = Vec::new();
    hint(&mut buttons, "Tab", "focus");
    match app.explorer.focused().map(|n| n.kind) {
        Some(NodeKind::Directory) => hint(&mut buttons, "↵", "open"),
        Some(NodeKind::File) => hint(&mut buttons, "↵", "details"),
        Some(NodeKind::Back) => hint(&mut buttons, "↵", "back"),
        None => {}
    }
    if !app.explorer.path().is_root() {
        hint(&mut buttons, "⌫", "up");
    }
    if app.explorer.detail().is_some() {
        hint(&mut buttons, "x", "close");
    }
    if app.can_rerun && !app.is_loading() {
        hint(&mut buttons, "r", "re-run");
    }
    hint(&mut buttons, "?", "help");
    hint(&mut buttons, "q", "quit");
    buttons.push(Span::raw(" "));

    // Left side: what the pointer or keyboard is on
    let status = match app.explorer.hovered().and_then(|id| app.explorer.graph().node(id)) {
        Some(node) => format!("  {} {}", node.kind.label(), node.name),
        None => format!("  {}", app.explorer.path()),
    };

    let buttons_width: usize = buttons.iter().map(|s| s.content.width()).sum();
    let available = (area.width as usize).saturating_sub(buttons_width);
    let status = truncate_to_width(&status, available.saturating_sub(1));
    let spacer = available.saturating_sub(status.width());

    let mut spans = vec![Span::styled(status, Theme::text_muted())];
    spans.push(Span::raw(" ".repeat(spacer)));
    spans.extend(buttons);

    let footer = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(Theme::GREY_900));
    frame.render_widget(footer, area);
}
