use crate::ui::helpers::truncate_to_width;
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

pub(super) fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let repo = app
        .repo
        .as_ref()
        .map(|r| r.full_name.clone())
        .unwrap_or_else(|| app.origin.label().to_string());

    let mut spans = vec![
        Span::styled(
            "  codeatlas",
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", Theme::DOT_SEPARATOR), Theme::text_dim()),
        Span::styled(repo, Theme::text()),
    ];

    let status = if app.is_loading() {
        Span::styled(
            format!("{} Analyzing repository… ", app.spinner()),
            Style::default().fg(Theme::GREY_200),
        )
    } else if app.explorer.source().is_sample() {
        Span::styled("sample data ", Theme::text_muted())
    } else {
        let files = app.explorer.source().file_count();
        Span::styled(
            format!("{} files from {} ", files, app.origin.label()),
            Theme::text_muted(),
        )
    };

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let room = (area.width as usize).saturating_sub(used + 1);
    let status_text = truncate_to_width(&status.content, room);
    let spacer = room.saturating_sub(status_text.width());
    spans.push(Span::raw(" ".repeat(spacer + 1)));
    spans.push(Span::styled(status_text, status.style));

    let header = Paragraph::new(vec![Line::from(spans), Line::from("")])
        .style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}
