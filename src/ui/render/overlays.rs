use crate::ui::helpers::centered_rect;
use crate::ui::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Every line of the help overlay, top to bottom.
fn help_lines() -> Vec<Line<'static>> {
    fn section_start(title: &str) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("    ╭─ ".to_string(), Style::default().fg(Theme::GREY_600)),
                Span::styled(
                    title.to_string(),
                    Style::default()
                        .fg(Theme::WHITE)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " ─────────────────────────╮".to_string(),
                    Style::default().fg(Theme::GREY_600),
                ),
            ]),
        ]
    }

    fn key_row(key: &str, desc: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled("    │  ".to_string(), Style::default().fg(Theme::GREY_600)),
            Span::styled(
                format!(" {} ", key),
                Style::default().fg(Theme::GREY_900).bg(Theme::GREY_300),
            ),
            Span::styled(format!("  {}", desc), Style::default().fg(Theme::GREY_200)),
        ])
    }

    fn section_end() -> Line<'static> {
        Line::from(vec![Span::styled(
            "    ╰─────────────────────────────────────╯".to_string(),
            Style::default().fg(Theme::GREY_600),
        )])
    }

    fn section_spacer() -> Line<'static> {
        Line::from(vec![Span::styled(
            "    │".to_string(),
            Style::default().fg(Theme::GREY_600),
        )])
    }

    let sections: [(&str, &[(&str, &str)]); 3] = [
        (
            "Graph",
            &[
                ("click", "Open folder, go back, or show file"),
                ("drag", "Move a node around"),
                ("Tab", "Focus next node (⇧Tab previous)"),
                ("↵", "Click the focused node"),
                ("i", "Details for the focused node"),
                ("⌫", "Up one level"),
                ("x", "Close the details panel"),
            ],
        ),
        (
            "Analysis",
            &[
                ("1-3", "README / Structure / Setup"),
                ("PgUp/Dn", "Scroll the summary"),
                ("r", "Run the analysis again"),
            ],
        ),
        (
            "General",
            &[("?", "Toggle this help"), ("q", "Quit")],
        ),
    ];

    let mut lines: Vec<Line<'static>> = vec![Line::from("")];
    for (title, rows) in sections {
        lines.extend(section_start(title));
        lines.push(section_spacer());
        lines.extend(rows.iter().map(|(key, desc)| key_row(key, desc)));
        lines.push(section_spacer());
        lines.push(section_end());
    }
    lines
}

pub(super) fn render_help(frame: &mut Frame, scroll: usize) {
    let area = centered_rect(55, 80, frame.area());
    frame.render_widget(Clear, area);

    let help_text = help_lines();
    let scroll = scroll.min(help_text.len().saturating_sub(1));
    let visible: Vec<Line> = help_text.into_iter().skip(scroll).collect();

    let block = Paragraph::new(visible).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Theme::GREY_100))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::GREY_400))
            .style(Style::default().bg(Theme::GREY_900)),
    );

    frame.render_widget(block, area);
}
