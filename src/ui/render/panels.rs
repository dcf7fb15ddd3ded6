use crate::analysis::SummaryTab;
use crate::explorer::NodeDetail;
use crate::tree::NodeKind;
use crate::ui::markdown::parse_markdown;
use crate::ui::theme::Theme;
use crate::ui::{App, DataOrigin};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Height of the detail panel including its border
const DETAIL_HEIGHT: u16 = 9;

pub(super) fn render_side(frame: &mut Frame, area: Rect, app: &App) {
    match app.explorer.detail() {
        Some(detail) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(DETAIL_HEIGHT), Constraint::Min(3)])
                .split(area);
            render_detail(frame, parts[0], detail);
            render_summaries(frame, parts[1], app);
        }
        None => render_summaries(frame, area, app),
    }
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), Theme::text_muted()),
        Span::styled(value, Theme::text()),
    ])
}

fn render_detail(frame: &mut Frame, area: Rect, detail: &NodeDetail) {
    let drill_down = if detail.can_drill_down {
        "Available"
    } else {
        "Not available"
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {} ", detail.icon), Theme::text()),
            Span::styled(detail.name.clone(), Theme::selected()),
        ]),
        Line::from(""),
        field("Type", detail.kind.label().to_string()),
    ];
    if detail.kind == NodeKind::File {
        lines.push(field(
            "Extension",
            detail
                .extension
                .as_deref()
                .map_or_else(|| "none".to_string(), |e| format!(".{}", e)),
        ));
    }
    lines.push(field("Drill down", drill_down.to_string()));
    lines.push(field("Connections", detail.connections.to_string()));
    lines.push(field("Location", detail.location.to_string()));

    let block = Block::default()
        .title(" Details ")
        .title_style(Theme::title())
        .title_bottom(Line::from(vec![
            Span::styled(" x ", Theme::key_badge()),
            Span::styled(" close ", Theme::key_label()),
        ]))
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::GREY_800));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summaries(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Analysis ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::BG));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<Line> = SummaryTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.summary_tab.index())
        .style(Theme::text_dim())
        .highlight_style(Theme::selected().add_modifier(Modifier::UNDERLINED))
        .divider(Span::styled("│", Style::default().fg(Theme::GREY_600)));
    frame.render_widget(tabs, parts[0]);

    let body = parts[1];
    let lines: Vec<Line> = if app.is_loading() {
        vec![Line::from(Span::styled(
            format!("  {} Analyzing repository…", app.spinner()),
            Theme::text_muted(),
        ))]
    } else if app.summary_lines().is_empty() {
        vec![Line::from(Span::styled(
            format!("  {}", empty_message(app)),
            Theme::text_dim(),
        ))]
    } else {
        let width = body.width.saturating_sub(2) as usize;
        parse_markdown(&app.summary_lines().join("\n"), width)
            .into_iter()
            .map(|line| {
                let mut spans = vec![Span::raw(" ")];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect()
    };

    let visible: Vec<Line> = lines.into_iter().skip(app.summary_scroll).collect();
    frame.render_widget(Paragraph::new(visible), body);
}

fn empty_message(app: &App) -> String {
    if let Some(error) = &app.last_error {
        return format!("Analysis failed: {}", error);
    }
    match (app.report.as_ref(), app.origin) {
        (None, _) => "No analysis yet. Run with a GitHub URL to analyze a repository.".to_string(),
        (Some(_), DataOrigin::Service | DataOrigin::SavedReport) => {
            format!("No {} summary for this repository.", app.summary_tab.title())
        }
        (Some(_), origin) => format!("Summaries come from the analysis service, not the {}.", origin.label()),
    }
}
