//! Styled lines for the summary panel
//!
//! Input is the Markdown subset `analysis::summary` produces: `#` headings,
//! `- ` bullets, fenced code, inline backticks and `**bold**`.

use super::helpers::wrap_text;
use super::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

const FENCE: &str = "```";
const BULLET: &str = "  • ";
const BULLET_CONT: &str = "    ";
const CODE_GUTTER: &str = "  ▏ ";

enum Block<'a> {
    Blank,
    Heading(usize, &'a str),
    Bullet(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Block<'_> {
    if line.trim().is_empty() {
        return Block::Blank;
    }
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=3).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return Block::Heading(hashes, rest);
        }
    }
    match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        Some(rest) => Block::Bullet(rest),
        None => Block::Text(line),
    }
}

/// Render summary text to lines no wider than `max_width` (code excepted).
pub fn parse_markdown(text: &str, max_width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        if raw.trim_start().starts_with(FENCE) {
            in_code = !in_code;
            continue;
        }
        if in_code {
            lines.push(code_line(raw));
            continue;
        }
        match classify(raw) {
            Block::Blank => lines.push(Line::default()),
            Block::Heading(level, content) => lines.push(heading_line(level, content)),
            Block::Bullet(content) => {
                let width = max_width.saturating_sub(BULLET.chars().count());
                for (i, row) in wrap_text(content, width).iter().enumerate() {
                    let prefix = if i == 0 { BULLET } else { BULLET_CONT };
                    let mut spans = vec![Span::styled(prefix, Style::default().fg(Theme::GREY_400))];
                    spans.extend(inline_spans(row));
                    lines.push(Line::from(spans));
                }
            }
            Block::Text(content) => lines.extend(
                wrap_text(content, max_width)
                    .iter()
                    .map(|row| Line::from(inline_spans(row))),
            ),
        }
    }
    lines
}

fn heading_line(level: usize, text: &str) -> Line<'static> {
    let color = match level {
        1 => Theme::WHITE,
        2 => Theme::GREY_100,
        _ => Theme::GREY_200,
    };
    let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let text = text.replace("**", "").replace('`', "");
    if level == 1 {
        Line::from(Span::styled(text, style.add_modifier(Modifier::UNDERLINED)))
    } else {
        Line::from(Span::styled(text, style))
    }
}

fn code_line(text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(CODE_GUTTER, Style::default().fg(Theme::GREY_500)),
        Span::styled(
            text.replace('\t', "    "),
            Style::default().fg(Theme::GREY_200).bg(Theme::GREY_800),
        ),
    ])
}

/// Inline code first, then bold inside the plain stretches. An unmatched
/// marker stays as literal text.
fn inline_spans(text: &str) -> Vec<Span<'static>> {
    let plain = Style::default().fg(Theme::GREY_100);
    let code = Style::default().fg(Theme::GREY_200).add_modifier(Modifier::BOLD);
    let bold = Style::default().fg(Theme::WHITE).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for (stretch, is_code) in paired(text, "`") {
        if is_code {
            spans.push(Span::styled(stretch, code));
            continue;
        }
        for (part, is_bold) in paired(&stretch, "**") {
            if !part.is_empty() {
                spans.push(Span::styled(part, if is_bold { bold } else { plain }));
            }
        }
    }
    if spans.is_empty() {
        spans.push(Span::raw(""));
    }
    spans
}

/// Split on `marker`, flagging the stretches between matched pairs.
fn paired(text: &str, marker: &str) -> Vec<(String, bool)> {
    let parts: Vec<&str> = text.split(marker).collect();
    let matched = if parts.len() % 2 == 0 {
        parts.len() - 1
    } else {
        parts.len()
    };

    let mut out: Vec<(String, bool)> = parts[..matched]
        .iter()
        .enumerate()
        .filter(|(i, part)| i % 2 == 1 || !part.is_empty())
        .map(|(i, part)| (part.to_string(), i % 2 == 1))
        .collect();
    if matched < parts.len() {
        let tail = format!("{}{}", marker, parts[matched]);
        match out.last_mut() {
            Some((last, false)) => last.push_str(&tail),
            _ => out.push((tail, false)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_headings_drop_their_markers() {
        let lines = parse_markdown("# Overview\n## Setup\n####### not a heading", 80);
        assert_eq!(text_of(&lines[0]), "Overview");
        assert_eq!(text_of(&lines[1]), "Setup");
        assert_eq!(text_of(&lines[2]), "####### not a heading");
    }

    #[test]
    fn test_bullets_wrap_under_their_text() {
        let lines = parse_markdown("- one two three four", 12);
        assert!(lines.len() > 1);
        assert!(text_of(&lines[0]).starts_with(BULLET));
        assert!(text_of(&lines[1]).starts_with(BULLET_CONT));
    }

    #[test]
    fn test_code_blocks_are_rendered_verbatim() {
        let lines = parse_markdown("Build:\n```\ncargo  build\n```\ndone", 80);
        assert_eq!(lines.len(), 3);
        assert!(text_of(&lines[1]).ends_with("cargo  build"));
        assert_eq!(text_of(&lines[2]), "done");
    }

    #[test]
    fn test_inline_code_and_bold() {
        let spans = inline_spans("Run `npm start` for **dev** mode");
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["Run ", "npm start", " for ", "dev", " mode"]);
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].style.fg, Some(Theme::WHITE));
    }

    #[test]
    fn test_unmatched_markers_stay_literal() {
        let spans = inline_spans("a `b and **c");
        let joined: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, "a `b and **c");
    }
}
