//! HTML summary blobs to terminal text
//!
//! The backend renders its summaries from Markdown to HTML. For the terminal
//! we go the other way, back to a small Markdown subset (`#` headings, `-`
//! bullets, fenced code, inline backticks and `**bold**`) that the UI's
//! Markdown renderer understands.

use regex::Regex;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>")
            .unwrap_or_else(|_| Regex::new("$^").unwrap())
    })
}

const FENCE: &str = "```";

pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Line break unless already at the start of a line.
fn soft_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Paragraph break: exactly one blank line.
fn block_break(out: &mut String) {
    if out.is_empty() {
        return;
    }
    soft_break(out);
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

fn push_text(out: &mut String, text: &str, in_pre: bool) {
    if in_pre {
        out.push_str(&decode_entities(text));
    } else if !text.trim().is_empty() {
        out.push_str(&decode_entities(&text.replace('\n', " ")));
    } else if !text.is_empty() && !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Convert a summary HTML blob into display lines.
pub fn to_plain_lines(html: &str) -> Vec<String> {
    let mut out = String::with_capacity(html.len());
    let mut in_pre = false;
    let mut last = 0;

    for caps in tag_regex().captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut out, &html[last..whole.start()], in_pre);
        last = whole.end();

        let closing = &caps[1] == "/";
        let name = caps[2].to_ascii_lowercase();
        match name.as_str() {
            "br" => out.push('\n'),
            "p" | "div" | "ul" | "ol" | "blockquote" | "table" => block_break(&mut out),
            "tr" => soft_break(&mut out),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                block_break(&mut out);
                if !closing {
                    out.push_str(match name.as_str() {
                        "h1" => "# ",
                        "h2" => "## ",
                        _ => "### ",
                    });
                }
            }
            "li" => {
                soft_break(&mut out);
                if !closing {
                    out.push_str("- ");
                }
            }
            "pre" => {
                block_break(&mut out);
                out.push_str(FENCE);
                out.push('\n');
                in_pre = !closing;
                if closing {
                    out.push('\n');
                }
            }
            "code" if !in_pre => out.push('`'),
            "strong" | "b" => out.push_str("**"),
            _ => {}
        }
    }
    push_text(&mut out, &html[last..], in_pre);

    tidy(&out)
}

/// Trim and collapse whitespace outside code fences, then squeeze blank runs.
fn tidy(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut in_fence = false;

    for raw in text.lines() {
        let line = raw.trim_end();
        if line.trim() == FENCE {
            in_fence = !in_fence;
            lines.push(FENCE.to_string());
            continue;
        }
        if in_fence {
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            continue;
        }
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(collapsed);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_lists_and_paragraphs() {
        let html = "<h2>Setup</h2>\n<ul>\n<li>Install <code>cargo</code></li>\n<li>Run it</li>\n</ul>\n<p>Fish &amp; chips</p>";
        assert_eq!(
            to_plain_lines(html),
            vec![
                "## Setup",
                "",
                "- Install `cargo`",
                "- Run it",
                "",
                "Fish & chips",
            ]
        );
    }

    #[test]
    fn test_pre_blocks_keep_line_breaks() {
        let html = "<p>Build:</p>\n<pre><code>cargo build\ncargo test\n</code></pre>";
        assert_eq!(
            to_plain_lines(html),
            vec!["Build:", "", "```", "cargo build", "cargo test", "```"]
        );
    }

    #[test]
    fn test_unknown_tags_are_stripped() {
        let html = r#"<p>See <a href="https://x.dev">the <em>docs</em></a>.</p>"#;
        assert_eq!(to_plain_lines(html), vec!["See the docs."]);
    }

    #[test]
    fn test_entities_decode_once() {
        assert_eq!(decode_entities("&amp;lt; &lt;b&gt; &quot;q&quot; it&#39;s"), "&lt; <b> \"q\" it's");
    }

    #[test]
    fn test_empty_and_plain_text() {
        assert!(to_plain_lines("").is_empty());
        assert!(to_plain_lines("  \n ").is_empty());
        assert_eq!(to_plain_lines("just text"), vec!["just text"]);
    }

    #[test]
    fn test_space_between_inline_tags_survives() {
        assert_eq!(to_plain_lines("<p><b>a</b> <b>b</b></p>"), vec!["**a** **b**"]);
    }

    #[test]
    fn test_line_breaks_and_bold() {
        assert_eq!(
            to_plain_lines("<p><strong>Note</strong><br>second</p>"),
            vec!["**Note**", "second"]
        );
    }
}
