use crate::explorer::Emphasis;
use crate::ui::graph::{link_color, node_color, radius_scale, Viewport, WORLD_PER_COL};
use crate::ui::helpers::{truncate_to_width, wrap_text};
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as Segment, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

const LABEL_WIDTH: usize = 18;
/// Spacing between the concentric rings that fill a node
const RING_STEP: f64 = 3.0;

pub(super) fn render_graph(frame: &mut Frame, area: Rect, app: &App) {
    let explorer = &app.explorer;
    let graph = explorer.graph();

    let block = Block::default()
        .title(format!(" Files · {} nodes ", graph.nodes.len()))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::BG));

    if let Some(error) = explorer.error() {
        let inner = block.inner(area);
        let lines: Vec<Line> = wrap_text(error, inner.width.saturating_sub(4) as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(format!("  {}", l), Style::default().fg(Theme::RED))))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let viewport = Viewport::new(block.inner(area));
    let (width, height) = viewport.world_size();
    if graph.nodes.is_empty() || width <= 0.0 || height <= 0.0 {
        let empty = Paragraph::new(Line::from(Span::styled("  Nothing here", Theme::text_dim())))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let highlight = explorer.highlight();
    let simulation = explorer.simulation();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(Theme::BG)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for link in &graph.links {
                let (Some((x1, y1)), Some((x2, y2))) = (
                    simulation.position(&link.source),
                    simulation.position(&link.target),
                ) else {
                    continue;
                };
                let emphasis = highlight
                    .as_ref()
                    .map_or(Emphasis::Normal, |h| h.link(link));
                ctx.draw(&Segment {
                    x1,
                    y1: viewport.canvas_y(y1),
                    x2,
                    y2: viewport.canvas_y(y2),
                    color: link_color(emphasis),
                });
            }
            ctx.layer();

            for node in &graph.nodes {
                let Some(body) = simulation.body(&node.id) else {
                    continue;
                };
                let emphasis = highlight
                    .as_ref()
                    .map_or(Emphasis::Normal, |h| h.node(&node.id));
                draw_disc(
                    ctx,
                    body.x,
                    viewport.canvas_y(body.y),
                    body.radius * radius_scale(emphasis),
                    node_color(node, emphasis),
                );
            }
            ctx.layer();

            for node in &graph.nodes {
                let Some(body) = simulation.body(&node.id) else {
                    continue;
                };
                let emphasis = highlight
                    .as_ref()
                    .map_or(Emphasis::Normal, |h| h.node(&node.id));
                let style = match emphasis {
                    Emphasis::Focused => Theme::selected(),
                    Emphasis::Dimmed => Style::default().fg(Theme::DIMMED),
                    _ if node.is_directory() => Style::default()
                        .fg(Theme::GREY_50)
                        .add_modifier(Modifier::BOLD),
                    _ => Theme::text(),
                };
                let label = truncate_to_width(&node.name, LABEL_WIDTH);
                let x = body.x + body.radius * radius_scale(emphasis) + WORLD_PER_COL * 0.5;
                ctx.print(x, viewport.canvas_y(body.y), Line::styled(label, style));
            }
        });

    frame.render_widget(canvas, area);
}

/// Concentric rings read as a filled circle at Braille resolution.
fn draw_disc(ctx: &mut Context, x: f64, y: f64, radius: f64, color: Color) {
    let mut r = radius;
    while r > 0.0 {
        ctx.draw(&Circle {
            x,
            y,
            radius: r,
            color,
        });
        r -= RING_STEP;
    }
    ctx.draw(&Points {
        coords: &[(x, y)],
        color,
    });
}
