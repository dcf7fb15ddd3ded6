//! Mapping between terminal cells and layout world coordinates, plus the
//! per-emphasis node and link styling used by the graph panel.
//!
//! One cell is `WORLD_PER_COL` world units wide and `WORLD_PER_ROW` tall, so a
//! circle in world space looks round on a terminal with 1:2 cells.

use super::theme::{rgb, Theme};
use crate::explorer::Emphasis;
use crate::tree::Node;
use ratatui::layout::Rect;
use ratatui::style::Color;

pub const WORLD_PER_COL: f64 = 8.0;
pub const WORLD_PER_ROW: f64 = 16.0;

/// The graph panel's inner area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    area: Rect,
}

impl Viewport {
    pub fn new(area: Rect) -> Self {
        Self { area }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn world_size(&self) -> (f64, f64) {
        (
            f64::from(self.area.width) * WORLD_PER_COL,
            f64::from(self.area.height) * WORLD_PER_ROW,
        )
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.right()
            && row >= self.area.y
            && row < self.area.bottom()
    }

    /// Center of a cell in world units, if the cell is inside the panel.
    pub fn to_world(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        self.contains(column, row)
            .then(|| self.clamped_world(column, row))
    }

    /// Like [`Viewport::to_world`] but pulls outside cells to the nearest
    /// edge, so a drag that leaves the panel keeps the node on screen.
    pub fn clamped_world(&self, column: u16, row: u16) -> (f64, f64) {
        let col = column
            .clamp(self.area.x, self.area.right().saturating_sub(1).max(self.area.x))
            - self.area.x;
        let row = row
            .clamp(self.area.y, self.area.bottom().saturating_sub(1).max(self.area.y))
            - self.area.y;
        (
            (f64::from(col) + 0.5) * WORLD_PER_COL,
            (f64::from(row) + 0.5) * WORLD_PER_ROW,
        )
    }

    /// Canvas y runs bottom-up; world y runs top-down.
    pub fn canvas_y(&self, world_y: f64) -> f64 {
        self.world_size().1 - world_y
    }
}

/// Scale applied to a node's radius while hovered.
pub fn radius_scale(emphasis: Emphasis) -> f64 {
    match emphasis {
        Emphasis::Focused => 1.2,
        Emphasis::Neighbor => 1.1,
        Emphasis::Normal | Emphasis::Dimmed => 1.0,
    }
}

pub fn node_color(node: &Node, emphasis: Emphasis) -> Color {
    match emphasis {
        Emphasis::Normal | Emphasis::Focused => rgb(node.color),
        Emphasis::Neighbor => Theme::NEIGHBOR,
        Emphasis::Dimmed => Theme::DIMMED,
    }
}

pub fn link_color(emphasis: Emphasis) -> Color {
    match emphasis {
        Emphasis::Focused => Theme::LINK_HIGHLIGHT,
        Emphasis::Dimmed => Theme::DIMMED,
        Emphasis::Normal | Emphasis::Neighbor => Theme::LINK,
    }
}
