//! Interactive file-tree graph
//!
//! [`Explorer`] ties the navigator, graph builder and layout together and
//! turns pointer gestures into navigation. Every navigation stops the running
//! simulation and starts a fresh one for the new level; positions are not
//! carried across levels.

use crate::layout::{LayoutParams, Simulation};
use crate::tree::{
    GraphBuilder, GraphError, LevelGraph, Link, Navigator, Node, NodeKind, NodeSource, TreePath,
};
use std::collections::HashSet;

/// Pointer travel (in world units) below which a press-release counts as a click
const CLICK_TOLERANCE: f64 = 3.0;
/// Extra hit radius so small nodes are still easy to grab
const HIT_SLACK: f64 = 2.0;

/// What a click on a node did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Drilled into the named directory
    Entered(String),
    WentBack,
    /// Opened the detail panel for a file
    Opened(String),
    Ignored,
}

/// How strongly to draw one node or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is hovered
    Normal,
    Focused,
    Neighbor,
    Dimmed,
}

/// Hover focus plus the nodes directly linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub focus: String,
    pub neighbors: HashSet<String>,
}

impl Highlight {
    pub fn for_node(graph: &LevelGraph, id: &str) -> Self {
        Self {
            focus: id.to_string(),
            neighbors: graph.neighbors(id).into_iter().map(str::to_string).collect(),
        }
    }

    pub fn node(&self, id: &str) -> Emphasis {
        if id == self.focus {
            Emphasis::Focused
        } else if self.neighbors.contains(id) {
            Emphasis::Neighbor
        } else {
            Emphasis::Dimmed
        }
    }

    /// Links touching the focus are emphasized; the rest dim.
    pub fn link(&self, link: &Link) -> Emphasis {
        if link.touches(&self.focus) {
            Emphasis::Focused
        } else {
            Emphasis::Dimmed
        }
    }
}

/// Contents of the non-modal detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetail {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub extension: Option<String>,
    pub can_drill_down: bool,
    pub connections: usize,
    pub icon: String,
    /// Directory the node lives in
    pub location: TreePath,
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    id: String,
    origin: (f64, f64),
    moved: bool,
}

pub struct Explorer {
    navigator: Navigator,
    source: NodeSource,
    builder: GraphBuilder,
    params: LayoutParams,
    graph: LevelGraph,
    simulation: Simulation,
    hover: Option<String>,
    drag: Option<DragState>,
    detail: Option<NodeDetail>,
    focus_index: Option<usize>,
    error: Option<String>,
    generation: u64,
}

impl Explorer {
    pub fn new(builder: GraphBuilder, params: LayoutParams) -> Self {
        let mut explorer = Self {
            navigator: Navigator::new(),
            source: NodeSource::Sample,
            builder,
            params,
            graph: LevelGraph::default(),
            simulation: Simulation::new(params, std::iter::empty(), std::iter::empty()),
            hover: None,
            drag: None,
            detail: None,
            focus_index: None,
            error: None,
            generation: 0,
        };
        explorer.rebuild();
        explorer
    }

    /// Replace the file list (new analysis) and go back to the root.
    pub fn load(&mut self, source: NodeSource) {
        tracing::info!(
            files = source.file_count(),
            sample = source.is_sample(),
            "loading file tree"
        );
        self.source = source;
        self.navigator.reset();
        self.detail = None;
        self.rebuild();
    }

    /// Recompute the level graph and restart the layout from scratch.
    pub fn rebuild(&mut self) {
        self.simulation.stop();

        let graph = self.builder.build(self.navigator.path(), &self.source);
        match graph.validate() {
            Ok(()) => {
                self.graph = graph;
                self.error = None;
            }
            Err(err) => {
                tracing::error!(path = %self.navigator.path(), error = %err, "level graph is malformed");
                self.graph = LevelGraph::default();
                self.error = Some(format!("Cannot show {}: {}", self.navigator.path(), err));
            }
        }

        let nodes = self.graph.nodes.iter().map(|n| (n.id.as_str(), n.size));
        let links = self
            .graph
            .links
            .iter()
            .map(|l| (l.source.as_str(), l.target.as_str()));
        self.simulation = Simulation::new(self.params, nodes, links);

        self.hover = None;
        self.drag = None;
        self.focus_index = None;
        if self
            .detail
            .as_ref()
            .is_some_and(|d| &d.location != self.navigator.path())
        {
            self.detail = None;
        }
        self.generation += 1;
        tracing::debug!(
            path = %self.navigator.path(),
            nodes = self.graph.nodes.len(),
            links = self.graph.links.len(),
            generation = self.generation,
            "level rebuilt"
        );
    }

    pub fn path(&self) -> &TreePath {
        self.navigator.path()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn source(&self) -> &NodeSource {
        &self.source
    }

    pub fn graph(&self) -> &LevelGraph {
        &self.graph
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn detail(&self) -> Option<&NodeDetail> {
        self.detail.as_ref()
    }

    /// Re-check the current level graph.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.graph.validate()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Bumped on every rebuild; lets callers notice a level change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.hover
            .as_deref()
            .map(|id| Highlight::for_node(&self.graph, id))
    }

    /// Drill into `name` if it is a directory at this level.
    pub fn navigate_into(&mut self, name: &str) -> bool {
        let is_dir = self
            .graph
            .node(name)
            .is_some_and(|n| n.kind == NodeKind::Directory);
        if !is_dir {
            tracing::warn!(name, path = %self.navigator.path(), "not a directory at this level");
            return false;
        }
        if self.navigator.navigate_into(name) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    pub fn navigate_back(&mut self) -> bool {
        if self.navigator.navigate_back() {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Jump to a breadcrumb prefix.
    pub fn navigate_to(&mut self, target: &TreePath) -> bool {
        if target == self.navigator.path() {
            return false;
        }
        if self.navigator.navigate_to(target) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Dispatch a click by node kind.
    pub fn click(&mut self, id: &str) -> ClickOutcome {
        let Some(node) = self.graph.node(id) else {
            tracing::warn!(id, "click on unknown node");
            return ClickOutcome::Ignored;
        };
        match node.kind {
            NodeKind::Directory => {
                let name = node.id.clone();
                if self.navigate_into(&name) {
                    ClickOutcome::Entered(name)
                } else {
                    ClickOutcome::Ignored
                }
            }
            NodeKind::Back => {
                if self.navigate_back() {
                    ClickOutcome::WentBack
                } else {
                    ClickOutcome::Ignored
                }
            }
            NodeKind::File => {
                let id = node.id.clone();
                self.select(&id);
                ClickOutcome::Opened(id)
            }
        }
    }

    /// Show `id` in the detail panel, replacing whatever was there.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(node) = self.graph.node(id) else {
            return false;
        };
        if node.is_back() {
            return false;
        }
        self.detail = Some(self.describe(node));
        true
    }

    pub fn close_detail(&mut self) -> bool {
        self.detail.take().is_some()
    }

    fn describe(&self, node: &Node) -> NodeDetail {
        let icons = &self.builder.palette().icons;
        let icon = match node.kind {
            NodeKind::Directory => icons.directory.clone(),
            NodeKind::Back => icons.back.clone(),
            NodeKind::File => self
                .builder
                .palette()
                .file_icon(node.extension.as_deref())
                .to_string(),
        };
        NodeDetail {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            extension: node.extension.clone(),
            can_drill_down: node.can_drill_down,
            connections: self.graph.connection_count(&node.id),
            icon,
            location: self.navigator.path().clone(),
        }
    }

    /// Set or clear the hovered node. Unknown ids clear it.
    pub fn hover(&mut self, id: Option<&str>) {
        self.hover = id
            .filter(|id| self.graph.node(id).is_some())
            .map(str::to_string);
    }

    /// Id of the topmost node under a world position.
    pub fn node_at(&self, x: f64, y: f64) -> Option<&str> {
        self.simulation
            .body_at(x, y, HIT_SLACK)
            .map(|b| b.id.as_str())
    }

    /// Hover whatever is under the pointer. Ignored while dragging.
    pub fn hover_at(&mut self, x: f64, y: f64) {
        if self.drag.is_some() {
            return;
        }
        let id = self.node_at(x, y).map(str::to_string);
        self.hover(id.as_deref());
    }

    /// Start dragging the node under the pointer. Returns its id.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> Option<String> {
        let id = self.node_at(x, y)?.to_string();
        self.simulation.set_alpha_target(self.params.drag_alpha_target);
        self.simulation.reheat(self.params.drag_alpha_target);
        self.simulation.pin(&id, x, y);
        self.hover = Some(id.clone());
        self.drag = Some(DragState {
            id: id.clone(),
            origin: (x, y),
            moved: false,
        });
        Some(id)
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let (ox, oy) = drag.origin;
        if ((x - ox).powi(2) + (y - oy).powi(2)).sqrt() > CLICK_TOLERANCE {
            drag.moved = true;
        }
        self.simulation.pin(&drag.id, x, y);
    }

    /// Release the dragged node. A release that barely moved is a click.
    pub fn end_drag(&mut self) -> Option<ClickOutcome> {
        let drag = self.drag.take()?;
        self.simulation.set_alpha_target(0.0);
        self.simulation.unpin(&drag.id);
        if drag.moved {
            None
        } else {
            Some(self.click(&drag.id))
        }
    }

    /// Move keyboard focus forward through the nodes, wrapping.
    pub fn focus_next(&mut self) -> Option<&str> {
        self.step_focus(true)
    }

    pub fn focus_prev(&mut self) -> Option<&str> {
        self.step_focus(false)
    }

    fn step_focus(&mut self, forward: bool) -> Option<&str> {
        let len = self.graph.nodes.len();
        if len == 0 {
            return None;
        }
        let next = match (self.focus_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.focus_index = Some(next);
        self.hover = Some(self.graph.nodes[next].id.clone());
        self.hover.as_deref()
    }

    pub fn focused(&self) -> Option<&Node> {
        self.focus_index.and_then(|i| self.graph.nodes.get(i))
    }

    /// Click the keyboard-focused node.
    pub fn activate_focused(&mut self) -> ClickOutcome {
        match self.focused().map(|n| n.id.clone()) {
            Some(id) => self.click(&id),
            None => ClickOutcome::Ignored,
        }
    }

    pub fn tick(&mut self) -> bool {
        self.simulation.tick()
    }

    /// Settle the layout without rendering intermediate frames.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        self.simulation.run(max_ticks)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.params.width = width;
        self.params.height = height;
        self.simulation.resize(width, height);
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(GraphBuilder::default(), LayoutParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FileIndex, BACK_ID};

    fn explorer() -> Explorer {
        let mut explorer = Explorer::default();
        explorer.load(NodeSource::Index(FileIndex::from_entries([
            "README.md",
            "src/App.js",
            "src/components/Header.js",
            "package.json",
        ])));
        explorer
    }

    fn press_release_on(explorer: &mut Explorer, id: &str) -> Option<ClickOutcome> {
        let (x, y) = explorer.simulation().position(id).unwrap();
        assert_eq!(explorer.begin_drag(x, y).as_deref(), Some(id));
        explorer.end_drag()
    }

    #[test]
    fn test_starts_on_sample_root() {
        let explorer = Explorer::default();
        assert!(explorer.source().is_sample());
        assert!(explorer.path().is_root());
        assert_eq!(explorer.graph().nodes.len(), 6);
        assert!(explorer.error().is_none());
        explorer.validate().unwrap();
    }

    #[test]
    fn test_click_directory_drills_down() {
        let mut explorer = explorer();
        assert_eq!(explorer.click("src"), ClickOutcome::Entered("src".to_string()));
        assert_eq!(explorer.path(), &TreePath::parse("src"));
        assert_eq!(explorer.navigator().breadcrumbs().len(), 2);
        assert!(explorer.graph().has_back());
        assert!(explorer.graph().node("App.js").is_some());
    }

    #[test]
    fn test_click_back_goes_up() {
        let mut explorer = explorer();
        explorer.click("src");
        assert_eq!(explorer.click(BACK_ID), ClickOutcome::WentBack);
        assert!(explorer.path().is_root());
        assert!(!explorer.graph().has_back());
    }

    #[test]
    fn test_click_file_opens_detail() {
        let mut explorer = explorer();
        assert_eq!(
            explorer.click("README.md"),
            ClickOutcome::Opened("README.md".to_string())
        );
        let detail = explorer.detail().unwrap();
        assert_eq!(detail.kind, NodeKind::File);
        assert_eq!(detail.extension.as_deref(), Some("md"));
        assert!(!detail.can_drill_down);
        assert_eq!(detail.connections, 1);
        assert_eq!(detail.icon, "📝");
        assert!(explorer.path().is_root());

        explorer.select("package.json");
        assert_eq!(explorer.detail().unwrap().id, "package.json");
        assert!(explorer.close_detail());
        assert!(explorer.detail().is_none());
    }

    #[test]
    fn test_select_directory_and_back() {
        let mut explorer = explorer();
        assert!(explorer.select("src"));
        let detail = explorer.detail().unwrap();
        assert!(detail.can_drill_down);
        assert_eq!(detail.kind, NodeKind::Directory);
        assert_eq!(detail.connections, 2);
        assert!(explorer.path().is_root());

        explorer.click("src");
        assert!(!explorer.select(BACK_ID));
    }

    #[test]
    fn test_detail_cleared_when_level_changes() {
        let mut explorer = explorer();
        explorer.click("README.md");
        explorer.click("src");
        assert!(explorer.detail().is_none());
    }

    #[test]
    fn test_unknown_click_is_ignored() {
        let mut explorer = explorer();
        let generation = explorer.generation();
        assert_eq!(explorer.click("ghost"), ClickOutcome::Ignored);
        assert_eq!(explorer.generation(), generation);
    }

    #[test]
    fn test_breadcrumb_jump() {
        let mut explorer = explorer();
        explorer.click("src");
        explorer.click("components");
        assert!(explorer.navigate_to(&TreePath::parse("src")));
        assert_eq!(explorer.path(), &TreePath::parse("src"));
        let labels: Vec<_> = explorer
            .navigator()
            .breadcrumbs()
            .iter()
            .map(|c| c.label.clone())
            .collect();
        assert_eq!(labels, vec!["Root", "src"]);
        assert!(!explorer.navigate_to(&TreePath::parse("src")));
    }

    #[test]
    fn test_navigate_into_requires_directory_at_level() {
        let mut explorer = explorer();
        assert!(!explorer.navigate_into("components"));
        assert!(!explorer.navigate_into("README.md"));
        assert!(explorer.path().is_root());
    }

    #[test]
    fn test_into_then_back_round_trips() {
        let mut explorer = explorer();
        let before = explorer.graph().clone();
        explorer.navigate_into("src");
        explorer.navigate_back();
        assert_eq!(explorer.graph(), &before);
    }

    #[test]
    fn test_hover_highlights_neighbors() {
        let mut explorer = explorer();
        explorer.hover(Some("README.md"));
        let highlight = explorer.highlight().unwrap();
        let hub = explorer.graph().hub().unwrap().id.clone();
        assert_eq!(highlight.node("README.md"), Emphasis::Focused);
        assert_eq!(highlight.node(&hub), Emphasis::Neighbor);
        assert_eq!(highlight.node("package.json"), Emphasis::Dimmed);

        let lit = explorer
            .graph()
            .links
            .iter()
            .filter(|l| highlight.link(l) == Emphasis::Focused)
            .count();
        assert_eq!(lit, 1);

        explorer.hover(None);
        assert!(explorer.highlight().is_none());
    }

    #[test]
    fn test_hover_unknown_clears() {
        let mut explorer = explorer();
        explorer.hover(Some("README.md"));
        explorer.hover(Some("ghost"));
        assert!(explorer.hovered().is_none());
    }

    #[test]
    fn test_rebuild_stops_and_replaces_simulation() {
        let mut explorer = explorer();
        explorer.hover(Some("src"));
        let generation = explorer.generation();
        explorer.click("src");
        assert_eq!(explorer.generation(), generation + 1);
        assert!(!explorer.simulation().is_stopped());
        assert_eq!(explorer.simulation().ticks(), 0);
        assert_eq!(
            explorer.simulation().bodies().len(),
            explorer.graph().nodes.len()
        );
        assert!(explorer.hovered().is_none());
    }

    #[test]
    fn test_press_release_is_click() {
        let mut explorer = explorer();
        explorer.settle(400);
        let outcome = press_release_on(&mut explorer, "src");
        assert_eq!(outcome, Some(ClickOutcome::Entered("src".to_string())));
    }

    #[test]
    fn test_drag_pins_then_releases() {
        let mut explorer = explorer();
        explorer.settle(400);
        let (x, y) = explorer.simulation().position("README.md").unwrap();
        explorer.begin_drag(x, y).unwrap();
        explorer.drag_to(x + 40.0, y + 40.0);
        for _ in 0..10 {
            explorer.tick();
        }
        assert_eq!(
            explorer.simulation().position("README.md"),
            Some((x + 40.0, y + 40.0))
        );
        assert!(explorer.simulation().is_active());

        assert_eq!(explorer.end_drag(), None);
        assert!(!explorer.is_dragging());
        assert!(!explorer.simulation().body("README.md").unwrap().is_pinned());
        assert!(explorer.path().is_root());
    }

    #[test]
    fn test_focus_cycles_and_activates() {
        let mut explorer = explorer();
        let ids: Vec<_> = explorer.graph().nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(explorer.focus_next(), Some(ids[0].as_str()));
        assert_eq!(explorer.focus_next(), Some(ids[1].as_str()));
        assert_eq!(explorer.focus_prev(), Some(ids[0].as_str()));
        assert_eq!(explorer.focus_prev(), Some(ids[ids.len() - 1].as_str()));
        assert_eq!(explorer.hovered(), Some(ids[ids.len() - 1].as_str()));

        while explorer.focused().map(|n| n.id.as_str()) != Some("src") {
            explorer.focus_next();
        }
        assert_eq!(
            explorer.activate_focused(),
            ClickOutcome::Entered("src".to_string())
        );
        assert!(explorer.focused().is_none());
    }

    #[test]
    fn test_load_resets_to_root() {
        let mut explorer = explorer();
        explorer.click("src");
        explorer.load(NodeSource::from_file_structure(None));
        assert!(explorer.path().is_root());
        assert!(explorer.source().is_sample());
        assert!(explorer.graph().node("public").is_some());
    }

    #[test]
    fn test_find_style_file_list_is_navigable() {
        let mut explorer = Explorer::default();
        explorer.load(NodeSource::from_file_structure(Some(
            "./README.md\n./src/App.js\n./src/components/Header.js",
        )));
        assert!(explorer.graph().node(".").is_none());
        assert_eq!(explorer.click("src"), ClickOutcome::Entered("src".to_string()));
        assert_eq!(explorer.path(), &TreePath::parse("src"));
        assert!(explorer.error().is_none());
    }

    #[test]
    fn test_parent_segments_never_clash_with_back_node() {
        let mut explorer = Explorer::default();
        explorer.load(NodeSource::from_file_structure(Some("a/../b.txt\na/c.txt")));
        explorer.click("a");
        assert_eq!(explorer.path(), &TreePath::parse("a"));
        assert!(explorer.error().is_none());
        let ids: Vec<&str> = explorer.graph().nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![BACK_ID, "c.txt"]);
    }
}
