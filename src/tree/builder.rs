//! Node/link derivation for one directory level
//!
//! A level graph is a star: the back node (when below the root) comes first,
//! then directories, then files. The hub is the first non-back node and every
//! other node, the back node included, links to it.

use super::index::NodeSource;
use super::palette::{extension_of, Palette, Rgb};
use super::path::TreePath;
use std::collections::HashSet;
use std::fmt;

/// Id of the synthetic back node. `..` can never be a repository path segment.
pub const BACK_ID: &str = "..";
pub const BACK_LABEL: &str = "← Back";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
    Back,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
            NodeKind::Back => "back",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique within the level; directory and file ids are their names
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub size: f64,
    pub color: Rgb,
    pub can_drill_down: bool,
    /// Only set for files with a `.` in their name
    pub extension: Option<String>,
}

impl Node {
    pub fn is_back(&self) -> bool {
        self.kind == NodeKind::Back
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// Broken graph contract. Building never produces one of these from a
/// well-formed source; seeing one means a bug upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    EmptyId { index: usize },
    DuplicateId(String),
    InvalidSize { id: String, size: f64 },
    MisplacedBack { index: usize },
    DanglingLink { source: String, target: String },
    LinkCount { nodes: usize, links: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::EmptyId { index } => write!(f, "node #{} has an empty id", index),
            GraphError::DuplicateId(id) => write!(f, "node id '{}' appears more than once", id),
            GraphError::InvalidSize { id, size } => {
                write!(f, "node '{}' has invalid size {}", id, size)
            }
            GraphError::MisplacedBack { index } => {
                write!(f, "back node found at position {} (must be first)", index)
            }
            GraphError::DanglingLink { source, target } => {
                write!(f, "link {} -> {} references an unknown node", source, target)
            }
            GraphError::LinkCount { nodes, links } => {
                write!(f, "{} links for {} nodes (expected star topology)", links, nodes)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Nodes and links visible at one path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl LevelGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn has_back(&self) -> bool {
        self.nodes.first().is_some_and(Node::is_back)
    }

    /// The node every link starts from.
    pub fn hub(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| !n.is_back())
    }

    /// Ids directly linked to `id`.
    pub fn neighbors(&self, id: &str) -> HashSet<&str> {
        let mut out = HashSet::new();
        for link in &self.links {
            if link.source == id {
                out.insert(link.target.as_str());
            }
            if link.target == id {
                out.insert(link.source.as_str());
            }
        }
        out
    }

    pub fn connection_count(&self, id: &str) -> usize {
        self.links.iter().filter(|l| l.touches(id)).count()
    }

    pub fn directories(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Directory)
    }

    pub fn files(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::File)
    }

    /// Check the invariants renderers rely on.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(GraphError::EmptyId { index });
            }
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
            if !(node.size.is_finite() && node.size > 0.0) {
                return Err(GraphError::InvalidSize {
                    id: node.id.clone(),
                    size: node.size,
                });
            }
            if node.is_back() && index != 0 {
                return Err(GraphError::MisplacedBack { index });
            }
        }

        let expected = self.nodes.len().saturating_sub(1);
        if self.links.len() != expected {
            return Err(GraphError::LinkCount {
                nodes: self.nodes.len(),
                links: self.links.len(),
            });
        }
        for link in &self.links {
            if !ids.contains(link.source.as_str()) || !ids.contains(link.target.as_str()) {
                return Err(GraphError::DanglingLink {
                    source: link.source.clone(),
                    target: link.target.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Turns a level listing into decorated nodes and links.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    palette: Palette,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(Palette::builtin().clone())
    }
}

impl GraphBuilder {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn build(&self, path: &TreePath, source: &NodeSource) -> LevelGraph {
        let level = source.level(path);
        let mut nodes = Vec::with_capacity(level.directories.len() + level.files.len() + 1);

        if !path.is_root() {
            nodes.push(Node {
                id: BACK_ID.to_string(),
                name: BACK_LABEL.to_string(),
                kind: NodeKind::Back,
                size: self.palette.sizes.back,
                color: self.palette.colors.back,
                can_drill_down: false,
                extension: None,
            });
        }

        for dir in level.directories {
            nodes.push(Node {
                id: dir.clone(),
                name: dir,
                kind: NodeKind::Directory,
                size: self.palette.sizes.directory,
                color: self.palette.colors.directory,
                can_drill_down: true,
                extension: None,
            });
        }

        for file in level.files {
            let extension = extension_of(&file);
            nodes.push(Node {
                id: file.clone(),
                name: file,
                kind: NodeKind::File,
                size: self.palette.sizes.file,
                color: self.palette.file_color(extension.as_deref()),
                can_drill_down: false,
                extension,
            });
        }

        let links = star_links(&nodes);
        LevelGraph { nodes, links }
    }
}

/// Build with the embedded palette.
pub fn build(path: &TreePath, source: &NodeSource) -> LevelGraph {
    GraphBuilder::default().build(path, source)
}

fn star_links(nodes: &[Node]) -> Vec<Link> {
    if nodes.len() < 2 {
        return Vec::new();
    }
    let hub_index = usize::from(nodes[0].is_back());
    let hub = &nodes[hub_index];
    nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != hub_index)
        .map(|(_, node)| Link {
            source: hub.id.clone(),
            target: node.id.clone(),
            kind: LinkKind::Contains,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::index::FileIndex;

    fn scenario_source() -> NodeSource {
        NodeSource::Index(FileIndex::from_entries([
            "README.md",
            "src/App.js",
            "src/components/Header.js",
            "package.json",
        ]))
    }

    fn ids<'a>(nodes: impl Iterator<Item = &'a Node>) -> HashSet<String> {
        nodes.map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_scenario_root_level() {
        let graph = build(&TreePath::root(), &scenario_source());
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.links.len(), 2);
        assert!(!graph.nodes.iter().any(Node::is_back));
        assert_eq!(ids(graph.directories()), HashSet::from(["src".to_string()]));
        assert_eq!(
            ids(graph.files()),
            HashSet::from(["README.md".to_string(), "package.json".to_string()])
        );
        graph.validate().unwrap();
    }

    #[test]
    fn test_scenario_src_level() {
        let graph = build(&TreePath::parse("src"), &scenario_source());
        assert_eq!(graph.nodes.len(), 3);
        assert!(graph.nodes[0].is_back());
        assert_eq!(graph.links.len(), 2);
        assert_eq!(ids(graph.directories()), HashSet::from(["components".to_string()]));
        assert_eq!(ids(graph.files()), HashSet::from(["App.js".to_string()]));
        // Hub is the first non-back node; it also links to the back node
        assert!(graph.links.iter().all(|l| l.source == "components"));
        assert!(graph.links.iter().any(|l| l.target == BACK_ID));
        assert!(graph.links.iter().all(|l| l.source != l.target));
        graph.validate().unwrap();
    }

    #[test]
    fn test_sample_fallback_root() {
        let source = NodeSource::from_file_structure(Some(""));
        let graph = build(&TreePath::root(), &source);
        assert_eq!(
            ids(graph.directories()),
            HashSet::from(["src", "public", "docs"].map(String::from))
        );
        assert_eq!(
            ids(graph.files()),
            HashSet::from(["package.json", "README.md", ".gitignore"].map(String::from))
        );
        assert_eq!(graph.links.len(), 5);
    }

    #[test]
    fn test_node_decoration() {
        let graph = build(&TreePath::parse("src"), &scenario_source());
        let back = &graph.nodes[0];
        assert_eq!(back.size, 15.0);
        assert_eq!(back.color.to_string(), "#6c757d");
        assert!(!back.can_drill_down);

        let dir = graph.node("components").unwrap();
        assert_eq!(dir.size, 20.0);
        assert_eq!(dir.color.to_string(), "#ffd700");
        assert!(dir.can_drill_down);

        let file = graph.node("App.js").unwrap();
        assert_eq!(file.size, 12.0);
        assert_eq!(file.extension.as_deref(), Some("js"));
        assert_eq!(file.color.to_string(), "#f7df1e");
        assert!(!file.can_drill_down);
    }

    #[test]
    fn test_link_count_is_nodes_minus_one() {
        let source = NodeSource::Index(FileIndex::from_entries([
            "a/1", "a/2", "b/c/d", "x.rs", "y.md", "b/z.txt",
        ]));
        for path in ["", "a", "b", "b/c", "missing"] {
            let graph = build(&TreePath::parse(path), &source);
            assert_eq!(graph.links.len(), graph.nodes.len().saturating_sub(1), "path {path}");
            assert_eq!(graph.has_back(), !path.is_empty());
            graph.validate().unwrap();
        }
    }

    #[test]
    fn test_single_back_node_has_no_links() {
        let source = NodeSource::Index(FileIndex::from_entries(["a.rs"]));
        let graph = build(&TreePath::parse("empty"), &source);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
        assert!(graph.hub().is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let source = scenario_source();
        let path = TreePath::parse("src");
        assert_eq!(build(&path, &source), build(&path, &source));
    }

    #[test]
    fn test_neighbors_of_hub_and_leaf() {
        let graph = build(&TreePath::root(), &scenario_source());
        let hub = graph.hub().unwrap().id.clone();
        assert_eq!(graph.neighbors(&hub).len(), 2);
        assert_eq!(
            graph.neighbors("README.md"),
            HashSet::from([hub.as_str()])
        );
        assert_eq!(graph.connection_count(&hub), 2);
    }

    #[test]
    fn test_validate_catches_malformed_graphs() {
        let mut graph = build(&TreePath::parse("src"), &scenario_source());
        graph.nodes.swap(0, 1);
        assert!(matches!(graph.validate(), Err(GraphError::MisplacedBack { .. })));

        let mut graph = build(&TreePath::root(), &scenario_source());
        graph.nodes[1].size = 0.0;
        assert!(matches!(graph.validate(), Err(GraphError::InvalidSize { .. })));

        let mut graph = build(&TreePath::root(), &scenario_source());
        graph.links[0].target = "ghost".to_string();
        assert!(matches!(graph.validate(), Err(GraphError::DanglingLink { .. })));

        let mut graph = build(&TreePath::root(), &scenario_source());
        graph.links.pop();
        assert!(matches!(graph.validate(), Err(GraphError::LinkCount { .. })));
    }
}
