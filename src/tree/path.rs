//! Drill-down location and breadcrumb trail

use std::fmt;

/// Label of the synthetic first breadcrumb
pub const ROOT_LABEL: &str = "Root";

/// Ordered directory segments; empty means the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `a/b/c`. Empty segments (leading, trailing or doubled slashes) are ignored.
    pub fn parse(text: &str) -> Self {
        Self::from_segments(text.split('/').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segments joined with `/`; empty string at the root.
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &TreePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// One crumb per prefix, starting with the root crumb.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = Vec::with_capacity(self.segments.len() + 1);
        crumbs.push(Breadcrumb {
            label: ROOT_LABEL.to_string(),
            path: TreePath::root(),
        });
        for i in 0..self.segments.len() {
            crumbs.push(Breadcrumb {
                label: self.segments[i].clone(),
                path: Self {
                    segments: self.segments[..=i].to_vec(),
                },
            });
        }
        crumbs
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.joined())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub path: TreePath,
}

/// Owns the current path; every successful move replaces it wholesale.
///
/// The navigator does not know which directories exist. Callers check a
/// name against the current level before calling [`Navigator::navigate_into`].
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    path: TreePath,
    breadcrumbs: Vec<Breadcrumb>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::at(TreePath::root())
    }

    pub fn at(path: TreePath) -> Self {
        let breadcrumbs = path.breadcrumbs();
        Self { path, breadcrumbs }
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    /// Append `name`. Returns false (and changes nothing) for names that can
    /// never be a path segment.
    pub fn navigate_into(&mut self, name: &str) -> bool {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            tracing::warn!(name, "refusing to navigate into invalid segment");
            return false;
        }
        let next = self.path.child(name);
        self.replace(next);
        true
    }

    /// Drop the last segment. No-op at the root.
    pub fn navigate_back(&mut self) -> bool {
        match self.path.parent() {
            Some(parent) => {
                self.replace(parent);
                true
            }
            None => false,
        }
    }

    /// Jump to a breadcrumb. `target` must be a prefix of (or equal to) the current path.
    pub fn navigate_to(&mut self, target: &TreePath) -> bool {
        if !target.is_prefix_of(&self.path) {
            tracing::warn!(target = %target, current = %self.path, "breadcrumb target is not a prefix");
            return false;
        }
        self.replace(target.clone());
        true
    }

    /// Reset to the root (new analysis).
    pub fn reset(&mut self) {
        self.replace(TreePath::root());
    }

    fn replace(&mut self, path: TreePath) {
        self.breadcrumbs = path.breadcrumbs();
        self.path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_join() {
        let path = TreePath::parse("/src//components/");
        assert_eq!(path.segments(), &["src".to_string(), "components".to_string()]);
        assert_eq!(path.joined(), "src/components");
        assert_eq!(TreePath::root().joined(), "");
        assert_eq!(TreePath::root().to_string(), "/");
    }

    #[test]
    fn test_breadcrumb_length_tracks_depth() {
        for depth in 0..5 {
            let path = TreePath::from_segments((0..depth).map(|i| format!("d{}", i)));
            assert_eq!(path.breadcrumbs().len(), depth + 1);
        }
    }

    #[test]
    fn test_breadcrumbs_are_prefixes() {
        let crumbs = TreePath::parse("src/components").breadcrumbs();
        assert_eq!(crumbs[0].label, "Root");
        assert!(crumbs[0].path.is_root());
        assert_eq!(crumbs[1].label, "src");
        assert_eq!(crumbs[1].path, TreePath::parse("src"));
        assert_eq!(crumbs[2].path, TreePath::parse("src/components"));
    }

    #[test]
    fn test_into_then_back_round_trips() {
        let mut nav = Navigator::at(TreePath::parse("src"));
        let before = nav.path().clone();
        assert!(nav.navigate_into("components"));
        assert!(nav.navigate_back());
        assert_eq!(nav.path(), &before);
        assert_eq!(nav.breadcrumbs().len(), 2);
    }

    #[test]
    fn test_back_at_root_is_noop() {
        let mut nav = Navigator::new();
        assert!(!nav.navigate_back());
        assert!(nav.path().is_root());
        assert_eq!(nav.breadcrumbs().len(), 1);
    }

    #[test]
    fn test_navigate_to_breadcrumb_skips_levels() {
        let mut nav = Navigator::at(TreePath::parse("src/components"));
        assert!(nav.navigate_to(&TreePath::parse("src")));
        assert_eq!(nav.path(), &TreePath::parse("src"));
        let labels: Vec<_> = nav.breadcrumbs().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Root", "src"]);
    }

    #[test]
    fn test_navigate_to_rejects_non_prefix() {
        let mut nav = Navigator::at(TreePath::parse("src/components"));
        assert!(!nav.navigate_to(&TreePath::parse("docs")));
        assert_eq!(nav.path(), &TreePath::parse("src/components"));
    }

    #[test]
    fn test_navigate_into_rejects_invalid_segments() {
        let mut nav = Navigator::new();
        assert!(!nav.navigate_into(""));
        assert!(!nav.navigate_into(".."));
        assert!(!nav.navigate_into("a/b"));
        assert!(nav.path().is_root());
    }
}
