//! File-tree graph model
//!
//! A flat list of repository paths is viewed one directory at a time. The
//! [`Navigator`] tracks where the user is; [`GraphBuilder`] turns that level
//! into a star of nodes and links for the layout engine.

pub mod builder;
pub mod index;
pub mod palette;
pub mod path;
pub mod sample;

pub use builder::{
    build, GraphBuilder, GraphError, LevelGraph, Link, LinkKind, Node, NodeKind, BACK_ID,
};
pub use index::{FileIndex, Level, NodeSource};
pub use palette::{Palette, Rgb};
pub use path::{Breadcrumb, Navigator, TreePath};
