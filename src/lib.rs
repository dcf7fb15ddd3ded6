//! codeatlas library crate
//!
//! Exposes core modules so benchmarks and the binary can exercise the
//! file-tree graph without going through CLI startup.

pub mod analysis;
pub mod app;
pub mod config;
pub mod explorer;
pub mod github;
pub mod layout;
pub mod logging;
pub mod tree;
pub mod ui;
