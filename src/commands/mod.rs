//! CLI commands

pub mod clean;
pub mod index;
pub mod list;
