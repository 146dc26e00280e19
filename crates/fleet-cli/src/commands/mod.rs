//! CLI command implementations

pub mod list;
