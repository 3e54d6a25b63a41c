//! CLI subcommands

pub mod apps;
pub mod nodes;
pub mod scan;
