//! Subcommand implementations.

pub mod bootstrap;
pub mod migrate;
pub mod seed;
