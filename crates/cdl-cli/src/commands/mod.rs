//! CLI subcommand implementations, one module per `Commands` variant.

pub mod export;
pub mod render;
pub mod validate;
pub mod version;
