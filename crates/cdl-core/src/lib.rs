//! CDL Core Library
//!
//! The Crystal Description Language pipeline: lexing, preprocessing,
//! parsing, lattice/symmetry expansion, half-space intersection, twin
//! composition and axial post-scaling. Pure computation — no I/O, no
//! HTTP, no CLI wiring; those live in `cdl-api` and `cdl-cli`.

pub mod ast;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod lexer;
pub mod modifiers;
pub mod parser;
pub mod pipeline;
pub mod preprocessor;
pub mod symmetry;
pub mod twin;

pub use error::{Error, Result, Warning};
pub use pipeline::{run, PipelineOutput};

/// Version of the CDL platform.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
