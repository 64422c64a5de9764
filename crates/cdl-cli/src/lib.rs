//! CDL CLI Interface
//!
//! Offline `validate`/`render`/`export`/`version` subcommands invoking
//! `cdl-core`/`cdl-encoders` directly (C11, §10.1) — no HTTP server
//! required.

pub mod commands;
pub mod error;
pub mod output;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cdl-cli")]
#[command(about = "Crystal Description Language command-line tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a CDL expression and report its parse tree
    Validate {
        /// CDL expression, or '-' to read from stdin
        cdl: String,
    },

    /// Render a CDL expression to an orthographic SVG
    Render {
        /// CDL expression, or '-' to read from stdin
        cdl: String,
        #[arg(long, default_value_t = 30.0)]
        elev: f64,
        #[arg(long, default_value_t = -45.0)]
        azim: f64,
        #[arg(long, default_value_t = 300)]
        width: u32,
        #[arg(long, default_value_t = 300)]
        height: u32,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a CDL expression's geometry to a mesh file
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ExportFormat {
    /// ASCII STL, fan-triangulated
    Stl {
        /// CDL expression, or '-' to read from stdin
        cdl: String,
        #[arg(long, default_value_t = 10.0)]
        scale: f64,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// glTF 2.0 JSON with an embedded base64 buffer
    Gltf {
        /// CDL expression, or '-' to read from stdin
        cdl: String,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve a CDL argument: the literal text, or the contents of stdin if
/// the argument is exactly `-`.
pub fn read_cdl_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_cdl_arg_passes_through_literal_text() {
        assert_eq!(read_cdl_arg("cubic[m3m]:{100}@1").unwrap(), "cubic[m3m]:{100}@1");
    }
}
