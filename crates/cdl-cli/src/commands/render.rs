//! `render` command: orthographic SVG, to stdout or a file.

use crate::output::print_success;
use crate::{read_cdl_arg, Error, Result};
use cdl_encoders::{export_svg, RenderOptions};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    cdl: &str,
    elev: f64,
    azim: f64,
    width: u32,
    height: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let cdl = read_cdl_arg(cdl)?;
    let out = cdl_core::pipeline::run(&cdl)?;
    for w in &out.warnings {
        println!("warning: {w}");
    }

    let svg = export_svg(&out.geometry, RenderOptions { elev, azim, width, height });
    match output {
        Some(path) => {
            std::fs::write(&path, &svg).map_err(|e| Error::Other(e.to_string()))?;
            print_success(&format!("wrote {}", path.display()));
        }
        None => println!("{svg}"),
    }
    Ok(())
}
