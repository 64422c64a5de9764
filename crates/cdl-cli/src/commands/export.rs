//! `export stl` / `export gltf` commands: mesh export to stdout or a file.

use crate::output::print_success;
use crate::{read_cdl_arg, Error, Result};
use cdl_encoders::{export_gltf as encode_gltf, export_stl as encode_stl, GltfOptions};
use std::path::PathBuf;

pub fn stl(cdl: &str, scale: f64, output: Option<PathBuf>) -> Result<()> {
    let cdl = read_cdl_arg(cdl)?;
    let out = cdl_core::pipeline::run(&cdl)?;
    for w in &out.warnings {
        println!("warning: {w}");
    }

    let stl = encode_stl(&out.geometry, scale.clamp(1.0, 100.0));
    match output {
        Some(path) => {
            std::fs::write(&path, &stl).map_err(|e| Error::Other(e.to_string()))?;
            print_success(&format!("wrote {}", path.display()));
        }
        None => println!("{stl}"),
    }
    Ok(())
}

pub fn gltf(cdl: &str, scale: f64, output: Option<PathBuf>) -> Result<()> {
    let cdl = read_cdl_arg(cdl)?;
    let out = cdl_core::pipeline::run(&cdl)?;
    for w in &out.warnings {
        println!("warning: {w}");
    }

    let doc = encode_gltf(&out.geometry, GltfOptions { scale: scale.clamp(0.1, 10.0) });
    let text = serde_json::to_string_pretty(&doc).map_err(|e| Error::Other(e.to_string()))?;
    match output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| Error::Other(e.to_string()))?;
            print_success(&format!("wrote {}", path.display()));
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stl_export_roundtrips_through_a_temp_file() {
        let path = std::env::temp_dir().join("cdl-cli-export-test.stl");
        stl("cubic[m3m]:{100}@1", 10.0, Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("solid crystal"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn gltf_export_roundtrips_through_a_temp_file() {
        let path = std::env::temp_dir().join("cdl-cli-export-test.gltf");
        gltf("cubic[m3m]:{111}@1", 1.0, Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"version\": \"2.0\""));
        let _ = std::fs::remove_file(&path);
    }
}
