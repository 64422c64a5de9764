//! ASCII STL encoder (§6).

use cdl_core::geometry::{CrystalGeometry, Vec3};
use std::fmt::Write as _;

/// Fan-triangulate each face from vertex 0 and emit ASCII STL, with every
/// vertex coordinate multiplied by `scale` (caller clamps to `[1, 100]`
/// per the `/api/export/stl` contract).
pub fn export_stl(geom: &CrystalGeometry, scale: f64) -> String {
    tracing::debug!(faces = geom.faces.len(), scale, "encoding STL");
    let mut out = String::from("solid crystal\n");

    for face in &geom.faces {
        if face.vertices.len() < 3 {
            continue;
        }
        let scaled: Vec<Vec3> = face.vertices.iter().map(|v| v.scale(scale)).collect();
        for tri in 1..scaled.len() - 1 {
            write_triangle(&mut out, &face.normal, &scaled[0], &scaled[tri], &scaled[tri + 1]);
        }
    }

    out.push_str("endsolid crystal\n");
    out
}

fn write_triangle(out: &mut String, normal: &Vec3, a: &Vec3, b: &Vec3, c: &Vec3) {
    let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", normal.x, normal.y, normal.z);
    out.push_str("    outer loop\n");
    for v in [a, b, c] {
        let _ = writeln!(out, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z);
    }
    out.push_str("    endloop\n");
    out.push_str("  endfacet\n");
}
