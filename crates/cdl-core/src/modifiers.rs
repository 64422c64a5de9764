//! Axial scaling modifier applier (C7).

use crate::ast::{Axis, ModificationKind, ModificationSpec};
use crate::geometry::{CrystalGeometry, Face, Vec3};

/// Per-axis multiplicative scale factors collapsed from a
/// `ModificationSpec` list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialFactors {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl AxialFactors {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
        }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }
}

/// Collapse an ordered `ModificationSpec` list into `(sa, sb, sc)`.
/// `flatten(ax:f)` contributes `1/f`; `elongate`/`scale` contribute `f`
/// directly. Later specs on the same axis multiply onto earlier ones.
pub fn collapse_modifications(mods: &[ModificationSpec]) -> AxialFactors {
    let mut factors = AxialFactors::identity();
    for m in mods {
        let contribution = match m.kind {
            ModificationKind::Flatten => 1.0 / m.factor,
            ModificationKind::Elongate | ModificationKind::Scale => m.factor,
        };
        match m.axis {
            Axis::A => factors.a *= contribution,
            Axis::B => factors.b *= contribution,
            Axis::C => factors.c *= contribution,
        }
    }
    factors
}

/// Post-computation vertex scaling (§4.7): multiply vertex coordinates by
/// the axial factors, recompute each face's normal from its (now scaled)
/// first three vertices, and leave the edge list untouched.
pub fn apply_post_scaling(geom: &CrystalGeometry, factors: AxialFactors) -> CrystalGeometry {
    let scale = factors.as_vec3();
    let vertices: Vec<Vec3> = geom.vertices.iter().map(|v| v.mul_components(&scale)).collect();

    let faces: Vec<Face> = geom
        .faces
        .iter()
        .map(|face| {
            let scaled_vertices: Vec<Vec3> = face
                .vertices
                .iter()
                .map(|v| v.mul_components(&scale))
                .collect();
            let normal = if scaled_vertices.len() >= 3 {
                let e1 = scaled_vertices[1].sub(&scaled_vertices[0]);
                let e2 = scaled_vertices[2].sub(&scaled_vertices[0]);
                e1.cross(&e2).normalize()
            } else {
                face.normal
            };
            Face {
                vertices: scaled_vertices,
                normal,
                miller_index: face.miller_index,
            }
        })
        .collect();

    CrystalGeometry {
        vertices,
        faces,
        edges: geom.edges.clone(),
    }
}

/// Anisotropic half-space pre-scaling (§4.7): retained as an optional input
/// transformation, not used on the reference's render path (which applies
/// post-computation scaling after twin composition instead).
pub fn prescale_halfspace(
    normal: &Vec3,
    distance: f64,
    factors: AxialFactors,
) -> (Vec3, f64) {
    let scaled = Vec3::new(
        normal.x / factors.a,
        normal.y / factors.b,
        normal.z / factors.c,
    );
    let mag = scaled.magnitude();
    (scaled.normalize(), distance / mag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_twice_equals_scale_by_inverse_square() {
        let flattened_twice = collapse_modifications(&[
            ModificationSpec {
                kind: ModificationKind::Flatten,
                axis: Axis::C,
                factor: 2.0,
            },
            ModificationSpec {
                kind: ModificationKind::Flatten,
                axis: Axis::C,
                factor: 2.0,
            },
        ]);
        let scaled_by_inverse_square = collapse_modifications(&[ModificationSpec {
            kind: ModificationKind::Scale,
            axis: Axis::C,
            factor: 1.0 / 4.0,
        }]);
        assert!((flattened_twice.c - scaled_by_inverse_square.c).abs() < 1e-12);
    }

    #[test]
    fn flatten_is_inverse_of_elongate() {
        let factors = collapse_modifications(&[ModificationSpec {
            kind: ModificationKind::Flatten,
            axis: Axis::A,
            factor: 3.0,
        }]);
        assert!((factors.a - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn post_scaling_preserves_edge_list_and_scales_vertices() {
        let mut h = crate::geometry::HalfspaceSet::new();
        for (x, y, z) in [
            (1.0, 0.0, 0.0),
            (-1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, -1.0, 0.0),
            (0.0, 0.0, 1.0),
            (0.0, 0.0, -1.0),
        ] {
            h.push(Vec3::new(x, y, z), 1.0);
        }
        let geom = crate::geometry::intersect_halfspaces(&h);
        let scaled = apply_post_scaling(
            &geom,
            AxialFactors {
                a: 2.0,
                b: 1.0,
                c: 1.0,
            },
        );
        assert_eq!(scaled.edges, geom.edges);
        let max_x = scaled
            .vertices
            .iter()
            .map(|v| v.x.abs())
            .fold(0.0, f64::max);
        assert!((max_x - 2.0).abs() < 1e-9);
    }
}
