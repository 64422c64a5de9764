//! Twin law table and composer (C8).

use crate::geometry::{intersect_halfspaces, CrystalGeometry, Face, HalfspaceSet, Matrix3x3, Vec3};

/// The crystallographic classification of a twin law, carried through for
/// informational purposes (not used by the render algorithm itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwinType {
    Contact,
    Penetration,
    Cyclic,
}

/// How a twin law's two (or more) individuals are combined into one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    SingleCrystal,
    DualCrystal,
    VShaped,
    ContactRotation,
    Cyclic,
    Unified,
}

/// One row of Table T (§4.8).
#[derive(Debug, Clone)]
pub struct TwinLaw {
    pub name: &'static str,
    pub twin_type: TwinType,
    pub render_mode: RenderMode,
    pub axis: (i32, i32, i32),
    pub angle_deg: f64,
}

/// The Japan-twin angle, 84° 33′ 30″, expressed in decimal degrees.
const JAPAN_ANGLE_DEG: f64 = 84.0 + 33.0 / 60.0 + 30.0 / 3600.0;

/// Table T, the fourteen enumerated twin laws (§4.8).
pub const TWIN_LAWS: &[TwinLaw] = &[
    TwinLaw {
        name: "spinel",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::ContactRotation,
        axis: (1, 1, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "iron_cross",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (0, 0, 1),
        angle_deg: 90.0,
    },
    TwinLaw {
        name: "carlsbad",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (0, 0, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "albite",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::ContactRotation,
        axis: (0, 1, 0),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "brazil",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (1, 1, 0),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "dauphine",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::SingleCrystal,
        axis: (0, 0, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "japan",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::VShaped,
        axis: (1, 1, -2),
        angle_deg: JAPAN_ANGLE_DEG,
    },
    TwinLaw {
        name: "trilling",
        twin_type: TwinType::Cyclic,
        render_mode: RenderMode::Cyclic,
        axis: (0, 0, 1),
        angle_deg: 120.0,
    },
    TwinLaw {
        name: "fluorite",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (1, 1, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "staurolite_60",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (0, 0, 1),
        angle_deg: 60.0,
    },
    TwinLaw {
        name: "staurolite_90",
        twin_type: TwinType::Penetration,
        render_mode: RenderMode::DualCrystal,
        axis: (0, 0, 1),
        angle_deg: 90.0,
    },
    TwinLaw {
        name: "manebach",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::ContactRotation,
        axis: (0, 0, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "baveno",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::ContactRotation,
        axis: (0, 2, 1),
        angle_deg: 180.0,
    },
    TwinLaw {
        name: "gypsum_swallow",
        twin_type: TwinType::Contact,
        render_mode: RenderMode::VShaped,
        axis: (1, 0, 0),
        angle_deg: 180.0,
    },
];

/// Normalize a twin-law name for lookup: lowercase, non-word separators
/// (anything but `[a-z0-9]`) collapsed away (§4.8: "non-word separators
/// ignored").
fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Look up a twin law by name, case-insensitive with non-word separators
/// ignored.
pub fn lookup(name: &str) -> Option<&'static TwinLaw> {
    let needle = normalize_name(name);
    TWIN_LAWS
        .iter()
        .find(|law| normalize_name(law.name) == needle)
}

fn axis_unit(law: &TwinLaw) -> Vec3 {
    let (h, k, l) = law.axis;
    Vec3::new(h as f64, k as f64, l as f64).normalize()
}

fn rotation_of(law: &TwinLaw) -> Matrix3x3 {
    Matrix3x3::axis_angle(&axis_unit(law), law.angle_deg.to_radians())
}

fn rotate_geometry(geom: &CrystalGeometry, rot: &Matrix3x3) -> CrystalGeometry {
    CrystalGeometry {
        vertices: geom.vertices.iter().map(|v| rot.apply(v)).collect(),
        faces: geom
            .faces
            .iter()
            .map(|f| Face {
                vertices: f.vertices.iter().map(|v| rot.apply(v)).collect(),
                normal: rot.apply(&f.normal),
                miller_index: f.miller_index,
            })
            .collect(),
        edges: geom.edges.clone(),
    }
}

/// Reflect a mesh across the plane through the origin with unit normal
/// `axis`: `n' = n - 2(n.axis)axis` for normals, and the analogous point
/// reflection for vertices; face winding is reversed to keep outward CCW
/// orientation.
fn reflect_geometry(geom: &CrystalGeometry, axis: &Vec3) -> CrystalGeometry {
    let reflect_point = |v: &Vec3| -> Vec3 {
        let d = v.dot(axis);
        v.sub(&axis.scale(2.0 * d))
    };
    CrystalGeometry {
        vertices: geom.vertices.iter().map(reflect_point).collect(),
        faces: geom
            .faces
            .iter()
            .map(|f| {
                let mut vertices: Vec<Vec3> = f.vertices.iter().map(reflect_point).collect();
                vertices.reverse();
                let d = f.normal.dot(axis);
                let normal = f.normal.sub(&axis.scale(2.0 * d));
                Face {
                    vertices,
                    normal,
                    miller_index: f.miller_index,
                }
            })
            .collect(),
        edges: geom.edges.clone(),
    }
}

/// Compose the twinned mesh for `law` from the base half-space set `h`
/// (§4.8's render-mode algorithms).
pub fn compose(law: &TwinLaw, h: &HalfspaceSet) -> CrystalGeometry {
    let axis = axis_unit(law);
    let rot = rotation_of(law);

    match law.render_mode {
        RenderMode::SingleCrystal => intersect_halfspaces(h),

        RenderMode::DualCrystal | RenderMode::Unified => {
            let m1 = intersect_halfspaces(h);
            let m2 = intersect_halfspaces(&h.rotated(&rot));
            m1.union(m2)
        }

        RenderMode::ContactRotation => {
            let clipped = h.with_plane(axis.scale(-1.0), 0.0);
            let m1 = intersect_halfspaces(&clipped);
            let m2 = rotate_geometry(&m1, &rot);
            m1.union(m2)
        }

        RenderMode::VShaped => {
            if (law.angle_deg - 180.0).abs() < 1e-9 {
                let clipped = h.with_plane(axis.scale(-1.0), 0.0);
                let m1 = intersect_halfspaces(&clipped);
                let m2 = reflect_geometry(&m1, &axis);
                m1.union(m2)
            } else {
                let clipped1 = h.with_plane(axis.scale(-1.0), 0.0);
                let m1 = intersect_halfspaces(&clipped1);
                let clipped2 = h.with_plane(axis, 0.0);
                let m2 = intersect_halfspaces(&clipped2);
                let m2 = rotate_geometry(&m2, &rot);
                m1.union(m2)
            }
        }

        RenderMode::Cyclic => {
            let k = (360.0 / law.angle_deg).round() as usize;
            let mut union_h = HalfspaceSet::new();
            for i in 0..k {
                let step_angle = (i as f64) * law.angle_deg;
                let step_rot = Matrix3x3::axis_angle(&axis, step_angle.to_radians());
                union_h = union_h.extended(&h.rotated(&step_rot));
            }
            intersect_halfspaces(&union_h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_halfspaces() -> HalfspaceSet {
        let mut h = HalfspaceSet::new();
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
        h
    }

    fn octahedron_halfspaces() -> HalfspaceSet {
        let mut h = HalfspaceSet::new();
        for (x, y, z) in [
            (1.0, 1.0, 1.0),
            (1.0, 1.0, -1.0),
            (1.0, -1.0, 1.0),
            (1.0, -1.0, -1.0),
            (-1.0, 1.0, 1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (-1.0, -1.0, -1.0),
        ] {
            h.push(Vec3::new(x, y, z), 1.0 / 3.0f64.sqrt());
        }
        h
    }

    #[test]
    fn lookup_is_case_insensitive_and_separator_tolerant() {
        assert!(lookup("Spinel").is_some());
        assert!(lookup("SPINEL").is_some());
        assert!(lookup("spi_nel").is_some());
        assert!(lookup("no_such_law").is_none());
    }

    #[test]
    fn all_fourteen_laws_are_registered() {
        assert_eq!(TWIN_LAWS.len(), 14);
    }

    #[test]
    fn japan_angle_matches_dms_conversion() {
        let law = lookup("japan").unwrap();
        assert!((law.angle_deg - 84.558333333).abs() < 1e-6);
    }

    #[test]
    fn single_crystal_mode_returns_base_mesh() {
        let h = cube_halfspaces();
        let base = intersect_halfspaces(&h);
        let law = lookup("dauphine").unwrap();
        let twinned = compose(law, &h);
        assert_eq!(twinned.faces.len(), base.faces.len());
        assert_eq!(twinned.vertices.len(), base.vertices.len());
    }

    #[test]
    fn dual_crystal_mode_doubles_face_count() {
        let h = cube_halfspaces();
        let base = intersect_halfspaces(&h);
        let law = lookup("carlsbad").unwrap();
        let twinned = compose(law, &h);
        assert_eq!(twinned.faces.len(), base.faces.len() * 2);
    }

    #[test]
    fn contact_rotation_spinel_on_octahedron_has_sixteen_faces() {
        // cubic[m3m]:{111}@1 twinned by spinel (the spec's S5 scenario):
        // each clipped half produces 4 faces, doubled by the rotated copy.
        let h = octahedron_halfspaces();
        let law = lookup("spinel").unwrap();
        let twinned = compose(law, &h);
        assert_eq!(twinned.faces.len(), 16);
    }

    #[test]
    fn cyclic_trilling_uses_three_fold_union() {
        let h = cube_halfspaces();
        let law = lookup("trilling").unwrap();
        let twinned = compose(law, &h);
        assert!(!twinned.faces.is_empty());
        assert!(is_roughly_convex(&twinned));
    }

    fn is_roughly_convex(geom: &CrystalGeometry) -> bool {
        geom.faces.iter().all(|f| f.vertices.len() >= 3)
    }
}
