//! 3D vectors, half-space sets and the face-clipping polyhedron builder (C6).

use serde::{Deserialize, Serialize};

/// 3D vector, used both for lattice/reciprocal-basis arithmetic and for
/// mesh vertices/normals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Vec3 = Vec3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        let mag = self.magnitude();
        Vec3::new(self.x / mag, self.y / mag, self.z / mag)
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, scalar: f64) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Componentwise product, used for anisotropic axial scaling.
    pub fn mul_components(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Six-decimal string key used to deduplicate vertices.
    pub fn dedup_key(&self) -> String {
        format!("{:.6},{:.6},{:.6}", self.x, self.y, self.z)
    }
}

/// 3x3 matrix, used for symmetry operations and twin rotations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Matrix3x3 {
    pub data: [[f64; 3]; 3],
}

impl Matrix3x3 {
    pub fn identity() -> Self {
        Self {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rodrigues' rotation matrix for a unit axis and an angle in radians.
    pub fn axis_angle(axis: &Vec3, angle_rad: f64) -> Self {
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;
        Self {
            data: [
                [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
                [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
                [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
            ],
        }
    }

    /// Reflection across the plane through the origin with unit normal `n`:
    /// `R = I - 2 n n^T`.
    pub fn reflection(n: &Vec3) -> Self {
        Self {
            data: [
                [1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z],
                [-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z],
                [-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z],
            ],
        }
    }

    pub fn apply(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2] * v.z,
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2] * v.z,
            self.data[2][0] * v.x + self.data[2][1] * v.y + self.data[2][2] * v.z,
        )
    }

    pub fn multiply(&self, other: &Matrix3x3) -> Matrix3x3 {
        let mut result = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result[i][j] += self.data[i][k] * other.data[k][j];
                }
            }
        }
        Matrix3x3 { data: result }
    }

    /// Entry-wise equality within `tol`, used for group-closure dedup.
    pub fn approx_eq(&self, other: &Matrix3x3, tol: f64) -> bool {
        for i in 0..3 {
            for j in 0..3 {
                if (self.data[i][j] - other.data[i][j]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// Parallel-array representation of an intersection of half-spaces
/// `{x : n_i . x <= d_i}`. Normals are unit length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfspaceSet {
    pub normals: Vec<Vec3>,
    pub distances: Vec<f64>,
}

impl HalfspaceSet {
    pub fn new() -> Self {
        Self {
            normals: Vec::new(),
            distances: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    pub fn push(&mut self, normal: Vec3, distance: f64) {
        self.normals.push(normal.normalize());
        self.distances.push(distance);
    }

    /// Every half-space rotated by `rot` (normals only — distances are
    /// rotation-invariant since the planes pass through origin-scaled
    /// offsets along the rotated normal).
    pub fn rotated(&self, rot: &Matrix3x3) -> HalfspaceSet {
        HalfspaceSet {
            normals: self.normals.iter().map(|n| rot.apply(n)).collect(),
            distances: self.distances.clone(),
        }
    }

    /// Concatenate another half-space set's planes onto this one.
    pub fn extended(&self, other: &HalfspaceSet) -> HalfspaceSet {
        let mut normals = self.normals.clone();
        let mut distances = self.distances.clone();
        normals.extend(other.normals.iter().cloned());
        distances.extend(other.distances.iter().cloned());
        HalfspaceSet { normals, distances }
    }

    /// A copy with one additional half-space appended.
    pub fn with_plane(&self, normal: Vec3, distance: f64) -> HalfspaceSet {
        let mut out = self.clone();
        out.push(normal, distance);
        out
    }
}

impl Default for HalfspaceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// A planar polygon face of the output mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<Vec3>,
    pub normal: Vec3,
    pub miller_index: Option<crate::ast::MillerIndex>,
}

/// The polyhedral mesh produced by the intersector (and, for twins, by the
/// composer's union of multiple intersections).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrystalGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub edges: Vec<(usize, usize)>,
}

impl CrystalGeometry {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vec3::ZERO, |acc, v| acc.add(v));
        sum.scale(1.0 / self.vertices.len() as f64)
    }

    /// Union two meshes by concatenating vertices/faces and shifting the
    /// second mesh's edge indices by the first mesh's vertex count (§4.8).
    /// Vertices are *not* deduplicated across the union — twin composition
    /// deliberately keeps both crystals' geometry distinct.
    pub fn union(mut self, other: CrystalGeometry) -> CrystalGeometry {
        let offset = self.vertices.len();
        self.vertices.extend(other.vertices);
        self.faces.extend(other.faces);
        self.edges
            .extend(other.edges.into_iter().map(|(a, b)| (a + offset, b + offset)));
        self
    }
}

const CLIP_EPS: f64 = 1e-8;
const INITIAL_POLYGON_RADIUS: f64 = 10.0;
const DEDUP_DECIMALS_TOL: f64 = 1e-6;

/// Build the convex polyhedron `P = intersection_i {x : n_i . x <= d_i}`
/// using face-clipping (§4.6).
pub fn intersect_halfspaces(h: &HalfspaceSet) -> CrystalGeometry {
    let n = h.len();
    let mut faces = Vec::new();

    for i in 0..n {
        let ni = h.normals[i];
        let di = h.distances[i];

        let (t, b) = tangent_basis(&ni);
        let center = ni.scale(di);
        let s = INITIAL_POLYGON_RADIUS;
        let mut polygon = vec![
            center.add(&t.scale(s)).add(&b.scale(s)),
            center.sub(&t.scale(s)).add(&b.scale(s)),
            center.sub(&t.scale(s)).sub(&b.scale(s)),
            center.add(&t.scale(s)).sub(&b.scale(s)),
        ];

        for j in 0..n {
            if j == i {
                continue;
            }
            polygon = clip_polygon(&polygon, &h.normals[j], h.distances[j]);
            if polygon.len() < 3 {
                break;
            }
        }

        if polygon.len() < 3 {
            continue;
        }

        let candidate_normal = face_normal(&polygon);
        if candidate_normal.dot(&ni) < 0.0 {
            polygon.reverse();
        }

        faces.push(Face {
            vertices: polygon,
            normal: ni,
            miller_index: None,
        });
    }

    build_mesh_from_faces(faces)
}

/// Assemble a [`CrystalGeometry`] from a face list, deduplicating vertices
/// by their 6-decimal key and the edge set by unordered endpoint pairs.
pub fn build_mesh_from_faces(faces: Vec<Face>) -> CrystalGeometry {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut index_of: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut edges: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();

    let mut index_for = |v: &Vec3, vertices: &mut Vec<Vec3>| -> usize {
        let key = v.dedup_key();
        if let Some(&idx) = index_of.get(&key) {
            idx
        } else {
            let idx = vertices.len();
            vertices.push(*v);
            index_of.insert(key, idx);
            idx
        }
    };

    for face in &faces {
        let idxs: Vec<usize> = face
            .vertices
            .iter()
            .map(|v| index_for(v, &mut vertices))
            .collect();
        for k in 0..idxs.len() {
            let a = idxs[k];
            let b = idxs[(k + 1) % idxs.len()];
            let edge = if a < b { (a, b) } else { (b, a) };
            edges.insert(edge);
        }
    }

    let mut edges: Vec<(usize, usize)> = edges.into_iter().collect();
    edges.sort_unstable();

    CrystalGeometry {
        vertices,
        faces,
        edges,
    }
}

fn tangent_basis(n: &Vec3) -> (Vec3, Vec3) {
    let t = if n.y.abs() < 0.9 {
        n.cross(&Vec3::Y).normalize()
    } else {
        n.cross(&Vec3::X).normalize()
    };
    let b = n.cross(&t);
    (t, b)
}

fn face_normal(polygon: &[Vec3]) -> Vec3 {
    let e1 = polygon[1].sub(&polygon[0]);
    let e2 = polygon[2].sub(&polygon[0]);
    e1.cross(&e2).normalize()
}

/// Sutherland-Hodgman clip of `polygon` against the half-space
/// `{x : n . x <= d}`.
fn clip_polygon(polygon: &[Vec3], n: &Vec3, d: f64) -> Vec<Vec3> {
    if polygon.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(polygon.len() + 1);
    let count = polygon.len();
    for idx in 0..count {
        let u = polygon[idx];
        let v = polygon[(idx + 1) % count];
        let du = n.dot(&u) - d;
        let dv = n.dot(&v) - d;

        if du <= CLIP_EPS {
            out.push(u);
        }
        if (du > CLIP_EPS && dv < -CLIP_EPS) || (du < -CLIP_EPS && dv > CLIP_EPS) {
            let t = du / (du - dv);
            out.push(u.add(&v.sub(&u).scale(t)));
        }
    }
    out
}

/// True if every vertex in `geom` satisfies every half-space in `h` within
/// tolerance — testable property 5 (§8).
pub fn is_convex_and_within(geom: &CrystalGeometry, h: &HalfspaceSet) -> bool {
    for v in &geom.vertices {
        for i in 0..h.len() {
            if h.normals[i].dot(v) > h.distances[i] + 1e-6 {
                return false;
            }
        }
    }
    true
}

/// Reject `candidate` as a duplicate of any normal already in `existing` iff
/// the dot product is within `1e-3` of 1 and the distances match within
/// `1e-3` (§4.5 dedup rule).
pub fn is_duplicate_normal(
    candidate: (&Vec3, f64),
    existing: &[(Vec3, f64)],
) -> bool {
    existing.iter().any(|(n, d)| {
        (candidate.0.dot(n) - 1.0).abs() < 1e-3 && (candidate.1 - d).abs() < 1e-3
    })
}

pub const DEDUP_TOL: f64 = DEDUP_DECIMALS_TOL;

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

    #[test]
    fn unit_cube_has_8_vertices_6_faces_12_edges() {
        let h = cube_halfspaces();
        let geom = intersect_halfspaces(&h);
        assert_eq!(geom.faces.len(), 6);
        assert_eq!(geom.vertices.len(), 8);
        assert_eq!(geom.edges.len(), 12);
        for v in &geom.vertices {
            assert!((v.x.abs() - 1.0).abs() < 1e-6);
            assert!((v.y.abs() - 1.0).abs() < 1e-6);
            assert!((v.z.abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_is_within_every_halfspace() {
        let h = cube_halfspaces();
        let geom = intersect_halfspaces(&h);
        assert!(is_convex_and_within(&geom, &h));
    }

    #[test]
    fn face_normals_point_outward_from_centroid() {
        let h = cube_halfspaces();
        let geom = intersect_halfspaces(&h);
        let centroid = geom.centroid();
        for face in &geom.faces {
            let face_centroid = face
                .vertices
                .iter()
                .fold(Vec3::ZERO, |acc, v| acc.add(v))
                .scale(1.0 / face.vertices.len() as f64);
            let outward = face_centroid.sub(&centroid);
            assert!(face.normal.dot(&outward) >= -1e-9);
        }
    }

    #[test]
    fn octahedron_from_111_family() {
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
        let geom = intersect_halfspaces(&h);
        assert_eq!(geom.faces.len(), 8);
        assert_eq!(geom.vertices.len(), 6);
    }

    #[test]
    fn edge_count_matches_half_the_sum_of_face_sizes() {
        let h = cube_halfspaces();
        let geom = intersect_halfspaces(&h);
        let sum: usize = geom.faces.iter().map(|f| f.vertices.len()).sum();
        assert_eq!(geom.edges.len(), sum / 2);
    }

    #[test]
    fn reflection_matrix_is_involution() {
        let n = Vec3::new(1.0, 1.0, 1.0).normalize();
        let r = Matrix3x3::reflection(&n);
        let v = Vec3::new(0.3, -0.7, 1.1);
        let once = r.apply(&v);
        let twice = r.apply(&once);
        assert!((twice.x - v.x).abs() < 1e-9);
        assert!((twice.y - v.y).abs() < 1e-9);
        assert!((twice.z - v.z).abs() < 1e-9);
    }
}
