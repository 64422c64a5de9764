//! Point-group operation tables and Miller-index orbit enumeration (C5).

use crate::ast::CrystalSystem;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

/// A symmetry operation acting on integer Miller triples, stored as a 3x3
/// integer matrix so equality is exact (no floating-point tolerance needed
/// for the group-closure search itself).
pub type IntMatrix = [[i32; 3]; 3];

const IDENTITY: IntMatrix = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

fn apply_int(m: &IntMatrix, t: (i32, i32, i32)) -> (i32, i32, i32) {
    (
        m[0][0] * t.0 + m[0][1] * t.1 + m[0][2] * t.2,
        m[1][0] * t.0 + m[1][1] * t.1 + m[1][2] * t.2,
        m[2][0] * t.0 + m[2][1] * t.1 + m[2][2] * t.2,
    )
}

fn mat_mul_int(a: &IntMatrix, b: &IntMatrix) -> IntMatrix {
    let mut out = [[0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let mut sum = 0;
            for k in 0..3 {
                sum += a[i][k] * b[k][j];
            }
            out[i][j] = sum;
        }
    }
    out
}

/// Hexagonal/trigonal Miller-index generators (§4.5).
mod hex_generators {
    use super::IntMatrix;

    pub const C6Z: IntMatrix = [[1, 1, 0], [-1, 0, 0], [0, 0, 1]];
    pub const C3Z: IntMatrix = [[0, 1, 0], [-1, -1, 0], [0, 0, 1]];
    pub const C2_100: IntMatrix = [[1, 1, 0], [0, -1, 0], [0, 0, -1]];
    pub const C2_110: IntMatrix = [[0, 1, 0], [1, 0, 0], [0, 0, -1]];
    pub const MZ: IntMatrix = [[1, 0, 0], [0, 1, 0], [0, 0, -1]];
    pub const M_100: IntMatrix = [[-1, -1, 0], [0, 1, 0], [0, 0, 1]];
    pub const INVERSION: IntMatrix = [[-1, 0, 0], [0, -1, 0], [0, 0, -1]];
}

/// Bounded BFS closure of a generator set, per §4.5 ("bound the search at
/// 200 elements as a safety valve").
fn closure(generators: &[IntMatrix]) -> Vec<IntMatrix> {
    const MAX_ELEMENTS: usize = 200;
    let mut elements = vec![IDENTITY];

    let contains = |elems: &[IntMatrix], m: &IntMatrix| elems.iter().any(|e| e == m);

    loop {
        let mut added = false;
        let snapshot = elements.clone();
        'gen: for g in generators {
            for e in &snapshot {
                for candidate in [mat_mul_int(g, e), mat_mul_int(e, g)] {
                    if !contains(&elements, &candidate) {
                        if elements.len() >= MAX_ELEMENTS {
                            break 'gen;
                        }
                        elements.push(candidate);
                        added = true;
                    }
                }
            }
        }
        if !added || elements.len() >= MAX_ELEMENTS {
            break;
        }
    }
    elements
}

/// Generator sets for the enumerated hexagonal/trigonal point groups
/// (Table in §4.5).
fn hex_trig_generators(point_group: &str) -> Option<Vec<IntMatrix>> {
    use hex_generators::*;
    let gens = match point_group {
        "6/mmm" => vec![C6Z, C2_100, MZ],
        "622" => vec![C6Z, C2_100],
        "6mm" => vec![C6Z, M_100],
        "-6m2" => vec![C3Z, MZ, M_100],
        "6/m" => vec![C6Z, MZ],
        "-6" => vec![C3Z, MZ],
        "6" => vec![C6Z],
        "-3m" => vec![C3Z, C2_110, INVERSION],
        "32" => vec![C3Z, C2_110],
        "3m" => vec![C3Z, M_100],
        "-3" => vec![C3Z, INVERSION],
        "3" => vec![C3Z],
        _ => return None,
    };
    Some(gens)
}

/// Cubic m3m: product of the 6 axis permutations and 8 sign combinations
/// (direct enumeration, §4.5).
fn cubic_full_group() -> Vec<IntMatrix> {
    const PERMUTATIONS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    const SIGNS: [[i32; 3]; 8] = [
        [1, 1, 1],
        [1, 1, -1],
        [1, -1, 1],
        [1, -1, -1],
        [-1, 1, 1],
        [-1, 1, -1],
        [-1, -1, 1],
        [-1, -1, -1],
    ];
    let mut out = Vec::with_capacity(48);
    for perm in PERMUTATIONS {
        for sign in SIGNS {
            let mut m = [[0; 3]; 3];
            for row in 0..3 {
                m[row][perm[row]] = sign[row];
            }
            out.push(m);
        }
    }
    out
}

/// Tetragonal 4/mmm: the 4 c-axis fourfold rotations combined with the a-
/// and c-axis mirrors (direct enumeration, §4.5) — 16 operations.
fn tetragonal_full_group() -> Vec<IntMatrix> {
    const ROTATIONS: [IntMatrix; 4] = [
        [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
        [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
        [[0, 1, 0], [-1, 0, 0], [0, 0, 1]],
    ];
    let mut out = Vec::with_capacity(16);
    for rot in ROTATIONS {
        for mirror_a in [1, -1] {
            for mirror_c in [1, -1] {
                let mirror: IntMatrix = [[mirror_a, 0, 0], [0, 1, 0], [0, 0, mirror_c]];
                out.push(mat_mul_int(&mirror, &rot));
            }
        }
    }
    out
}

/// Orthorhombic mmm: the 8 sign combinations on `(h,k,l)` (§4.5).
fn orthorhombic_full_group() -> Vec<IntMatrix> {
    let mut out = Vec::with_capacity(8);
    for sh in [1, -1] {
        for sk in [1, -1] {
            for sl in [1, -1] {
                out.push([[sh, 0, 0], [0, sk, 0], [0, 0, sl]]);
            }
        }
    }
    out
}

/// Process-wide memoized point-group operation tables (§4.5, §9).
static GROUP_CACHE: Lazy<Mutex<HashMap<String, Vec<IntMatrix>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Look up (computing and caching on first use) the set of integer
/// symmetry matrices for `point_group` given its crystal `system`.
///
/// Groups the reference does not explicitly enumerate — every cubic group
/// other than `m3m`/`m-3m`, every tetragonal group other than `4/mmm`, every
/// orthorhombic group other than `mmm`, and every monoclinic/triclinic
/// group — fall through to the identity-only orbit (§9 open question,
/// preserved deliberately).
pub fn point_group_operations(system: CrystalSystem, point_group: &str) -> Vec<IntMatrix> {
    let key = format!("{}::{}", system.as_str(), point_group);
    if let Some(cached) = GROUP_CACHE.lock().unwrap().get(&key) {
        return cached.clone();
    }

    tracing::debug!(%key, "computing point-group operation table (cache miss)");
    let computed = if system == CrystalSystem::Cubic
        && (point_group == "m3m" || point_group == "m-3m")
    {
        cubic_full_group()
    } else if system == CrystalSystem::Tetragonal && point_group == "4/mmm" {
        tetragonal_full_group()
    } else if system == CrystalSystem::Orthorhombic && point_group == "mmm" {
        orthorhombic_full_group()
    } else if let Some(gens) = hex_trig_generators(point_group) {
        closure(&gens)
    } else {
        vec![IDENTITY]
    };

    GROUP_CACHE
        .lock()
        .unwrap()
        .insert(key, computed.clone());
    computed
}

/// Apply every operation of `point_group`'s orbit to `(h,k,l)`, returning
/// the distinct resulting triples (deduplicated as *integer* triples; the
/// caller is responsible for the normal/distance-based dedup of §4.5 once
/// these are turned into planes).
pub fn equivalent_millers(
    system: CrystalSystem,
    point_group: &str,
    hkl: (i32, i32, i32),
) -> Vec<(i32, i32, i32)> {
    let ops = point_group_operations(system, point_group);
    let mut seen = Vec::new();
    for op in &ops {
        let t = apply_int(op, hkl);
        if !seen.contains(&t) {
            seen.push(t);
        }
        if seen.len() >= 64 {
            break;
        }
    }
    seen
}
