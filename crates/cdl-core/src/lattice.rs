//! Crystal-system lattice parameters and Miller-plane normals (C4).

use crate::ast::{CrystalSystem, MillerIndex};
use crate::geometry::Vec3;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Direct-basis lattice parameters `(a, b, c, alpha, beta, gamma)`,
/// angles in degrees.
#[derive(Debug, Clone, Copy)]
pub struct LatticeParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Reference lattice-parameter table (§4.4), keyed by crystal system so a
/// future revision (e.g. a different hexagonal/trigonal c-ratio) only needs
/// to edit this table, not any call site.
static LATTICE_TABLE: Lazy<HashMap<CrystalSystem, LatticeParams>> = Lazy::new(|| {
    use CrystalSystem::*;
    let mut m = HashMap::new();
    m.insert(
        Cubic,
        LatticeParams {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
        },
    );
    m.insert(
        Tetragonal,
        LatticeParams {
            a: 1.0,
            b: 1.0,
            c: 1.2,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
        },
    );
    m.insert(
        Orthorhombic,
        LatticeParams {
            a: 1.0,
            b: 1.2,
            c: 0.8,
            alpha: 90.0,
            beta: 90.0,
            gamma: 90.0,
        },
    );
    m.insert(
        Hexagonal,
        LatticeParams {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 90.0,
            beta: 90.0,
            gamma: 120.0,
        },
    );
    m.insert(
        Trigonal,
        LatticeParams {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: 90.0,
            beta: 90.0,
            gamma: 120.0,
        },
    );
    m.insert(
        Monoclinic,
        LatticeParams {
            a: 1.0,
            b: 1.2,
            c: 0.9,
            alpha: 90.0,
            beta: 110.0,
            gamma: 90.0,
        },
    );
    m.insert(
        Triclinic,
        LatticeParams {
            a: 1.0,
            b: 1.1,
            c: 0.95,
            alpha: 80.0,
            beta: 85.0,
            gamma: 75.0,
        },
    );
    m
});

impl LatticeParams {
    pub fn for_system(system: CrystalSystem) -> LatticeParams {
        LATTICE_TABLE[&system]
    }

    /// Cartesian direct-basis vectors `a, b, c` (§4.4).
    pub fn direct_basis(&self) -> (Vec3, Vec3, Vec3) {
        let alpha = self.alpha.to_radians();
        let beta = self.beta.to_radians();
        let gamma = self.gamma.to_radians();

        let a_vec = Vec3::new(self.a, 0.0, 0.0);
        let b_vec = Vec3::new(self.b * gamma.cos(), self.b * gamma.sin(), 0.0);

        let cx = self.c * beta.cos();
        let cy = self.c * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
        let cz_sq = self.c * self.c - cx * cx - cy * cy;
        let cz = cz_sq.max(0.0).sqrt();
        let c_vec = Vec3::new(cx, cy, cz);

        (a_vec, b_vec, c_vec)
    }

    /// Reciprocal basis `a*, b*, c*` (§4.4).
    pub fn reciprocal_basis(&self) -> (Vec3, Vec3, Vec3) {
        let (a, b, c) = self.direct_basis();
        let volume = a.dot(&b.cross(&c));
        let a_star = b.cross(&c).scale(1.0 / volume);
        let b_star = c.cross(&a).scale(1.0 / volume);
        let c_star = a.cross(&b).scale(1.0 / volume);
        (a_star, b_star, c_star)
    }
}

/// Outward unit normal for a Miller plane `(h,k,l)` in the given system.
/// For cubic (all axes equal, all angles 90 degrees), this is equivalent to
/// the direct `normalize(h,k,l)` shortcut.
pub fn miller_normal(system: CrystalSystem, miller: MillerIndex) -> Vec3 {
    let params = LatticeParams::for_system(system);
    let (a_star, b_star, c_star) = params.reciprocal_basis();
    let n = a_star
        .scale(miller.h as f64)
        .add(&b_star.scale(miller.k as f64))
        .add(&c_star.scale(miller.l as f64));
    n.normalize()
}
