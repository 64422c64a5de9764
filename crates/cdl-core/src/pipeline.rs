//! End-to-end orchestration: CDL text in, scaled [`CrystalGeometry`] out.

use crate::ast::{CrystalForm, ParseResult};
use crate::error::{Result, Warning};
use crate::geometry::{intersect_halfspaces, is_duplicate_normal, CrystalGeometry, HalfspaceSet, Vec3};
use crate::lattice::miller_normal;
use crate::modifiers::{apply_post_scaling, collapse_modifications};
use crate::symmetry::equivalent_millers;
use crate::{lexer, parser, preprocessor, twin};

/// Per-form cap on equivalent-normal expansion (§5, a sanity bound).
const MAX_EQUIVALENT_NORMALS: usize = 64;

/// Everything a caller needs after running the full pipeline: the parse
/// tree (for `/api/validate`-style responses), the final scaled geometry,
/// and any non-fatal diagnostics collected along the way.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub parsed: ParseResult,
    pub geometry: CrystalGeometry,
    pub warnings: Vec<Warning>,
}

/// Run preprocess -> lex -> parse only, stopping short of symmetry
/// expansion and geometry. This is all `/api/validate` (§6) and the CLI's
/// `validate` subcommand need — there is no reason to build a mesh just to
/// report a parse tree.
pub fn parse_only(cdl: &str) -> Result<(ParseResult, Vec<Warning>)> {
    let pre = preprocessor::preprocess(cdl)?;
    lexer::tokenize(&pre.text)?;
    parser::parse(&pre)
}

/// Run preprocess -> lex -> parse -> symmetry expansion -> half-space
/// intersection (or twin composition) -> post-scaling, in that order
/// (§2's data-flow summary, §4.7's required ordering).
pub fn run(cdl: &str) -> Result<PipelineOutput> {
    let (parsed, mut warnings) = parse_only(cdl)?;

    let halfspaces = build_halfspace_set(&parsed);

    let base_geometry = match &parsed.twin {
        Some(twin_spec) => match twin::lookup(&twin_spec.law) {
            Some(law) => {
                tracing::debug!(law = law.name, "composing twin");
                twin::compose(law, &halfspaces)
            }
            None => {
                tracing::warn!(law = %twin_spec.law, "unknown twin law, falling back to base mesh");
                warnings.push(Warning::UnknownTwinLaw {
                    law: twin_spec.law.clone(),
                });
                intersect_halfspaces(&halfspaces)
            }
        },
        None => intersect_halfspaces(&halfspaces),
    };

    let factors = collapse_modifications(&parsed.modifications);
    let geometry = apply_post_scaling(&base_geometry, factors);

    Ok(PipelineOutput {
        parsed,
        geometry,
        warnings,
    })
}

/// Expand every parsed form into its symmetry-equivalent planes (§4.5),
/// deduplicating collinear same-distance normals, and assemble the
/// resulting [`HalfspaceSet`].
fn build_halfspace_set(parsed: &ParseResult) -> HalfspaceSet {
    let mut h = HalfspaceSet::new();
    let mut seen: Vec<(Vec3, f64)> = Vec::new();

    for form in parsed.flattened_forms() {
        for (normal, distance) in equivalent_planes(parsed, &form) {
            if is_duplicate_normal((&normal, distance), &seen) {
                continue;
            }
            seen.push((normal, distance));
            h.push(normal, distance);
        }
    }
    h
}

/// The set of (normal, distance) planes a single form expands to under its
/// system's point-group orbit, capped at [`MAX_EQUIVALENT_NORMALS`].
fn equivalent_planes(parsed: &ParseResult, form: &CrystalForm) -> Vec<(Vec3, f64)> {
    let hkl = (form.miller.h, form.miller.k, form.miller.l);
    let orbit = equivalent_millers(parsed.system, &parsed.point_group, hkl);

    orbit
        .into_iter()
        .take(MAX_EQUIVALENT_NORMALS)
        .map(|(h, k, l)| {
            let miller = crate::ast::MillerIndex::hkl(h, k, l);
            let normal = miller_normal(parsed.system, miller);
            (normal, form.scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn cubic_100_with_m3m_expands_to_six_planes_and_a_cube() {
        let out = run("cubic[m3m]:{100}@1").unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.geometry.faces.len(), 6);
        assert_eq!(out.geometry.vertices.len(), 8);
    }

    #[test]
    fn cubic_111_with_m3m_expands_to_an_octahedron() {
        let out = run("cubic[m3m]:{111}@1").unwrap();
        assert_eq!(out.geometry.faces.len(), 8);
        assert_eq!(out.geometry.vertices.len(), 6);
    }

    #[test]
    fn unknown_twin_law_warns_and_falls_back_to_base_mesh() {
        let out = run("cubic[m3m]:{100}@1 | twin(not_a_real_law)").unwrap();
        assert_eq!(
            out.warnings,
            vec![Warning::UnknownTwinLaw {
                law: "not_a_real_law".to_string()
            }]
        );
        assert_eq!(out.geometry.faces.len(), 6);
    }

    #[test]
    fn known_twin_law_doubles_geometry_via_dual_crystal() {
        let out = run("cubic[m3m]:{100}@1 | twin(carlsbad)").unwrap();
        assert_eq!(out.geometry.faces.len(), 12);
    }

    #[test]
    fn elongate_modifier_scales_output_vertices() {
        let out = run("cubic[m3m]:{100}@1 | elongate(c:2)").unwrap();
        let max_z = out
            .geometry
            .vertices
            .iter()
            .map(|v| v.z.abs())
            .fold(0.0, f64::max);
        assert!((max_z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn empty_input_fails_fast() {
        assert_eq!(run(""), Err(Error::EmptyInput));
    }

    #[test]
    fn unknown_point_group_warns_but_still_produces_geometry() {
        let out = run("cubic[weird_pg]:{100}@1").unwrap();
        assert_eq!(
            out.warnings,
            vec![Warning::UnknownPointGroup {
                point_group: "weird_pg".to_string()
            }]
        );
        assert!(!out.geometry.faces.is_empty());
    }

    #[test]
    fn hexagonal_four_index_form_runs_end_to_end() {
        let out = run("hexagonal[6/mmm]:{10-10}@1 + {0001}@1.2").unwrap();
        assert!(!out.geometry.faces.is_empty());
        assert!(!out.geometry.vertices.is_empty());
    }
}
