//! CDL data model: the types produced by the parser (C3).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The seven crystal systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalSystem {
    Cubic,
    Hexagonal,
    Trigonal,
    Tetragonal,
    Orthorhombic,
    Monoclinic,
    Triclinic,
}

impl CrystalSystem {
    /// Case-folded keyword lookup, e.g. `"Cubic"` or `"cubic"` -> `Cubic`.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cubic" => Some(Self::Cubic),
            "hexagonal" => Some(Self::Hexagonal),
            "trigonal" => Some(Self::Trigonal),
            "tetragonal" => Some(Self::Tetragonal),
            "orthorhombic" => Some(Self::Orthorhombic),
            "monoclinic" => Some(Self::Monoclinic),
            "triclinic" => Some(Self::Triclinic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Hexagonal => "hexagonal",
            Self::Trigonal => "trigonal",
            Self::Tetragonal => "tetragonal",
            Self::Orthorhombic => "orthorhombic",
            Self::Monoclinic => "monoclinic",
            Self::Triclinic => "triclinic",
        }
    }

    /// The enumerated point groups valid for this system (§4.1).
    pub fn enumerated_point_groups(&self) -> &'static [&'static str] {
        match self {
            Self::Cubic => &["m3m", "m-3m", "432", "-43m", "m3", "m-3", "23"],
            Self::Hexagonal => &["6/mmm", "6mm", "-6m2", "622", "6/m", "-6", "6"],
            Self::Trigonal => &["-3m", "3m", "32", "-3", "3"],
            Self::Tetragonal => &["4/mmm", "4mm", "-42m", "422", "4/m", "-4", "4"],
            Self::Orthorhombic => &["mmm", "mm2", "222"],
            Self::Monoclinic => &["2/m", "m", "2"],
            Self::Triclinic => &["-1", "1"],
        }
    }
}

/// Integer Miller index. `i` is carried for four-index (hexagonal/trigonal)
/// notation but is redundant (`i = -(h+k)`) and ignored by normal computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillerIndex {
    pub h: i32,
    pub k: i32,
    pub i: Option<i32>,
    pub l: i32,
}

impl MillerIndex {
    pub fn hkl(h: i32, k: i32, l: i32) -> Self {
        Self { h, k, i: None, l }
    }

    pub fn hkil(h: i32, k: i32, i: i32, l: i32) -> Self {
        Self {
            h,
            k,
            i: Some(i),
            l,
        }
    }

    /// Stringify per §6: `{hkl}` or `{hkil}`, digits concatenated with any
    /// minus signs inline, e.g. `{10-10}`.
    pub fn to_brace_string(&self) -> String {
        let mut s = String::from("{");
        s.push_str(&self.h.to_string());
        s.push_str(&self.k.to_string());
        if let Some(i) = self.i {
            s.push_str(&i.to_string());
        }
        s.push_str(&self.l.to_string());
        s.push('}');
        s
    }
}

/// A single crystal form: a Miller index plus a plane offset and optional
/// opaque metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalForm {
    pub miller: MillerIndex,
    pub scale: f64,
    pub features: Option<String>,
    pub label: Option<String>,
}

/// An ordered group of child [`FormNode`]s sharing optional features/label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormGroup {
    pub children: Vec<FormNode>,
    pub features: Option<String>,
    pub label: Option<String>,
}

/// A node of the form tree: either a leaf crystal form or a group of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FormNode {
    Form(CrystalForm),
    Group(FormGroup),
}

impl FormNode {
    /// Flatten the tree into leaf [`CrystalForm`]s, merging group feature
    /// strings into descendant leaves. When both a group and a leaf carry
    /// a features string, the merged string is `"<group>, <leaf>"` — the
    /// group's string precedes the child's.
    pub fn flatten(&self) -> Vec<CrystalForm> {
        let mut out = Vec::new();
        flatten_into(self, None, &mut out);
        out
    }
}

fn flatten_into(node: &FormNode, inherited: Option<&str>, out: &mut Vec<CrystalForm>) {
    match node {
        FormNode::Form(form) => {
            let merged = merge_features(inherited, form.features.as_deref());
            out.push(CrystalForm {
                features: merged,
                ..form.clone()
            });
        }
        FormNode::Group(group) => {
            let merged = merge_features(inherited, group.features.as_deref());
            for child in &group.children {
                flatten_into(child, merged.as_deref(), out);
            }
        }
    }
}

fn merge_features(parent: Option<&str>, child: Option<&str>) -> Option<String> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(format!("{p}, {c}")),
        (Some(p), None) => Some(p.to_string()),
        (None, Some(c)) => Some(c.to_string()),
        (None, None) => None,
    }
}

/// The `twin(law)` tail clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwinSpec {
    pub law: String,
}

/// The axis a `ModificationSpec` scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    A,
    B,
    C,
}

impl Axis {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            'c' => Some(Self::C),
            _ => None,
        }
    }
}

/// The kind of a `ModificationSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationKind {
    Elongate,
    Flatten,
    Scale,
}

/// One `elongate(ax:f)` / `flatten(ax:f)` / `scale(ax:f)` tail clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationSpec {
    pub kind: ModificationKind,
    pub axis: Axis,
    pub factor: f64,
}

/// The fully parsed CDL expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub system: CrystalSystem,
    pub point_group: String,
    pub forms: Vec<FormNode>,
    pub modifier: Option<String>,
    pub phenomenon: Option<String>,
    pub twin: Option<TwinSpec>,
    pub modifications: Vec<ModificationSpec>,
    pub definitions: HashMap<String, String>,
    pub doc_comments: Vec<String>,
}

impl ParseResult {
    /// All leaf forms, features merged in from enclosing groups.
    pub fn flattened_forms(&self) -> Vec<CrystalForm> {
        self.forms.iter().flat_map(FormNode::flatten).collect()
    }
}
