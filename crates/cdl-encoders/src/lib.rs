//! Output encoders (C9): SVG painter, ASCII STL, glTF 2.0 JSON.
//!
//! These are thin, format-specific renderers over a finished
//! [`cdl_core::geometry::CrystalGeometry`] — no parsing or symmetry logic
//! lives here.

pub mod gltf;
pub mod stl;
pub mod svg;

pub use gltf::{export_gltf, GltfOptions};
pub use stl::export_stl;
pub use svg::{export_svg, RenderOptions};
