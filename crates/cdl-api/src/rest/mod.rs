//! The four HTTP endpoints of §6, each a thin binding over
//! `cdl-core`/`cdl-encoders`.

pub mod export;
pub mod render;
pub mod validate;

pub use export::{export_gltf, export_stl};
pub use render::{render, render_post};
pub use validate::validate;
