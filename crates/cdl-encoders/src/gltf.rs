//! glTF 2.0 JSON encoder with a single embedded (base64) buffer (§6).

use base64::Engine;
use cdl_core::geometry::{CrystalGeometry, Vec3};
use serde_json::{json, Value};

/// Options for `/api/export/gltf`; `scale` is clamped by the caller to
/// `[0.1, 10]` before being passed in.
#[derive(Debug, Clone, Copy)]
pub struct GltfOptions {
    pub scale: f64,
}

impl Default for GltfOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

const BASE_COLOR: [f64; 4] = [0.055, 0.647, 0.914, 0.9];
const METALLIC: f64 = 0.1;
const ROUGHNESS: f64 = 0.3;

/// Build the glTF 2.0 JSON document for `geom`, flat-shaded (every face
/// gets its own vertex copies so each triangle carries its own normal).
pub fn export_gltf(geom: &CrystalGeometry, opts: GltfOptions) -> Value {
    tracing::debug!(faces = geom.faces.len(), scale = opts.scale, "encoding glTF");
    let mut positions: Vec<f32> = Vec::new();
    let mut normals: Vec<f32> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    for face in &geom.faces {
        if face.vertices.len() < 3 {
            continue;
        }
        let base_index = (positions.len() / 3) as u16;
        for v in &face.vertices {
            push_vertex(&mut positions, v, opts.scale);
            push_vertex(&mut normals, &face.normal, 1.0);
        }
        for tri in 1..face.vertices.len() as u16 - 1 {
            indices.push(base_index);
            indices.push(base_index + tri);
            indices.push(base_index + tri + 1);
        }
    }

    let positions_bytes = f32_slice_to_le_bytes(&positions);
    let normals_bytes = f32_slice_to_le_bytes(&normals);
    let indices_bytes = u16_slice_to_le_bytes(&indices);

    let mut buffer_bytes = Vec::new();
    buffer_bytes.extend_from_slice(&positions_bytes);
    let normals_offset = buffer_bytes.len();
    buffer_bytes.extend_from_slice(&normals_bytes);
    let indices_offset = buffer_bytes.len();
    buffer_bytes.extend_from_slice(&indices_bytes);

    let (pos_min, pos_max) = bounds(&positions);

    let data_uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer_bytes)
    );

    json!({
        "asset": { "version": "2.0", "generator": "cdl-encoders" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1 },
                "indices": 2,
                "material": 0
            }]
        }],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": BASE_COLOR,
                "metallicFactor": METALLIC,
                "roughnessFactor": ROUGHNESS
            },
            "alphaMode": "BLEND"
        }],
        "buffers": [{
            "uri": data_uri,
            "byteLength": buffer_bytes.len()
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_bytes.len(), "target": 34962 },
            { "buffer": 0, "byteOffset": normals_offset, "byteLength": normals_bytes.len(), "target": 34962 },
            { "buffer": 0, "byteOffset": indices_offset, "byteLength": indices_bytes.len(), "target": 34963 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": positions.len() / 3,
                "type": "VEC3", "min": pos_min, "max": pos_max
            },
            {
                "bufferView": 1, "componentType": 5126, "count": normals.len() / 3, "type": "VEC3"
            },
            {
                "bufferView": 2, "componentType": 5123, "count": indices.len(), "type": "SCALAR"
            }
        ]
    })
}

fn push_vertex(out: &mut Vec<f32>, v: &Vec3, scale: f64) {
    out.push((v.x * scale) as f32);
    out.push((v.y * scale) as f32);
    out.push((v.z * scale) as f32);
}

fn f32_slice_to_le_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn u16_slice_to_le_bytes(data: &[u16]) -> Vec<u8> {
    data.iter().flat_map(|i| i.to_le_bytes()).collect()
}

fn bounds(positions: &[f32]) -> (Vec<f32>, Vec<f32>) {
    if positions.is_empty() {
        return (vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]);
    }
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for chunk in positions.chunks(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(chunk[axis]);
            max[axis] = max[axis].max(chunk[axis]);
        }
    }
    (min.to_vec(), max.to_vec())
}
