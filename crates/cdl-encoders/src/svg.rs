//! Orthographic SVG painter (§6).

use cdl_core::geometry::{CrystalGeometry, Vec3};

/// Render parameters for `/api/render`, with the spec's defaults.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub elev: f64,
    pub azim: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            elev: 30.0,
            azim: -45.0,
            width: 300,
            height: 300,
        }
    }
}

impl RenderOptions {
    /// Clamp `elev` to `[-90, 90]` and `azim` to `[-180, 180]` (§6).
    pub fn clamped(self) -> Self {
        Self {
            elev: self.elev.clamp(-90.0, 90.0),
            azim: self.azim.clamp(-180.0, 180.0),
            ..self
        }
    }
}

const AMBIENT: f64 = 0.3;
const BASE_COLOR: (u8, u8, u8) = (14, 165, 233);
const STROKE: &str = "#0369a1";
const STROKE_WIDTH: f64 = 1.5;

/// Rotation about the world Y axis by `azim`, then about X by `elev`
/// (§6: `R_elev · R_azim`).
fn view_transform(elev_deg: f64, azim_deg: f64) -> impl Fn(&Vec3) -> Vec3 {
    let azim = azim_deg.to_radians();
    let elev = elev_deg.to_radians();
    let (sa, ca) = azim.sin_cos();
    let (se, ce) = elev.sin_cos();

    move |v: &Vec3| -> Vec3 {
        // R_azim (about Y)
        let x1 = v.x * ca + v.z * sa;
        let y1 = v.y;
        let z1 = -v.x * sa + v.z * ca;
        // R_elev (about X)
        let x2 = x1;
        let y2 = y1 * ce - z1 * se;
        let z2 = y1 * se + z1 * ce;
        Vec3::new(x2, y2, z2)
    }
}

fn light_direction() -> Vec3 {
    Vec3::new(0.5, 0.7, 0.5).normalize()
}

fn shade(normal_view: &Vec3) -> (u8, u8, u8) {
    let light = light_direction();
    let diffuse = normal_view.dot(&light).max(0.0);
    let intensity = (AMBIENT + (1.0 - AMBIENT) * diffuse).min(1.0);
    (
        (BASE_COLOR.0 as f64 * intensity) as u8,
        (BASE_COLOR.1 as f64 * intensity) as u8,
        (BASE_COLOR.2 as f64 * intensity) as u8,
    )
}

/// Render `geom` to an SVG document (§6).
pub fn export_svg(geom: &CrystalGeometry, opts: RenderOptions) -> String {
    let opts = opts.clamped();
    tracing::debug!(faces = geom.faces.len(), elev = opts.elev, azim = opts.azim, "encoding SVG");
    let transform = view_transform(opts.elev, opts.azim);
    let scale = (opts.width.min(opts.height) as f64) * 0.35;
    let cx = opts.width as f64 / 2.0;
    let cy = opts.height as f64 / 2.0;

    struct Projected {
        centroid_z: f64,
        points: Vec<(f64, f64)>,
        color: (u8, u8, u8),
    }

    let mut projected: Vec<Projected> = Vec::new();
    for face in &geom.faces {
        let normal_view = transform(&face.normal);
        if normal_view.z < -0.01 {
            continue; // back-face cull
        }

        let view_vertices: Vec<Vec3> = face.vertices.iter().map(&transform).collect();
        let centroid_z = view_vertices.iter().map(|v| v.z).sum::<f64>() / view_vertices.len() as f64;
        let points = view_vertices
            .iter()
            .map(|v| (cx + v.x * scale, cy - v.y * scale))
            .collect();

        projected.push(Projected {
            centroid_z,
            points,
            color: shade(&normal_view),
        });
    }

    // Painter's algorithm: farthest first.
    projected.sort_by(|a, b| a.centroid_z.partial_cmp(&b.centroid_z).unwrap());

    let mut body = String::new();
    for face in &projected {
        let pts = face
            .points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        body.push_str(&format!(
            "<polygon points=\"{pts}\" fill=\"rgb({},{},{})\" stroke=\"{STROKE}\" stroke-width=\"{STROKE_WIDTH}\" filter=\"url(#crystalShadow)\"/>\n",
            face.color.0, face.color.1, face.color.2
        ));
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<defs>
<linearGradient id="crystalGradient" x1="0%" y1="0%" x2="100%" y2="100%">
<stop offset="0%" stop-color="rgb(56,189,248)"/>
<stop offset="100%" stop-color="rgb(3,105,161)"/>
</linearGradient>
<filter id="crystalShadow" x="-20%" y="-20%" width="140%" height="140%">
<feDropShadow dx="0" dy="1" stdDeviation="1.5" flood-opacity="0.35"/>
</filter>
</defs>
<rect width="{w}" height="{h}" fill="url(#crystalGradient)" opacity="0.05"/>
{body}</svg>
"#,
        w = opts.width,
        h = opts.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdl_core::geometry::HalfspaceSet;

    fn cube_geometry() -> CrystalGeometry {
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
        cdl_core::geometry::intersect_halfspaces(&h)
    }

    #[test]
    fn renders_well_formed_svg_document() {
        let geom = cube_geometry();
        let svg = export_svg(&geom, RenderOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn back_faces_are_culled() {
        let geom = cube_geometry();
        let svg = export_svg(&geom, RenderOptions::default());
        let polygon_count = svg.matches("<polygon").count();
        assert!(polygon_count < geom.faces.len());
    }

    #[test]
    fn out_of_range_view_params_are_clamped() {
        let opts = RenderOptions {
            elev: 500.0,
            azim: -999.0,
            ..RenderOptions::default()
        }
        .clamped();
        assert_eq!(opts.elev, 90.0);
        assert_eq!(opts.azim, -180.0);
    }
}
