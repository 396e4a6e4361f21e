//! SVG previews: flat outline plots and isometric mesh renders.

use std::fmt::Write;

use splitflow_kernel::ClosedLoop;

use crate::TriangleMesh;

const PADDING: f64 = 40.0;
const TITLE_HEIGHT: f64 = 25.0;
const COLORS: [&str; 4] = ["#4f8fd8", "#d8574f", "#e0a030", "#5fb36a"];

/// Maps data coordinates into the drawable area, keeping the aspect ratio.
struct Viewport {
    min_x: f64,
    min_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    fn fit(points: impl Iterator<Item = (f64, f64)>, width: f64, height: f64) -> Self {
        let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
        let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
        for (x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if min_x > max_x {
            (min_x, max_x, min_y, max_y) = (0.0, 1.0, 0.0, 1.0);
        }

        let avail_w = width - 2.0 * PADDING;
        let avail_h = height - 2.0 * PADDING - TITLE_HEIGHT;
        let data_w = (max_x - min_x).max(0.001);
        let data_h = (max_y - min_y).max(0.001);
        let scale = (avail_w / data_w).min(avail_h / data_h);
        Self {
            min_x,
            min_y,
            scale,
            offset_x: PADDING + (avail_w - data_w * scale) / 2.0,
            offset_y: PADDING + TITLE_HEIGHT + (avail_h - data_h * scale) / 2.0,
        }
    }

    fn x(&self, x: f64) -> f64 {
        (x - self.min_x) * self.scale + self.offset_x
    }

    fn y(&self, y: f64) -> f64 {
        (y - self.min_y) * self.scale + self.offset_y
    }
}

fn header(width: f64, height: f64, title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#1a1a2e\">\n\
         <text x=\"{}\" y=\"20\" font-family=\"monospace\" font-size=\"13\" fill=\"#8892b0\" text-anchor=\"middle\">{title}</text>\n",
        width / 2.0
    )
}

/// Plot closed outlines in the sketch plane, one color per outline.
///
/// The y-axis points up as in the sketch; the closing segment of each
/// outline is dashed so a non-standard closing target is visible.
pub fn outlines_to_svg(outlines: &[&ClosedLoop], width: f64, height: f64, title: &str) -> String {
    let view = Viewport::fit(
        outlines
            .iter()
            .flat_map(|l| l.points().iter().map(|p| (p.x, -p.y))),
        width,
        height,
    );

    let mut svg = header(width, height, title);
    for (k, outline) in outlines.iter().enumerate() {
        let color = COLORS[k % COLORS.len()];
        let points: Vec<String> = outline
            .points()
            .iter()
            .map(|p| format!("{:.2},{:.2}", view.x(p.x), view.y(-p.y)))
            .collect();
        let _ = writeln!(
            svg,
            "  <polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1\"/>",
            points.join(" ")
        );
        let closing = outline.closing_segment();
        let _ = writeln!(
            svg,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"1\" stroke-dasharray=\"4 2\"/>",
            view.x(closing.start.x),
            view.y(-closing.start.y),
            view.x(closing.end.x),
            view.y(-closing.end.y),
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-family=\"monospace\" font-size=\"10\" fill=\"{color}\">{}</text>",
            PADDING,
            height - 8.0 - 12.0 * k as f64,
            outline.name()
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Simple isometric projection: 3D -> 2D
fn project(x: f64, y: f64, z: f64) -> (f64, f64) {
    let angle_x: f64 = 0.6;
    let angle_z: f64 = 0.8;
    let rx = x * angle_z.cos() - y * angle_z.sin();
    let ry = x * angle_z.sin() + y * angle_z.cos();
    let pz = ry * angle_x.sin() + z * angle_x.cos();
    (rx, -pz)
}

/// Isometric wireframe of a mesh, painter-sorted and shaded.
pub fn mesh_to_svg(mesh: &TriangleMesh, width: f64, height: f64, title: &str) -> String {
    if mesh.indices.is_empty() {
        let mut svg = header(width, height, title);
        svg.push_str("</svg>\n");
        return svg;
    }

    let projected: Vec<(f64, f64)> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| project(p[0], p[1], p[2]))
        .collect();
    let view = Viewport::fit(projected.iter().copied(), width, height);

    let light = splitflow_kernel::Vec3::new(0.3, -0.5, 0.8)
        .normalized()
        .unwrap_or(splitflow_kernel::Vec3::Z);
    let mut tris: Vec<([u32; 3], f64, f64)> = mesh
        .triangles()
        .map(|tri| {
            let depth = tri.iter().map(|&i| mesh.position(i).z).sum::<f64>() / 3.0;
            let brightness = 0.3 + 0.7 * mesh.facet_normal(tri).dot(&light).abs().min(1.0);
            (tri, depth, brightness)
        })
        .collect();
    tris.sort_by(|a, b| a.1.total_cmp(&b.1));

    let stroke_width = if tris.len() > 200 { 0.2 } else { 0.5 };
    let mut svg = header(width, height, title);
    for (tri, _, b) in &tris {
        let [p0, p1, p2] = tri.map(|i| projected[i as usize]);
        let (r, g, bl) = ((100.0 * b) as u8, (160.0 * b) as u8, (220.0 * b) as u8);
        let _ = writeln!(
            svg,
            "  <polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"rgb({r},{g},{bl})\" fill-opacity=\"0.6\" stroke=\"#2a2a4a\" stroke-width=\"{stroke_width}\"/>",
            view.x(p0.0),
            view.y(p0.1),
            view.x(p1.0),
            view.y(p1.1),
            view.x(p2.0),
            view.y(p2.1),
        );
    }
    let _ = writeln!(
        svg,
        "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" text-anchor=\"middle\">{} triangles, {} vertices</text>",
        width / 2.0,
        height - 8.0,
        mesh.triangle_count(),
        mesh.vertex_count()
    );
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitflow_kernel::{assemble, rectangle, ClosingTarget};

    #[test]
    fn test_outline_svg_has_one_polyline_per_outline() {
        let rect = rectangle(0.0, 0.0, 0.5, 0.025).unwrap();
        let a = assemble("plate", &rect, ClosingTarget::Index(1)).unwrap();
        let b = assemble("copy", &rect, ClosingTarget::First).unwrap();
        let svg = outlines_to_svg(&[&a, &b], 400.0, 300.0, "plates");
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
        assert!(svg.contains(">plate</text>"));
    }

    #[test]
    fn test_empty_mesh_svg() {
        let svg = mesh_to_svg(&TriangleMesh::new(), 200.0, 100.0, "empty");
        assert!(svg.contains("empty"));
        assert!(!svg.contains("<polygon"));
    }
}
