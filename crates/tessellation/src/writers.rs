//! ASCII STL output.

use std::fmt::Write;

use tracing::debug;

use crate::TriangleMesh;

/// One ASCII STL `solid` block.
///
/// Several blocks can be concatenated into one file; meshing tools read each
/// block as a separately named zone.
pub fn write_stl_solid(out: &mut String, name: &str, mesh: &TriangleMesh) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "solid {name}");
    for tri in mesh.triangles() {
        let n = mesh.facet_normal(tri);
        let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for p in tri.map(|i| mesh.position(i)) {
            let _ = writeln!(out, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    let _ = writeln!(out, "endsolid {name}");
    debug!(name, triangles = mesh.triangle_count(), "wrote stl solid");
}
