use std::path::{Path, PathBuf};

use chrono::Utc;
use splitflow_kernel::Design;
use splitflow_tessellation::{tessellate_faces, write_stl_solid};
use tracing::{info, instrument};

use crate::errors::ExportError;
use crate::metadata::{Manifest, SelectionSummary};
use crate::settings::Settings;

/// Format identifier written into every manifest.
pub const FORMAT_ID: &str = "splitflow-geometry";

/// Current manifest format version.
pub const FORMAT_VERSION: u32 = 1;

/// Files making up one exported geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryArtifact {
    pub stl: PathBuf,
    pub manifest: PathBuf,
}

impl GeometryArtifact {
    /// Paths the artifact for `name` occupies inside `dir`.
    pub fn locate(dir: &Path, name: &str) -> Self {
        Self {
            stl: dir.join(format!("{name}.stl")),
            manifest: dir.join(format!("{name}.json")),
        }
    }

    pub fn exists(&self) -> bool {
        self.stl.is_file() && self.manifest.is_file()
    }
}

/// Render every named selection as one STL solid named after its zone.
pub fn render_selections(design: &Design) -> (String, Vec<SelectionSummary>) {
    let mut stl = String::new();
    let mut summaries = Vec::with_capacity(design.selections().len());
    for selection in design.selections() {
        let zone = selection.zone_name();
        let mesh = tessellate_faces(design.store(), &selection.faces);
        write_stl_solid(&mut stl, &zone, &mesh);
        summaries.push(SelectionSummary {
            name: selection.name.clone(),
            zone,
            faces: selection.faces.len(),
            triangles: mesh.triangle_count(),
        });
    }
    (stl, summaries)
}

fn write(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `<dir>/<name>.stl` and its `<dir>/<name>.json` manifest.
///
/// `dir` is created when missing. Existing files are overwritten.
#[instrument(skip(design, settings), fields(design = design.name()))]
pub fn export_geometry(
    design: &Design,
    settings: Option<&Settings>,
    dir: &Path,
) -> Result<GeometryArtifact, ExportError> {
    if design.selections().is_empty() {
        return Err(ExportError::NoSelections(design.name().to_string()));
    }
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let artifact = GeometryArtifact::locate(dir, design.name());
    let (stl, selections) = render_selections(design);
    let manifest = Manifest {
        format: FORMAT_ID.to_string(),
        version: FORMAT_VERSION,
        name: design.name().to_string(),
        created: Utc::now(),
        settings: settings.copied(),
        stl: format!("{}.stl", design.name()),
        selections,
    };

    write(&artifact.stl, &stl)?;
    write(&artifact.manifest, &serde_json::to_string_pretty(&manifest)?)?;
    info!(
        stl = %artifact.stl.display(),
        triangles = manifest.total_triangles(),
        "exported geometry"
    );
    Ok(artifact)
}
