use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Per-selection counts recorded next to the STL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Selection name as created in the design.
    pub name: String,
    /// Solid name in the STL, which the meshing tool uses as the zone name.
    pub zone: String,
    pub faces: usize,
    pub triangles: usize,
}

/// Describes one exported geometry artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// Design (output) name.
    pub name: String,
    /// When the artifact was written.
    pub created: DateTime<Utc>,
    /// Settings the geometry was built from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    /// File name of the STL, relative to the manifest.
    pub stl: String,
    pub selections: Vec<SelectionSummary>,
}

impl Manifest {
    pub fn selection(&self, name: &str) -> Option<&SelectionSummary> {
        self.selections.iter().find(|s| s.name == name)
    }

    pub fn total_triangles(&self) -> usize {
        self.selections.iter().map(|s| s.triangles).sum()
    }
}
