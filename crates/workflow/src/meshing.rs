//! Watertight-geometry meshing of the exported geometry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::command::{Command, Task};
use crate::python::subscript;
use crate::session::{LaunchOptions, Precision, SessionKind};

pub type MeshTask = Task;

pub const DESCRIBE_FLUID_ONLY: &str = "The geometry consists of only fluid regions with no voids";

/// Meshing controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshingParams {
    pub precision: Precision,
    pub processor_count: u32,
    /// Surface mesh size bounds.
    pub min_size: f64,
    pub max_size: f64,
    pub boundary_layers: u32,
    pub volume_fill: String,
    pub hex_max_cell_length: f64,
}

impl Default for MeshingParams {
    fn default() -> Self {
        Self {
            precision: Precision::Double,
            processor_count: 4,
            min_size: 0.2,
            max_size: 200.0,
            boundary_layers: 12,
            volume_fill: "poly-hexcore".to_string(),
            hex_max_cell_length: 512.0,
        }
    }
}

impl MeshingParams {
    pub fn launch_options(&self, cwd: PathBuf) -> LaunchOptions {
        LaunchOptions {
            precision: self.precision,
            processor_count: self.processor_count,
            ..LaunchOptions::new(SessionKind::Meshing, cwd)
        }
    }
}

fn task_object(name: &str, member: &str) -> String {
    format!("workflow.TaskObject{}.{member}", subscript(name))
}

fn set_state(task: &str, state: serde_json::Value) -> Command {
    Command::call(task_object(task, "Arguments.set_state")).arg(state)
}

fn execute(task: &str) -> Command {
    Command::call(task_object(task, "Execute"))
}

fn path_value(path: &Path) -> serde_json::Value {
    json!(path.display().to_string())
}

/// The fixed task sequence turning `geometry` into the volume mesh `mesh`.
pub fn watertight_tasks(params: &MeshingParams, geometry: &Path, mesh: &Path) -> Vec<MeshTask> {
    const IMPORT: &str = "Import Geometry";
    const SURFACE: &str = "Generate the Surface Mesh";
    const DESCRIBE: &str = "Describe Geometry";
    const LAYERS: &str = "Add Boundary Layers";
    const VOLUME: &str = "Generate the Volume Mesh";

    vec![
        Task::new(
            "Initialize Workflow",
            vec![Command::call("workflow.InitializeWorkflow")
                .kwarg("WorkflowType", json!("Watertight Geometry"))],
        ),
        Task::new(
            IMPORT,
            vec![
                set_state(IMPORT, json!({"FileName": path_value(geometry)})),
                execute(IMPORT),
            ],
        ),
        Task::new(
            SURFACE,
            vec![
                set_state(
                    SURFACE,
                    json!({"CFDSurfaceMeshControls": {
                        "MaxSize": params.max_size,
                        "MinSize": params.min_size
                    }}),
                ),
                execute(SURFACE),
            ],
        ),
        Task::new(
            DESCRIBE,
            vec![
                Command::call(task_object(DESCRIBE, "UpdateChildTasks"))
                    .kwarg("SetupTypeChanged", json!(false)),
                set_state(DESCRIBE, json!({"SetupType": DESCRIBE_FLUID_ONLY})),
                Command::call(task_object(DESCRIBE, "UpdateChildTasks"))
                    .kwarg("SetupTypeChanged", json!(true)),
                execute(DESCRIBE),
            ],
        ),
        Task::new("Update Boundaries", vec![execute("Update Boundaries")]),
        Task::new("Update Regions", vec![execute("Update Regions")]),
        Task::new(
            LAYERS,
            vec![
                set_state(LAYERS, json!({"NumberOfLayers": params.boundary_layers})),
                Command::call(task_object(LAYERS, "AddChildAndUpdate")),
            ],
        ),
        Task::new(
            VOLUME,
            vec![
                set_state(
                    VOLUME,
                    json!({
                        "VolumeFill": params.volume_fill,
                        "VolumeFillControls": {"HexMaxCellLength": params.hex_max_cell_length},
                        "VolumeMeshPreferences": {
                            "CheckSelfProximity": "yes",
                            "ShowVolumeMeshPreferences": true
                        }
                    }),
                ),
                execute(VOLUME),
            ],
        ),
        Task::new("Check Mesh", vec![Command::call("tui.mesh.check_mesh")]),
        Task::new(
            "Write Mesh",
            vec![Command::call("tui.file.write_mesh").arg(path_value(mesh))],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<MeshTask> {
        watertight_tasks(
            &MeshingParams::default(),
            Path::new("/data/mono.stl"),
            Path::new("/data/mono.msh.h5"),
        )
    }

    #[test]
    fn test_task_order() {
        let names: Vec<&str> = tasks().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "Initialize Workflow",
                "Import Geometry",
                "Generate the Surface Mesh",
                "Describe Geometry",
                "Update Boundaries",
                "Update Regions",
                "Add Boundary Layers",
                "Generate the Volume Mesh",
                "Check Mesh",
                "Write Mesh",
            ]
        );
    }

    #[test]
    fn test_import_and_write_paths() {
        let tasks = tasks();
        assert_eq!(
            tasks[1].commands[0].render("meshing"),
            "meshing.workflow.TaskObject[\"Import Geometry\"].Arguments.set_state({\"FileName\": \"/data/mono.stl\"})"
        );
        assert_eq!(
            tasks[9].commands[0].render("meshing"),
            "meshing.tui.file.write_mesh(\"/data/mono.msh.h5\")"
        );
    }

    #[test]
    fn test_parameters_reach_the_commands() {
        let params = MeshingParams {
            boundary_layers: 5,
            ..MeshingParams::default()
        };
        let tasks = watertight_tasks(&params, Path::new("g.stl"), Path::new("m.msh.h5"));
        let layers = tasks[6].commands[0].render("meshing");
        assert!(layers.ends_with("set_state({\"NumberOfLayers\": 5})"), "{layers}");
        let surface = tasks[2].commands[0].render("meshing");
        assert!(surface.contains("\"MaxSize\": 200.0"), "{surface}");
        assert!(surface.contains("\"MinSize\": 0.2"), "{surface}");
    }

    #[test]
    fn test_launch_options() {
        let options = MeshingParams::default().launch_options(PathBuf::from("outputs"));
        assert_eq!(options.kind, SessionKind::Meshing);
        assert_eq!(options.processor_count, 4);
        assert_eq!(options.precision, Precision::Double);
        assert_eq!(options.start_timeout, None);
    }
}
