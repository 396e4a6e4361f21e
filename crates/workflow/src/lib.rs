//! Drives a split-cylinder drag study: geometry, meshing and solving run as
//! strictly sequential stages, the last two through external tool sessions.

pub mod command;
pub mod config;
pub mod meshing;
pub mod pipeline;
pub mod python;
pub mod session;
pub mod solver;

pub use command::{Command, Task};
pub use config::{ConfigError, RunConfig};
pub use meshing::{watertight_tasks, MeshTask, MeshingParams};
pub use pipeline::{RunSummary, Stage, Workflow, WorkflowError};
pub use session::{
    LaunchOptions, Launcher, Precision, RecordingLauncher, ScriptLauncher, Session, SessionError,
    SessionGuard, SessionKind,
};
pub use solver::{solver_steps, FlowConditions, SolverFiles, SolverParams, SolverStep, ViscousModel};

/// The launcher a config asks for: scripts next to the data directory.
pub fn script_launcher(config: &RunConfig, data_dir: &std::path::Path) -> ScriptLauncher {
    ScriptLauncher {
        python: config.python.clone(),
        script_dir: data_dir.to_path_buf(),
        output_name: config.output_name.clone(),
        dry_run: config.dry_run,
    }
}
