//! Solver setup, initialization, iteration and result files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use splitflow_format::Settings;

use crate::command::{Command, Task};
use crate::python::subscript;
use crate::session::{LaunchOptions, Precision, SessionKind};

pub type SolverStep = Task;

/// Turbulence model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum ViscousModel {
    SpalartAllmaras { production: String },
    KOmega { variant: String },
}

impl Default for ViscousModel {
    fn default() -> Self {
        Self::SpalartAllmaras {
            production: "vorticity-based".to_string(),
        }
    }
}

impl ViscousModel {
    fn commands(&self) -> Vec<Command> {
        const VISCOUS: &str = "setup.models.viscous";
        match self {
            Self::SpalartAllmaras { production } => vec![
                Command::assign(format!("{VISCOUS}.model"), json!("spalart-allmaras")),
                Command::assign(
                    format!("{VISCOUS}.spalart_allmaras_production"),
                    json!(production),
                ),
            ],
            Self::KOmega { variant } => vec![
                Command::assign(format!("{VISCOUS}.model"), json!("k-omega")),
                Command::assign(format!("{VISCOUS}.k_omega_model"), json!(variant)),
            ],
        }
    }
}

/// Free-stream conditions of the study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConditions {
    pub mach: f64,
    /// Kelvin.
    pub temperature: f64,
    /// Angle of attack in degrees.
    pub angle_of_attack: f64,
    /// Pascal.
    pub pressure: f64,
}

impl Default for FlowConditions {
    fn default() -> Self {
        Self {
            mach: 0.0437,
            temperature: 290.0,
            angle_of_attack: 0.0,
            pressure: 101_325.0,
        }
    }
}

/// Solver controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    pub precision: Precision,
    pub processor_count: u32,
    /// Seconds.
    pub start_timeout: u32,
    pub viscous: ViscousModel,
    pub inlet_zone: String,
    /// m/s.
    pub inlet_velocity: f64,
    pub velocity_specification: String,
    pub reference_density: f64,
    pub reference_enthalpy: f64,
    pub reference_velocity: f64,
    pub reference_zone: Option<String>,
    pub report_name: String,
    pub monitored_surfaces: Vec<String>,
    pub force_vector: [f64; 3],
    pub iterations: u32,
    pub flow: FlowConditions,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            precision: Precision::Double,
            processor_count: 2,
            start_timeout: 500,
            viscous: ViscousModel::default(),
            inlet_zone: "inlet-fluid".to_string(),
            inlet_velocity: 15.0,
            velocity_specification: "Magnitude and Direction".to_string(),
            reference_density: 1.225,
            reference_enthalpy: 0.0,
            reference_velocity: 15.0,
            reference_zone: None,
            report_name: "drag-force1".to_string(),
            monitored_surfaces: vec!["plate".to_string()],
            force_vector: [1.0, 0.0, 0.0],
            iterations: 1,
            flow: FlowConditions::default(),
        }
    }
}

impl SolverParams {
    pub fn launch_options(&self, cwd: PathBuf) -> LaunchOptions {
        LaunchOptions {
            precision: self.precision,
            processor_count: self.processor_count,
            start_timeout: Some(self.start_timeout),
            ..LaunchOptions::new(SessionKind::Solver, cwd)
        }
    }
}

/// Reference area of the fluid box: `(width + height) * 2 * length`.
pub fn reference_area(settings: &Settings) -> f64 {
    let (length, width, height) = (
        settings.box_length as f64,
        settings.box_width as f64,
        settings.box_height as f64,
    );
    (width + height) * 2.0 * length
}

/// Files the solver stage reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverFiles {
    pub mesh: PathBuf,
    pub report: PathBuf,
    pub initial_case: PathBuf,
    pub resolved_case: PathBuf,
    pub resolved_data: PathBuf,
}

impl SolverFiles {
    /// Standard layout: artifacts in `data_dir`, the report in
    /// `<report_dir>/<angle>.txt`.
    pub fn new(data_dir: &Path, report_dir: &Path, output_name: &str, angle: i64) -> Self {
        let artifact = |suffix: &str| data_dir.join(format!("{output_name}{suffix}"));
        Self {
            mesh: artifact(".msh.h5"),
            report: report_dir.join(format!("{angle}.txt")),
            initial_case: artifact("_initialization.cas.h5"),
            resolved_case: artifact("_resolved.cas.h5"),
            resolved_data: artifact("_resolved.dat.h5"),
        }
    }
}

fn path_value(path: &Path) -> Value {
    json!(path.display().to_string())
}

fn write_file(path: &Path, file_type: &str) -> Command {
    Command::call("file.write")
        .kwarg("file_name", path_value(path))
        .kwarg("file_type", json!(file_type))
}

/// The ordered solver steps for one run.
pub fn solver_steps(params: &SolverParams, settings: &Settings, files: &SolverFiles) -> Vec<SolverStep> {
    let report = subscript(&params.report_name);
    let inlet = format!(
        "setup.boundary_conditions.velocity_inlet{}.momentum",
        subscript(&params.inlet_zone)
    );

    let mut reference = vec![
        Command::call("setup.reference_values.compute")
            .kwarg("from_zone_name", json!(params.inlet_zone))
            .kwarg("from_zone_type", json!("velocity-inlet")),
        Command::assign("setup.reference_values.area", json!(reference_area(settings))),
        Command::assign("setup.reference_values.density", json!(params.reference_density)),
        Command::assign("setup.reference_values.enthalpy", json!(params.reference_enthalpy)),
        Command::assign("setup.reference_values.velocity", json!(params.reference_velocity)),
    ];
    if let Some(zone) = &params.reference_zone {
        reference.push(Command::assign("setup.reference_values.zone", json!(zone)));
    }

    vec![
        Task::new(
            "Read Mesh",
            vec![Command::call("file.read_mesh").kwarg("file_name", path_value(&files.mesh))],
        ),
        Task::new("Check Mesh", vec![Command::call("mesh.check")]),
        Task::new("Viscous Model", params.viscous.commands()),
        Task::new(
            "Inlet Boundary",
            vec![
                Command::call("setup.boundary_conditions.set_zone_type")
                    .kwarg("zone_list", json!([params.inlet_zone]))
                    .kwarg("new_type", json!("velocity-inlet")),
                Command::assign(
                    format!("{inlet}.velocity_specification_method"),
                    json!(params.velocity_specification),
                ),
                Command::assign(format!("{inlet}.velocity"), json!(params.inlet_velocity)),
            ],
        ),
        Task::new("Reference Values", reference),
        Task::new(
            "Drag Report",
            vec![
                Command::assign(
                    format!("solution.report_definitions.force{report}"),
                    json!({
                        "zones": params.monitored_surfaces,
                        "force_vector": params.force_vector
                    }),
                ),
                Command::assign(
                    format!("parameters.output_parameters.report_definitions{report}"),
                    json!({"report_definition": params.report_name}),
                ),
                Command::assign(
                    format!("solution.monitor.report_plots{report}"),
                    json!({"report_defs": [params.report_name], "print": true}),
                ),
            ],
        ),
        Task::new(
            "Report File",
            vec![
                Command::call("settings.solution.monitor.report_files.create")
                    .kwarg("name", json!(params.report_name)),
                Command::assign(
                    format!("settings.solution.monitor.report_files{report}"),
                    json!({
                        "report_defs": [params.report_name],
                        "file_name": path_value(&files.report)
                    }),
                ),
            ],
        ),
        Task::new(
            "Initialize",
            vec![Command::call("solution.initialization.hybrid_initialize")],
        ),
        Task::new("Write Initial Case", vec![write_file(&files.initial_case, "case")]),
        Task::new(
            "Iterate",
            vec![Command::call("solution.run_calculation.iterate")
                .kwarg("iter_count", json!(params.iterations))],
        ),
        Task::new(
            "Write Results",
            vec![
                write_file(&files.resolved_case, "case"),
                write_file(&files.resolved_data, "data"),
            ],
        ),
    ]
}
