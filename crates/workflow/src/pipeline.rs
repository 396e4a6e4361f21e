//! The sequential geometry → mesh → solve run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splitflow_format::{
    export_geometry, DragHistory, ExportError, GeometryArtifact, ReportError, Settings,
    SettingsError,
};
use splitflow_kernel::model::design::FLUID;
use splitflow_kernel::{CrossSection, Design, ModelError, ProfileError};
use splitflow_tessellation::{mesh_to_svg, outlines_to_svg, tessellate_body, TriangleMesh};
use tracing::{info, instrument, warn};

use crate::command::Task;
use crate::config::{ConfigError, RunConfig};
use crate::meshing::watertight_tasks;
use crate::session::{LaunchOptions, Launcher, SessionError, SessionGuard};
use crate::solver::{solver_steps, SolverFiles};

const PREVIEW_SIZE: (f64, f64) = (800.0, 600.0);

/// One phase of a run. Each consumes the previous phase's artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Geometry,
    Mesh,
    Solve,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Geometry, Stage::Mesh, Stage::Solve];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::Mesh => "mesh",
            Self::Solve => "solve",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to build the cross-section: {0}")]
    Profile(#[from] ProfileError),

    #[error("failed to model the geometry: {0}")]
    Model(#[from] ModelError),

    #[error("failed to export the geometry: {0}")]
    Export(#[from] ExportError),

    #[error("failed to read the drag report: {0}")]
    Report(#[from] ReportError),

    #[error("{stage} stage could not start its session: {source}")]
    Launch {
        stage: Stage,
        #[source]
        source: SessionError,
    },

    #[error("{stage} task `{task}` failed: {source}")]
    Task {
        stage: Stage,
        task: String,
        #[source]
        source: SessionError,
    },

    #[error("{stage} session failed: {source}")]
    Session {
        stage: Stage,
        #[source]
        source: SessionError,
    },

    #[error("{stage} stage needs {path}, which does not exist")]
    MissingArtifact { stage: Stage, path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WorkflowError + '_ {
    move |source| WorkflowError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Stages run, in order.
    pub stages: Vec<Stage>,
    pub geometry: Option<GeometryArtifact>,
    pub mesh: Option<PathBuf>,
    pub solver_files: Option<SolverFiles>,
    pub previews: Vec<PathBuf>,
    /// Last sample of the drag report, when one was written.
    pub final_drag: Option<f64>,
}

/// A configured run over one set of settings.
pub struct Workflow<L> {
    config: RunConfig,
    settings: Settings,
    launcher: L,
    data_dir: PathBuf,
    report_dir: PathBuf,
}

impl<L: Launcher> Workflow<L> {
    /// Validate `config` and resolve its directories against the current
    /// working directory, since the remote tools run elsewhere.
    pub fn new(config: RunConfig, settings: Settings, launcher: L) -> Result<Self, WorkflowError> {
        config.validate()?;
        let data_dir =
            std::path::absolute(&config.data_dir).map_err(io_error(&config.data_dir))?;
        let report_dir =
            std::path::absolute(&config.report_dir).map_err(io_error(&config.report_dir))?;
        Ok(Self {
            config,
            settings,
            launcher,
            data_dir,
            report_dir,
        })
    }

    /// Like [`Self::new`], reading the settings file named by the config.
    pub fn from_config(config: RunConfig, launcher: L) -> Result<Self, WorkflowError> {
        let settings = Settings::load(&config.settings_path)?;
        Self::new(config, settings, launcher)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn geometry_artifact(&self) -> GeometryArtifact {
        GeometryArtifact::locate(&self.data_dir, &self.config.output_name)
    }

    pub fn solver_files(&self) -> SolverFiles {
        SolverFiles::new(
            &self.data_dir,
            &self.report_dir,
            &self.config.output_name,
            self.settings.angle,
        )
    }

    /// Run `stages` in pipeline order; duplicates run once.
    pub fn run(&self, stages: &[Stage]) -> Result<RunSummary, WorkflowError> {
        let mut stages = stages.to_vec();
        stages.sort();
        stages.dedup();

        let mut summary = RunSummary::default();
        for stage in stages {
            info!(%stage, "starting stage");
            match stage {
                Stage::Geometry => {
                    let (artifact, previews) = self.build_geometry()?;
                    summary.geometry = Some(artifact);
                    summary.previews = previews;
                }
                Stage::Mesh => summary.mesh = Some(self.generate_mesh()?),
                Stage::Solve => {
                    let (files, history) = self.solve()?;
                    summary.final_drag = history.map(|h| h.last().value);
                    summary.solver_files = Some(files);
                }
            }
            summary.stages.push(stage);
        }
        Ok(summary)
    }

    /// Build the cross-section and the modeled design.
    pub fn build_design(&self) -> Result<(CrossSection, Design), WorkflowError> {
        let params = &self.config.cross_section;
        let section = CrossSection::build(params, self.settings.geometry_angle())?;
        let domain = self.settings.fluid_domain(params.depth);
        let design = Design::from_section(&self.config.output_name, &section, params.depth, &domain)?;
        Ok((section, design))
    }

    /// Model and export the geometry; previews are written when plotting.
    #[instrument(skip(self), fields(angle = self.settings.angle))]
    pub fn build_geometry(&self) -> Result<(GeometryArtifact, Vec<PathBuf>), WorkflowError> {
        let (section, design) = self.build_design()?;
        let artifact = export_geometry(&design, Some(&self.settings), &self.data_dir)?;
        let previews = if self.config.plot {
            self.write_previews(&section, &design)?
        } else {
            Vec::new()
        };
        Ok((artifact, previews))
    }

    fn write_previews(
        &self,
        section: &CrossSection,
        design: &Design,
    ) -> Result<Vec<PathBuf>, WorkflowError> {
        let dir = self.data_dir.join("preview");
        std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        let name = &self.config.output_name;
        let (width, height) = PREVIEW_SIZE;

        let outlines = outlines_to_svg(
            &section.loops(),
            width,
            height,
            &format!("{name} cross-section at {}°", section.angle),
        );

        let mut mesh = TriangleMesh::new();
        for (id, body) in design.bodies() {
            if body.name != FLUID {
                mesh.merge(&tessellate_body(design.store(), id));
            }
        }
        let bodies = mesh_to_svg(&mesh, width, height, &format!("{name} bodies"));

        let mut written = Vec::with_capacity(2);
        for (suffix, svg) in [("outlines", outlines), ("design", bodies)] {
            let path = dir.join(format!("{name}_{suffix}.svg"));
            std::fs::write(&path, svg).map_err(io_error(&path))?;
            written.push(path);
        }
        info!(dir = %dir.display(), "wrote previews");
        Ok(written)
    }

    fn launch_options(&self, options: LaunchOptions) -> LaunchOptions {
        LaunchOptions {
            ui_mode: self.config.ui_mode.clone(),
            product_version: self.config.product_version.clone(),
            ..options
        }
    }

    fn require(&self, stage: Stage, path: &Path) -> Result<(), WorkflowError> {
        if self.launcher.is_dry_run() || path.is_file() {
            return Ok(());
        }
        Err(WorkflowError::MissingArtifact {
            stage,
            path: path.to_path_buf(),
        })
    }

    /// Mesh the exported geometry into `<data_dir>/<output>.msh.h5`.
    #[instrument(skip(self))]
    pub fn generate_mesh(&self) -> Result<PathBuf, WorkflowError> {
        let geometry = self.geometry_artifact();
        self.require(Stage::Mesh, &geometry.stl)?;
        let mesh = self.solver_files().mesh;

        let tasks = watertight_tasks(&self.config.meshing, &geometry.stl, &mesh);
        let options = self.launch_options(self.config.meshing.launch_options(self.data_dir.clone()));
        run_tasks(&self.launcher, &options, Stage::Mesh, &tasks)?;
        info!(mesh = %mesh.display(), "mesh stage finished");
        Ok(mesh)
    }

    /// Solve on the mesh and read back the drag report this solve wrote.
    ///
    /// A report left by an earlier run is removed before the solver starts.
    /// Dry runs never read a report.
    #[instrument(skip(self))]
    pub fn solve(&self) -> Result<(SolverFiles, Option<DragHistory>), WorkflowError> {
        let files = self.solver_files();
        self.require(Stage::Solve, &files.mesh)?;
        std::fs::create_dir_all(&self.report_dir).map_err(io_error(&self.report_dir))?;
        let dry_run = self.launcher.is_dry_run();
        if !dry_run && files.report.is_file() {
            warn!(report = %files.report.display(), "removing report from an earlier run");
            std::fs::remove_file(&files.report).map_err(io_error(&files.report))?;
        }

        let params = &self.config.solver;
        info!(
            solver_angle = self.settings.solver_angle(),
            mach = params.flow.mach,
            temperature = params.flow.temperature,
            angle_of_attack = params.flow.angle_of_attack,
            pressure = params.flow.pressure,
            iterations = params.iterations,
            "flow conditions"
        );
        let steps = solver_steps(params, &self.settings, &files);
        let options = self.launch_options(params.launch_options(self.data_dir.clone()));
        run_tasks(&self.launcher, &options, Stage::Solve, &steps)?;

        if dry_run {
            return Ok((files, None));
        }
        if !files.report.is_file() {
            warn!(report = %files.report.display(), "solver wrote no report");
            return Ok((files, None));
        }
        let history = DragHistory::load(&files.report, &params.report_name)?;
        let last = history.last();
        info!(
            iteration = last.iteration,
            drag = last.value,
            "final drag force"
        );
        Ok((files, Some(history)))
    }
}

/// Run tasks in order on one session; the first failure aborts the session.
fn run_tasks(
    launcher: &dyn Launcher,
    options: &LaunchOptions,
    stage: Stage,
    tasks: &[Task],
) -> Result<(), WorkflowError> {
    let mut session = SessionGuard::launch(launcher, options)
        .map_err(|source| WorkflowError::Launch { stage, source })?;
    for task in tasks {
        info!(%stage, task = task.name, "running task");
        for command in &task.commands {
            session
                .execute(command)
                .map_err(|source| WorkflowError::Task {
                    stage,
                    task: task.name.to_string(),
                    source,
                })?;
        }
    }
    session
        .close()
        .map_err(|source| WorkflowError::Session { stage, source })
}
