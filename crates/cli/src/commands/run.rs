use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use splitflow_workflow::{script_launcher, RunConfig, Stage, Workflow};
use tracing::info;

/// Options shared by the stage commands.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Settings file with angle and box sizes
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Base name of every artifact
    #[arg(short, long)]
    pub output_name: Option<String>,

    /// Directory for geometry, mesh, case and data files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the drag report
    #[arg(short, long)]
    pub report_dir: Option<PathBuf>,

    /// Solver iterations
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Python interpreter with ansys-fluent-core installed
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// Write SVG previews of the geometry
    #[arg(long)]
    pub plot: bool,

    /// Write session scripts without running them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Config file (or defaults) with the flags applied on top.
    pub fn resolve_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(settings) = &self.settings {
            config.settings_path = settings.clone();
        }
        if let Some(name) = &self.output_name {
            config.output_name = name.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(iterations) = self.iterations {
            config.solver.iterations = iterations;
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        config.plot |= self.plot;
        config.dry_run |= self.dry_run;
        Ok(config)
    }
}

/// Run `stages` with the resolved configuration.
pub fn execute(args: RunArgs, stages: &[Stage]) -> Result<()> {
    let config = args.resolve_config()?;
    let launcher = script_launcher(&config, &config.data_dir);
    let workflow = Workflow::from_config(config, launcher).context("failed to set up the run")?;
    info!(
        angle = workflow.settings().angle,
        data_dir = %workflow.data_dir().display(),
        "run configured"
    );

    let summary = workflow.run(stages).context("run failed")?;

    if let Some(geometry) = &summary.geometry {
        println!("geometry: {}", geometry.stl.display());
    }
    for preview in &summary.previews {
        println!("preview:  {}", preview.display());
    }
    if let Some(mesh) = &summary.mesh {
        println!("mesh:     {}", mesh.display());
    }
    if let Some(files) = &summary.solver_files {
        println!("case:     {}", files.resolved_case.display());
        println!("report:   {}", files.report.display());
    }
    if let Some(drag) = summary.final_drag {
        println!("drag:     {drag:.6}");
    }
    Ok(())
}
