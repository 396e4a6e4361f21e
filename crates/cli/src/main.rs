//! `splitflow`: split-cylinder drag study from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::run::RunArgs;
use splitflow_workflow::Stage;

#[derive(Parser)]
#[command(name = "splitflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Geometry, meshing and drag simulation of a split cylinder", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and export the geometry
    Geometry(RunArgs),
    /// Mesh the exported geometry
    Mesh(RunArgs),
    /// Solve on the mesh
    Solve(RunArgs),
    /// Run geometry, mesh and solve in order
    Run(RunArgs),
    /// Summarize a drag report
    Report(commands::report::ReportArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Geometry(args) => commands::run::execute(args, &[Stage::Geometry]),
        Commands::Mesh(args) => commands::run::execute(args, &[Stage::Mesh]),
        Commands::Solve(args) => commands::run::execute(args, &[Stage::Solve]),
        Commands::Run(args) => commands::run::execute(args, &Stage::ALL),
        Commands::Report(args) => commands::report::execute(args),
    }
}
