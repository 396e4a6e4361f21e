use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use splitflow_format::DragHistory;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Report file written by the solver
    pub file: PathBuf,

    /// Report definition column to read
    #[arg(short, long, default_value = "drag-force1")]
    pub name: String,

    /// Average over this many final samples
    #[arg(long, default_value = "10")]
    pub last: usize,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    let history = DragHistory::load(&args.file, &args.name)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let last = history.last();
    let mean = history.mean_of_last(args.last);

    if args.json {
        let summary = serde_json::json!({
            "column": history.column(),
            "samples": history.samples().len(),
            "last_iteration": last.iteration,
            "last": last.value,
            "mean_of_last": mean,
            "window": args.last.min(history.samples().len())
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("column:     {}", history.column());
    println!("samples:    {}", history.samples().len());
    println!("iteration:  {}", last.iteration);
    println!("last:       {:.6}", last.value);
    println!("mean:       {mean:.6} (last {})", args.last.min(history.samples().len()));
    Ok(())
}
