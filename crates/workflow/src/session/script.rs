//! Sessions rendered to PyFluent scripts and run with a Python interpreter.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};

use serde_json::json;
use tracing::{info, instrument, warn};

use super::{LaunchOptions, Launcher, Session, SessionError, SessionKind};
use crate::command::Command;

const INDENT: &str = "    ";

/// Writes one script per session next to the run's artifacts.
#[derive(Debug, Clone)]
pub struct ScriptLauncher {
    /// Interpreter with `ansys-fluent-core` installed.
    pub python: PathBuf,
    pub script_dir: PathBuf,
    pub output_name: String,
    /// Write scripts without running them.
    pub dry_run: bool,
}

impl ScriptLauncher {
    /// `<script_dir>/<output>_<kind>.py`
    pub fn script_path(&self, kind: SessionKind) -> PathBuf {
        self.script_dir
            .join(format!("{}_{}.py", self.output_name, kind.as_str()))
    }
}

impl Launcher for ScriptLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Session>, SessionError> {
        info!(kind = %options.kind, dry_run = self.dry_run, "opening script session");
        Ok(Box::new(ScriptSession {
            options: options.clone(),
            path: self.script_path(options.kind),
            python: self.python.clone(),
            dry_run: self.dry_run,
            statements: Vec::new(),
            finished: false,
        }))
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Collects statements and runs them as one script on close.
#[derive(Debug)]
pub struct ScriptSession {
    options: LaunchOptions,
    path: PathBuf,
    python: PathBuf,
    dry_run: bool,
    statements: Vec<String>,
    finished: bool,
}

impl ScriptSession {
    fn launch_statement(&self) -> String {
        let o = &self.options;
        let mut launch = Command::call("launch_fluent")
            .kwarg("precision", json!(o.precision.as_str()))
            .kwarg("processor_count", json!(o.processor_count))
            .kwarg("mode", json!(o.kind.as_str()));
        if let Some(ui_mode) = &o.ui_mode {
            launch = launch.kwarg("ui_mode", json!(ui_mode));
        }
        launch = launch.kwarg("cwd", json!(o.cwd.display().to_string()));
        if let Some(timeout) = o.start_timeout {
            launch = launch.kwarg("start_timeout", json!(timeout));
        }
        if let Some(version) = &o.product_version {
            launch = launch.kwarg("product_version", json!(version));
        }
        format!("{} = {}", o.kind.as_str(), launch.render("pyfluent"))
    }

    /// The full script. The remote session is exited on every path.
    pub fn script(&self) -> String {
        let var = self.options.kind.as_str();
        let mut out = String::from("import ansys.fluent.core as pyfluent\n\n");
        out.push_str(&self.launch_statement());
        out.push_str("\ntry:\n");
        if self.statements.is_empty() {
            out.push_str(INDENT);
            out.push_str("pass\n");
        }
        for line in &self.statements {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("finally:\n");
        out.push_str(&format!("{INDENT}{var}.exit()\n"));
        out
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_script(&self) -> Result<(), SessionError> {
        let script_error = |source| SessionError::Script {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(script_error)?;
        }
        std::fs::write(&self.path, self.script()).map_err(script_error)
    }
}

impl Session for ScriptSession {
    fn kind(&self) -> SessionKind {
        self.options.kind
    }

    fn execute(&mut self, command: &Command) -> Result<(), SessionError> {
        if self.finished {
            return Err(SessionError::Closed);
        }
        self.statements
            .push(command.render(self.options.kind.as_str()));
        Ok(())
    }

    #[instrument(skip(self), fields(kind = %self.options.kind, script = %self.path.display()))]
    fn close(&mut self) -> Result<(), SessionError> {
        if self.finished {
            return Err(SessionError::Closed);
        }
        self.finished = true;
        self.write_script()?;
        if self.dry_run {
            info!(statements = self.statements.len(), "dry run, script not executed");
            return Ok(());
        }

        let program = self.python.display().to_string();
        let spawn_error = |source| SessionError::Spawn {
            program: program.clone(),
            source,
        };
        let child = std::process::Command::new(&self.python)
            .arg(&self.path)
            .spawn()
            .map_err(spawn_error)?;
        info!(pid = child.id(), "running script");
        let status = ChildGuard::new(child).wait().map_err(spawn_error)?;
        if !status.success() {
            return Err(SessionError::Failed {
                kind: self.options.kind,
                status: status.to_string(),
            });
        }
        info!("session finished");
        Ok(())
    }

    fn abort(&mut self) {
        if !self.finished {
            warn!(kind = %self.options.kind, "discarding unfinished script");
        }
        self.finished = true;
        self.statements.clear();
    }
}

/// Kills and reaps the child process unless it was waited for.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn wait(mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait();
        self.reaped = true;
        status
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
