//! Long-running sessions with the external meshing and solver tools.
//!
//! A [`Launcher`] opens a [`Session`]; callers hold it through a
//! [`SessionGuard`], which aborts the session on every exit path that does
//! not close it explicitly.

pub mod recording;
pub mod script;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::command::Command;

pub use recording::{RecordingLauncher, RecordingSession, SessionEvent};
pub use script::{ScriptLauncher, ScriptSession};

/// Which tool a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Meshing,
    Solver,
}

impl SessionKind {
    /// Launch mode name, also used as the session variable in scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meshing => "meshing",
            Self::Solver => "solver",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating-point precision of the remote tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl Precision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

/// Everything needed to start one session.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub kind: SessionKind,
    pub precision: Precision,
    pub processor_count: u32,
    /// Working directory of the remote tool.
    pub cwd: PathBuf,
    pub ui_mode: Option<String>,
    /// Seconds to wait for the tool to start.
    pub start_timeout: Option<u32>,
    pub product_version: Option<String>,
}

impl LaunchOptions {
    pub fn new(kind: SessionKind, cwd: PathBuf) -> Self {
        Self {
            kind,
            precision: Precision::Double,
            processor_count: 1,
            cwd,
            ui_mode: None,
            start_timeout: None,
            product_version: None,
        }
    }
}

/// Errors raised by sessions and launchers.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write session script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} session exited with {status}")]
    Failed { kind: SessionKind, status: String },

    #[error("{kind} session rejected `{command}`")]
    Rejected { kind: SessionKind, command: String },

    #[error("session is already closed")]
    Closed,
}

/// A live connection to a remote tool.
pub trait Session {
    fn kind(&self) -> SessionKind;

    /// Run one command, blocking until the tool has processed it.
    fn execute(&mut self, command: &Command) -> Result<(), SessionError>;

    /// Shut the tool down cleanly, blocking until it has exited.
    fn close(&mut self) -> Result<(), SessionError>;

    /// Tear the session down without waiting for outstanding work.
    fn abort(&mut self);
}

/// Starts sessions.
pub trait Launcher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Session>, SessionError>;

    /// True when launched sessions never touch the real tools, so their
    /// output artifacts will not appear.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Owns a session and aborts it when dropped unclosed.
pub struct SessionGuard {
    session: Option<Box<dyn Session>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn launch(launcher: &dyn Launcher, options: &LaunchOptions) -> Result<Self, SessionError> {
        Ok(Self::new(launcher.launch(options)?))
    }

    pub fn execute(&mut self, command: &Command) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::Closed)?;
        debug!(kind = %session.kind(), target = command.target(), "execute");
        session.execute(command)
    }

    /// Close the session; a failed close still aborts it.
    pub fn close(mut self) -> Result<(), SessionError> {
        let Some(mut session) = self.session.take() else {
            return Err(SessionError::Closed);
        };
        let result = session.close();
        if result.is_err() {
            session.abort();
        }
        result
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            warn!(kind = %session.kind(), "aborting unclosed session");
            session.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> LaunchOptions {
        LaunchOptions::new(SessionKind::Solver, PathBuf::from("outputs"))
    }

    #[test]
    fn test_close_does_not_abort() {
        let launcher = RecordingLauncher::new();
        let mut guard = SessionGuard::launch(&launcher, &options()).unwrap();
        guard.execute(&Command::call("mesh.check")).unwrap();
        guard.close().unwrap();
        assert_eq!(
            launcher.events(),
            [
                SessionEvent::Launched(SessionKind::Solver),
                SessionEvent::Executed(SessionKind::Solver, "solver.mesh.check()".into()),
                SessionEvent::Closed(SessionKind::Solver),
            ]
        );
    }

    #[test]
    fn test_drop_aborts() {
        let launcher = RecordingLauncher::new();
        {
            let _guard = SessionGuard::launch(&launcher, &options()).unwrap();
        }
        assert_eq!(
            launcher.events().last(),
            Some(&SessionEvent::Aborted(SessionKind::Solver))
        );
    }

    #[test]
    fn test_error_path_aborts() {
        let launcher = RecordingLauncher::new().failing_at(SessionKind::Solver, 1);
        let run = || -> Result<(), SessionError> {
            let mut guard = SessionGuard::launch(&launcher, &options())?;
            guard.execute(&Command::call("mesh.check"))?;
            guard.execute(&Command::assign("setup.models.viscous.model", json!("k-omega")))?;
            guard.close()
        };
        assert!(matches!(run(), Err(SessionError::Rejected { .. })));
        let events = launcher.events();
        assert_eq!(events.last(), Some(&SessionEvent::Aborted(SessionKind::Solver)));
        assert!(!events.contains(&SessionEvent::Closed(SessionKind::Solver)));
    }

    #[test]
    fn test_precision_names() {
        assert_eq!(Precision::default().as_str(), "double");
        assert_eq!(serde_json::to_string(&Precision::Single).unwrap(), "\"single\"");
    }
}
