//! In-memory sessions that record what they were asked to do.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use super::{LaunchOptions, Launcher, Session, SessionError, SessionKind};
use crate::command::Command;

/// Lifecycle and command log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Launched(SessionKind),
    /// A command, rendered as a statement on the session variable.
    Executed(SessionKind, String),
    Closed(SessionKind),
    Aborted(SessionKind),
}

type EventLog = Rc<RefCell<Vec<SessionEvent>>>;

/// A file a session writes when it closes, standing in for tool output.
#[derive(Debug, Clone)]
struct Output {
    kind: SessionKind,
    path: PathBuf,
    contents: String,
}

/// Launches [`RecordingSession`]s sharing one event log.
///
/// Reports itself as a dry run unless [`Self::checking_artifacts`] is used.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    events: EventLog,
    launched: Rc<RefCell<Vec<LaunchOptions>>>,
    fail_at: Option<(SessionKind, usize)>,
    fail_launch: Option<SessionKind>,
    check_artifacts: bool,
    outputs: Vec<Output>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions of `kind` reject their `index`-th command (from zero).
    pub fn failing_at(mut self, kind: SessionKind, index: usize) -> Self {
        self.fail_at = Some((kind, index));
        self
    }

    /// Launching a session of `kind` fails.
    pub fn failing_launch(mut self, kind: SessionKind) -> Self {
        self.fail_launch = Some(kind);
        self
    }

    /// Behave like a real launcher, so missing artifacts are detected.
    pub fn checking_artifacts(mut self) -> Self {
        self.check_artifacts = true;
        self
    }

    /// Sessions of `kind` write `contents` to `path` when they close.
    pub fn writing(mut self, kind: SessionKind, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.outputs.push(Output {
            kind,
            path: path.into(),
            contents: contents.to_string(),
        });
        self
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    /// Options of every launch so far.
    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.launched.borrow().clone()
    }

    /// Statements executed by sessions of `kind`.
    pub fn commands(&self, kind: SessionKind) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Executed(k, line) if *k == kind => Some(line.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Session>, SessionError> {
        if self.fail_launch == Some(options.kind) {
            return Err(SessionError::Spawn {
                program: options.kind.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "launch refused"),
            });
        }
        self.launched.borrow_mut().push(options.clone());
        self.events
            .borrow_mut()
            .push(SessionEvent::Launched(options.kind));
        let fail_at = self
            .fail_at
            .filter(|(kind, _)| *kind == options.kind)
            .map(|(_, index)| index);
        Ok(Box::new(RecordingSession {
            kind: options.kind,
            events: Rc::clone(&self.events),
            executed: 0,
            fail_at,
            outputs: self
                .outputs
                .iter()
                .filter(|o| o.kind == options.kind)
                .cloned()
                .collect(),
        }))
    }

    fn is_dry_run(&self) -> bool {
        !self.check_artifacts
    }
}

/// A session that logs commands instead of sending them anywhere.
#[derive(Debug)]
pub struct RecordingSession {
    kind: SessionKind,
    events: EventLog,
    executed: usize,
    fail_at: Option<usize>,
    outputs: Vec<Output>,
}

impl Session for RecordingSession {
    fn kind(&self) -> SessionKind {
        self.kind
    }

    fn execute(&mut self, command: &Command) -> Result<(), SessionError> {
        let line = command.render(self.kind.as_str());
        if self.fail_at == Some(self.executed) {
            return Err(SessionError::Rejected {
                kind: self.kind,
                command: line,
            });
        }
        self.executed += 1;
        self.events
            .borrow_mut()
            .push(SessionEvent::Executed(self.kind, line));
        Ok(())
    }

    fn close(&mut self) -> Result<(), SessionError> {
        for output in &self.outputs {
            std::fs::write(&output.path, &output.contents).map_err(|e| SessionError::Failed {
                kind: self.kind,
                status: format!("could not write {}: {e}", output.path.display()),
            })?;
        }
        self.events.borrow_mut().push(SessionEvent::Closed(self.kind));
        Ok(())
    }

    fn abort(&mut self) {
        self.events.borrow_mut().push(SessionEvent::Aborted(self.kind));
    }
}
