//! Commands sent to a remote session, and the named tasks grouping them.

use serde_json::Value;

use crate::python::literal;

/// One statement against the remote session object.
///
/// `target` is a dotted path relative to the session, e.g.
/// `solution.initialization.hybrid_initialize`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `target(args..., key=value...)`
    Call {
        target: String,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    },
    /// `target = value`
    Assign { target: String, value: Value },
}

impl Command {
    pub fn call(target: impl Into<String>) -> Self {
        Self::Call {
            target: target.into(),
            args: Vec::new(),
            kwargs: Vec::new(),
        }
    }

    pub fn assign(target: impl Into<String>, value: Value) -> Self {
        Self::Assign {
            target: target.into(),
            value,
        }
    }

    /// Append a positional argument; no effect on assignments.
    pub fn arg(mut self, value: Value) -> Self {
        if let Self::Call { args, .. } = &mut self {
            args.push(value);
        }
        self
    }

    /// Append a keyword argument; no effect on assignments.
    pub fn kwarg(mut self, key: &str, value: Value) -> Self {
        if let Self::Call { kwargs, .. } = &mut self {
            kwargs.push((key.to_string(), value));
        }
        self
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Call { target, .. } | Self::Assign { target, .. } => target,
        }
    }

    /// Render as one Python statement on the object named `session`.
    pub fn render(&self, session: &str) -> String {
        match self {
            Self::Call {
                target,
                args,
                kwargs,
            } => {
                let mut params: Vec<String> = args.iter().map(literal).collect();
                params.extend(kwargs.iter().map(|(k, v)| format!("{k}={}", literal(v))));
                format!("{session}.{target}({})", params.join(", "))
            }
            Self::Assign { target, value } => {
                format!("{session}.{target} = {}", literal(value))
            }
        }
    }
}

/// A named group of commands that succeeds or fails as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: &'static str,
    pub commands: Vec<Command>,
}

impl Task {
    pub fn new(name: &'static str, commands: Vec<Command>) -> Self {
        Self { name, commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_call() {
        let cmd = Command::call("file.write")
            .kwarg("file_name", json!("mono.cas.h5"))
            .kwarg("file_type", json!("case"));
        assert_eq!(
            cmd.render("solver"),
            "solver.file.write(file_name=\"mono.cas.h5\", file_type=\"case\")"
        );
    }

    #[test]
    fn test_render_positional_and_empty_calls() {
        let cmd = Command::call("workflow.TaskObject[\"Import Geometry\"].Arguments.set_state")
            .arg(json!({"FileName": "mono.stl"}));
        assert_eq!(
            cmd.render("meshing"),
            "meshing.workflow.TaskObject[\"Import Geometry\"].Arguments.set_state({\"FileName\": \"mono.stl\"})"
        );
        assert_eq!(Command::call("mesh.check").render("solver"), "solver.mesh.check()");
    }

    #[test]
    fn test_render_assign() {
        let cmd = Command::assign("setup.reference_values.density", json!(1.225));
        assert_eq!(cmd.render("solver"), "solver.setup.reference_values.density = 1.225");
    }

    #[test]
    fn test_kwarg_on_assign_is_ignored() {
        let cmd = Command::assign("a", json!(1)).kwarg("b", json!(2));
        assert_eq!(cmd, Command::assign("a", json!(1)));
        assert_eq!(cmd.target(), "a");
    }
}
