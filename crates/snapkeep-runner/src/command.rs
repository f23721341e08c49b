//! External command templates
//!
//! The archiver and the uploader are external programs. A template names the
//! program and its arguments; `{name}` placeholders in the arguments are
//! filled in per invocation.

use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{Command, Output};

/// Program plus argument template
///
/// # Examples
///
/// ```
/// use snapkeep_runner::CommandTemplate;
/// use std::ffi::OsStr;
///
/// let template = CommandTemplate::new("gdrive", ["upload", "--parent", "{destination}", "{artifact}"]);
/// let args = template.render_args(&[
///     ("destination", OsStr::new("folder-id")),
///     ("artifact", OsStr::new("/backups/site_20240101-000000.zip")),
/// ]);
/// assert_eq!(args[2], "folder-id");
/// assert_eq!(args[3], "/backups/site_20240101-000000.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    /// Program to run, looked up on `PATH` unless it contains a separator
    pub program: String,

    /// Arguments, possibly containing `{name}` placeholders
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandTemplate {
    /// Create a template
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments with placeholders substituted
    ///
    /// An argument that is exactly one placeholder is replaced by the raw
    /// value, so non-UTF-8 paths pass through untouched.
    pub fn render_args(&self, vars: &[(&str, &OsStr)]) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| {
                let whole = arg.strip_prefix('{').and_then(|a| a.strip_suffix('}'));
                if let Some((_, value)) = vars.iter().find(|(name, _)| Some(*name) == whole) {
                    return value.to_os_string();
                }

                let mut rendered = arg.clone();
                for (name, value) in vars {
                    rendered = rendered.replace(&format!("{{{name}}}"), &value.to_string_lossy());
                }
                OsString::from(rendered)
            })
            .collect()
    }

    /// Run to completion, capturing output
    pub fn run(&self, vars: &[(&str, &OsStr)], cwd: Option<&Path>) -> io::Result<Output> {
        let mut command = Command::new(&self.program);
        command.args(self.render_args(vars));
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        tracing::debug!(program = %self.program, "Running external command");
        command.output()
    }
}

/// Most useful diagnostic text from a finished command
pub(crate) fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        "no output".to_string()
    } else {
        stdout.to_string()
    }
}
