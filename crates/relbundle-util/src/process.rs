use std::collections::HashMap;
use std::process::{Command, Output};

use crate::errors::ReleaseError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments and environment variables.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Execute the command and return its output.
    pub fn exec(&self) -> Result<Output, ReleaseError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        tracing::debug!("Running {}", self.program);
        cmd.output().map_err(ReleaseError::from)
    }

    /// Execute the command and fail unless it exits successfully.
    ///
    /// A program that cannot be started, or exits non-zero, is a signing
    /// failure carrying the program's stderr.
    pub fn exec_checked(&self) -> Result<Output, ReleaseError> {
        let output = self.exec().map_err(|e| ReleaseError::Signing {
            message: format!("Failed to run {}: {e}", self.program),
        })?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(ReleaseError::Signing {
                message: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
