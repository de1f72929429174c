//! External process invocation
//!
//! Every keychain and toolchain operation is one blocking call to an external
//! program. [`CommandRunner`] is the seam between building a command and running
//! it, so alternative runners can be plugged in:
//! - [`SystemRunner`] spawns the program with `std::process::Command`
//! - test runners can record invocations and return canned output
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::error::{KeychainError, KeychainResult};
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// A program and its arguments, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    /// Indexes into `args` that must not be logged
    secrets: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that is redacted when the invocation is displayed
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secrets.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// First argument, which is the subcommand for `security` and `openssl`
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if self.secrets.contains(&idx) {
                f.write_str(" ***")?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs [`Invocation`]s
pub trait CommandRunner: Send + Sync {
    /// Run and wait, returning the exit code.
    ///
    /// A non-zero exit is not an error here; only failing to start the
    /// program is.
    fn call(&self, invocation: &Invocation) -> KeychainResult<Option<i32>>;

    /// Run and capture stdout followed by stderr.
    ///
    /// A non-zero exit is [`KeychainError::ToolInvocation`].
    fn check_output(&self, invocation: &Invocation) -> KeychainResult<String>;
}

/// Runner backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(invocation.program());
        command.args(invocation.arguments());
        command
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> KeychainError {
        KeychainError::Spawn {
            program: invocation.program().to_string(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn call(&self, invocation: &Invocation) -> KeychainResult<Option<i32>> {
        debug!(command = %invocation, "Running");

        let status = Self::command(invocation)
            .status()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        if !status.success() {
            warn!(
                command = %invocation,
                exit_code = ?status.code(),
                "Command exited with failure, ignoring"
            );
        }

        Ok(status.code())
    }

    fn check_output(&self, invocation: &Invocation) -> KeychainResult<String> {
        debug!(command = %invocation, "Running and capturing output");

        let output = Self::command(invocation)
            .output()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        // `find-*-password -g` prints the password on stderr
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(KeychainError::ToolInvocation {
                command: invocation.to_string(),
                exit_code: output.status.code(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }

        Ok(String::from_utf8(combined)?)
    }
}

/// Convert a caller-supplied path into a command argument
pub fn path_arg(path: &Path) -> KeychainResult<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| KeychainError::InvalidPath(path.to_string_lossy().into_owned()))
}
