//! The macOS `security` command-line tool
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
use crate::parser::parse_keychain_list;
use crate::runner::{CommandRunner, Invocation, SystemRunner};
use std::fmt;
use std::sync::Arc;

/// Default program name
pub const SECURITY_PROGRAM: &str = "security";

/// Subcommands of `security` used by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityCommand {
    CreateKeychain,
    DeleteKeychain,
    LockKeychain,
    UnlockKeychain,
    Export,
    Import,
    ListKeychains,
    DefaultKeychain,
    LoginKeychain,
    AddInternetPassword,
    DeleteInternetPassword,
    FindInternetPassword,
    AddGenericPassword,
    DeleteGenericPassword,
    FindGenericPassword,
}

impl SecurityCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityCommand::CreateKeychain => "create-keychain",
            SecurityCommand::DeleteKeychain => "delete-keychain",
            SecurityCommand::LockKeychain => "lock-keychain",
            SecurityCommand::UnlockKeychain => "unlock-keychain",
            SecurityCommand::Export => "export",
            SecurityCommand::Import => "import",
            SecurityCommand::ListKeychains => "list-keychains",
            SecurityCommand::DefaultKeychain => "default-keychain",
            SecurityCommand::LoginKeychain => "login-keychain",
            SecurityCommand::AddInternetPassword => "add-internet-password",
            SecurityCommand::DeleteInternetPassword => "delete-internet-password",
            SecurityCommand::FindInternetPassword => "find-internet-password",
            SecurityCommand::AddGenericPassword => "add-generic-password",
            SecurityCommand::DeleteGenericPassword => "delete-generic-password",
            SecurityCommand::FindGenericPassword => "find-generic-password",
        }
    }
}

impl fmt::Display for SecurityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless handle on the `security` tool
#[derive(Clone)]
pub struct SecurityTool {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl SecurityTool {
    /// `security` from `PATH`, run as a child process
    pub fn system() -> Self {
        Self::new(SECURITY_PROGRAM, Arc::new(SystemRunner))
    }

    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Start an invocation of `command`
    pub fn invocation(&self, command: SecurityCommand) -> Invocation {
        Invocation::new(&self.program).arg(command.as_str())
    }

    /// Run without checking the exit status
    pub fn call(&self, invocation: &Invocation) -> KeychainResult<Option<i32>> {
        self.runner.call(invocation)
    }

    /// Run and return the combined output; a non-zero exit is an error
    pub fn check_output(&self, invocation: &Invocation) -> KeychainResult<String> {
        self.runner.check_output(invocation)
    }

    /// Keychain files in the search list
    pub fn keychain_files(&self) -> KeychainResult<Vec<String>> {
        let output = self.check_output(&self.invocation(SecurityCommand::ListKeychains))?;
        Ok(parse_keychain_list(&output))
    }

    /// Path of the user's default keychain
    pub fn default_keychain(&self) -> KeychainResult<String> {
        self.first_listed(SecurityCommand::DefaultKeychain, "default keychain")
    }

    /// Path of the user's login keychain
    pub fn login_keychain(&self) -> KeychainResult<String> {
        self.first_listed(SecurityCommand::LoginKeychain, "login keychain")
    }

    fn first_listed(&self, command: SecurityCommand, what: &str) -> KeychainResult<String> {
        let output = self.check_output(&self.invocation(command))?;
        parse_keychain_list(&output)
            .into_iter()
            .next()
            .ok_or_else(|| KeychainError::KeychainNotFound(what.to_string()))
    }
}

impl fmt::Debug for SecurityTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityTool")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}
