//! Error types for keychain operations
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


use std::string::FromUtf8Error;
use thiserror::Error;

/// Keychain and toolchain errors
#[derive(Error, Debug)]
pub enum KeychainError {
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("`{command}` failed with exit code {exit_code:?}: {output}")]
    ToolInvocation {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Keychain not found: {0}")]
    KeychainNotFound(String),

    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(String),

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool output is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
}

impl KeychainError {
    /// Exit code reported by the external tool, if this error came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            KeychainError::ToolInvocation { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Result type for keychain operations
pub type KeychainResult<T> = Result<T, KeychainError>;
