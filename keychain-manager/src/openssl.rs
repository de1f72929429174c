//! Key, certificate request and PKCS12 handling through `openssl`
//!
//! All cryptography is done by the external toolchain; this module only
//! builds the command lines.
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


use crate::error::KeychainResult;
use crate::runner::{path_arg, CommandRunner, Invocation, SystemRunner};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Default program name
pub const OPENSSL_PROGRAM: &str = "openssl";

/// RSA modulus size used when the caller does not pick one
pub const DEFAULT_KEY_SIZE: u32 = 2048;

/// Subject line for a certificate signing request
pub fn cert_request_subject(email: &str, country: &str) -> String {
    format!("/CN={}, C={}", email, country)
}

/// Stateless handle on the `openssl` toolchain
#[derive(Clone)]
pub struct OpenSsl {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl OpenSsl {
    /// `openssl` from `PATH`, run as a child process
    pub fn system() -> Self {
        Self::new(OPENSSL_PROGRAM, Arc::new(SystemRunner))
    }

    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Generate an RSA private key at `rsa_file_path`, returning the tool output
    pub fn generate_rsa_key(&self, rsa_file_path: &Path, keysize: u32) -> KeychainResult<String> {
        info!(path = %rsa_file_path.display(), keysize, "Generating RSA key");

        let invocation = Invocation::new(&self.program)
            .args(["genrsa", "-out"])
            .arg(path_arg(rsa_file_path)?)
            .arg(keysize.to_string());
        self.runner.check_output(&invocation)
    }

    /// Write a certificate signing request for `email`/`country` signed with
    /// the key at `rsa_file_path`.
    ///
    /// The exit status is not checked.
    pub fn generate_cert_request(
        &self,
        email: &str,
        country: &str,
        rsa_file_path: &Path,
        cert_file_path: &Path,
    ) -> KeychainResult<()> {
        info!(path = %cert_file_path.display(), "Generating certificate request");

        let invocation = Invocation::new(&self.program)
            .args(["req", "-new", "-key"])
            .arg(path_arg(rsa_file_path)?)
            .arg("-out")
            .arg(path_arg(cert_file_path)?)
            .arg("-subj")
            .arg(cert_request_subject(email, country));
        self.runner.call(&invocation)?;
        Ok(())
    }

    /// Convert an unprotected PKCS12 bundle to PEM without encrypting the key.
    ///
    /// The exit status is not checked.
    pub fn convert_p12_to_pem(&self, p12_file_path: &Path, pem_file_path: &Path) -> KeychainResult<()> {
        info!(
            from = %p12_file_path.display(),
            to = %pem_file_path.display(),
            "Converting PKCS12 to PEM"
        );

        let invocation = Invocation::new(&self.program)
            .args(["pkcs12", "-passin", "pass:", "-nodes", "-in"])
            .arg(path_arg(p12_file_path)?)
            .arg("-out")
            .arg(path_arg(pem_file_path)?);
        self.runner.call(&invocation)?;
        Ok(())
    }
}

impl fmt::Debug for OpenSsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSsl")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}
