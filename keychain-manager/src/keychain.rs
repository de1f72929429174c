//! High-level keychain interface
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
use crate::options::{flags_for_options, OptionName, PasswordOptions};
use crate::parser::{error_report, parse_credential_output, CredentialRecord};
use crate::runner::{path_arg, Invocation};
use crate::security::{SecurityCommand, SecurityTool};
use std::path::Path;
use tracing::{debug, info, warn};

/// A keychain managed through the `security` tool.
///
/// A manager is either bound to a named keychain or, when built without a
/// name, to the user's default keychain. The default keychain can be used
/// but never created or deleted.
#[derive(Debug, Clone)]
pub struct KeychainManager {
    name: Option<String>,
    /// Resolved keychain file, cleared by [`delete`](Self::delete)
    filename: Option<String>,
    security: SecurityTool,
}

impl KeychainManager {
    /// Manager for the keychain called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_tool(Some(name.into()), SecurityTool::system())
    }

    /// Manager for the user's default keychain
    pub fn default_keychain() -> Self {
        Self::with_tool(None, SecurityTool::system())
    }

    /// Manager using `security`; an empty name means the default keychain
    pub fn with_tool(name: Option<String>, security: SecurityTool) -> Self {
        Self {
            name: name.filter(|name| !name.is_empty()),
            filename: None,
            security,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }

    /// Resolve and cache the keychain file.
    ///
    /// A named keychain resolves to the last listed keychain file whose path
    /// contains the name. Returns `None` when nothing matches; a miss is not
    /// cached, so a later call sees a keychain created in the meantime.
    pub fn resolve(&mut self) -> KeychainResult<Option<&str>> {
        if self.filename.is_none() {
            self.filename = match &self.name {
                Some(name) => self
                    .security
                    .keychain_files()?
                    .into_iter()
                    .filter(|file| file.contains(name.as_str()))
                    .last(),
                None => Some(self.security.default_keychain()?),
            };
            debug!(name = ?self.name, filename = ?self.filename, "Resolved keychain");
        }
        Ok(self.filename.as_deref())
    }

    /// Resolved keychain file, or [`KeychainError::KeychainNotFound`]
    pub fn filename(&mut self) -> KeychainResult<String> {
        let label = self.label();
        self.resolve()?
            .map(str::to_string)
            .ok_or(KeychainError::KeychainNotFound(label))
    }

    /// Whether the keychain is in the search list
    pub fn exists(&mut self) -> KeychainResult<bool> {
        Ok(self.resolve()?.is_some())
    }

    /// Create the keychain with an empty password
    pub fn create(&mut self) -> KeychainResult<()> {
        self.create_with_password("")
    }

    pub fn create_with_password(&mut self, password: &str) -> KeychainResult<()> {
        let name = self.require_named("create")?;
        info!(keychain = %name, "Creating keychain");

        let invocation = self
            .security
            .invocation(SecurityCommand::CreateKeychain)
            .arg("-p")
            .secret_arg(password)
            .arg(name);
        self.security.call(&invocation)?;
        Ok(())
    }

    /// Delete the keychain and forget its resolved file
    pub fn delete(&mut self) -> KeychainResult<()> {
        let name = self.require_named("delete")?;
        let filename = self.filename()?;
        info!(keychain = %name, filename = %filename, "Deleting keychain");

        let invocation = self
            .security
            .invocation(SecurityCommand::DeleteKeychain)
            .arg(filename);
        self.security.call(&invocation)?;
        self.filename = None;
        Ok(())
    }

    pub fn lock(&mut self) -> KeychainResult<()> {
        let filename = self.filename()?;
        info!(filename = %filename, "Locking keychain");

        let invocation = self
            .security
            .invocation(SecurityCommand::LockKeychain)
            .arg(filename);
        self.security.call(&invocation)?;
        Ok(())
    }

    pub fn unlock(&mut self, password: &str) -> KeychainResult<()> {
        let filename = self.filename()?;
        info!(filename = %filename, "Unlocking keychain");

        let invocation = self
            .security
            .invocation(SecurityCommand::UnlockKeychain)
            .arg("-p")
            .secret_arg(password)
            .arg(filename);
        self.security.call(&invocation)?;
        Ok(())
    }

    /// Export every identity as an unprotected PKCS12 file
    pub fn export_identities(&mut self, p12_file_path: &Path) -> KeychainResult<()> {
        let filename = self.filename()?;
        info!(filename = %filename, to = %p12_file_path.display(), "Exporting identities");

        let invocation = self
            .security
            .invocation(SecurityCommand::Export)
            .args(["-k".to_string(), filename])
            .args(["-t", "identities", "-f", "pkcs12", "-P", "", "-o"])
            .arg(path_arg(p12_file_path)?);
        self.security.call(&invocation)?;
        Ok(())
    }

    /// Import a certificate, returning the tool output
    pub fn import_apple_cert(&mut self, cert_file_path: &Path) -> KeychainResult<String> {
        let filename = self.filename()?;
        info!(filename = %filename, from = %cert_file_path.display(), "Importing certificate");

        let invocation = self
            .security
            .invocation(SecurityCommand::Import)
            .arg(path_arg(cert_file_path)?)
            .arg("-k")
            .arg(filename);
        self.security.check_output(&invocation)
    }

    /// Import an unprotected RSA private key, returning the tool output
    pub fn import_rsa_key(&mut self, rsa_file_path: &Path) -> KeychainResult<String> {
        let filename = self.filename()?;
        info!(filename = %filename, from = %rsa_file_path.display(), "Importing RSA key");

        let invocation = self
            .security
            .invocation(SecurityCommand::Import)
            .arg(path_arg(rsa_file_path)?)
            .args(["-P", "", "-k"])
            .arg(filename);
        self.security.check_output(&invocation)
    }

    /// Store an internet password; `extra` supplies further attributes
    pub fn add_internet_password(
        &mut self,
        account: &str,
        server: &str,
        password: &str,
        extra: &PasswordOptions,
    ) -> KeychainResult<()> {
        let required = PasswordOptions::new()
            .with(OptionName::Account, account)
            .with(OptionName::Server, server)
            .with(OptionName::Password, password);
        let options = extra.clone().merge(&required);

        info!(account = %account, server = %server, "Adding internet password");
        self.run_password_command(SecurityCommand::AddInternetPassword, &options)
    }

    pub fn delete_internet_password(&mut self, options: &PasswordOptions) -> KeychainResult<()> {
        info!(account = ?options.account, server = ?options.server, "Deleting internet password");
        self.run_password_command(SecurityCommand::DeleteInternetPassword, options)
    }

    /// Look up an internet password; a missing entry is
    /// [`KeychainError::ToolInvocation`]
    pub fn find_internet_password(&mut self, options: &PasswordOptions) -> KeychainResult<CredentialRecord> {
        self.find_password(SecurityCommand::FindInternetPassword, options)
    }

    /// Store a generic password; `extra` supplies further attributes
    pub fn add_generic_password(
        &mut self,
        account: &str,
        service: &str,
        password: &str,
        extra: &PasswordOptions,
    ) -> KeychainResult<()> {
        let required = PasswordOptions::new()
            .with(OptionName::Account, account)
            .with(OptionName::Service, service)
            .with(OptionName::Password, password);
        let options = extra.clone().merge(&required);

        info!(account = %account, service = %service, "Adding generic password");
        self.run_password_command(SecurityCommand::AddGenericPassword, &options)
    }

    pub fn delete_generic_password(&mut self, options: &PasswordOptions) -> KeychainResult<()> {
        info!(account = ?options.account, service = ?options.service, "Deleting generic password");
        self.run_password_command(SecurityCommand::DeleteGenericPassword, options)
    }

    /// Look up a generic password; a missing entry is
    /// [`KeychainError::ToolInvocation`]
    pub fn find_generic_password(&mut self, options: &PasswordOptions) -> KeychainResult<CredentialRecord> {
        self.find_password(SecurityCommand::FindGenericPassword, options)
    }

    fn password_invocation(
        &mut self,
        command: SecurityCommand,
        prefix: &[&str],
        options: &PasswordOptions,
    ) -> KeychainResult<Invocation> {
        let filename = self.filename()?;
        let secret_flag = format!("-{}", OptionName::Password.flag());
        let mut invocation = self.security.invocation(command).args(prefix.iter().copied());

        // flag/value pairs, then the target on its own
        for chunk in flags_for_options(options, &filename).chunks(2) {
            invocation = match chunk {
                [flag, value] if *flag == secret_flag => {
                    invocation.arg(flag.as_str()).secret_arg(value.as_str())
                }
                _ => invocation.args(chunk.iter().map(String::as_str)),
            };
        }
        Ok(invocation)
    }

    fn run_password_command(&mut self, command: SecurityCommand, options: &PasswordOptions) -> KeychainResult<()> {
        let invocation = self.password_invocation(command, &[], options)?;
        self.security.call(&invocation)?;
        Ok(())
    }

    fn find_password(&mut self, command: SecurityCommand, options: &PasswordOptions) -> KeychainResult<CredentialRecord> {
        let invocation = self.password_invocation(command, &["-g"], options)?;
        match self.security.check_output(&invocation) {
            Ok(output) => Ok(parse_credential_output(&output)),
            Err(e) => {
                if let KeychainError::ToolInvocation { output, .. } = &e {
                    warn!(
                        command = %command,
                        report = error_report(output).unwrap_or("<none>"),
                        "Password lookup failed"
                    );
                }
                Err(e)
            }
        }
    }

    fn require_named(&self, operation: &str) -> KeychainResult<String> {
        self.name.clone().ok_or_else(|| {
            KeychainError::UnsupportedOperation(format!("can't {} the default keychain", operation))
        })
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| "default keychain".to_string())
    }
}
