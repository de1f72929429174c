//! keychainctl
//!
//! Command-line front end for the keychain manager:
//! - Creates, deletes, locks and unlocks keychains
//! - Adds, finds and deletes internet and generic passwords
//! - Imports certificates and keys, exports identities
//! - Generates RSA keys and certificate requests with `openssl`
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


mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use keychain_config::{AppConfig, LogFormat};
use keychain_logging::{init_console_logging, init_logging};
use keychain_manager::{
    CredentialRecord, KeychainManager, OpenSsl, SecurityTool, SystemRunner, DEFAULT_KEY_SIZE,
};
use std::sync::Arc;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    match config.log_format {
        LogFormat::Json => init_logging("keychainctl", config.log_level()),
        LogFormat::Console => init_console_logging("keychainctl", config.log_level()),
    }

    let tools = config.tools();
    debug!(
        security = %tools.security_bin,
        openssl = %tools.openssl_bin,
        "Configuration loaded"
    );

    let runner = Arc::new(SystemRunner);
    let security = SecurityTool::new(tools.security_bin, runner.clone());
    let openssl = OpenSsl::new(tools.openssl_bin, runner);

    let keychain_name = cli.keychain.clone().or_else(|| config.name.clone());
    let mut manager = KeychainManager::with_tool(keychain_name, security.clone());

    match cli.command {
        Command::Create { password } => match password {
            Some(password) => manager.create_with_password(&password)?,
            None => manager.create()?,
        },
        Command::Delete => manager.delete()?,
        Command::Lock => manager.lock()?,
        Command::Unlock { password } => manager.unlock(&password)?,
        Command::Exists => {
            let exists = manager.exists()?;
            println!("{}", exists);
            if !exists {
                std::process::exit(1);
            }
        }
        Command::Path => println!("{}", manager.filename()?),
        Command::Export { output } => manager.export_identities(&output)?,
        Command::ImportCert { path } => print!("{}", manager.import_apple_cert(&path)?),
        Command::ImportKey { path } => print!("{}", manager.import_rsa_key(&path)?),
        Command::AddInternetPassword { account, server, password, options } => {
            manager.add_internet_password(&account, &server, &password, &options.parse()?)?
        }
        Command::FindInternetPassword { options } => {
            print_record(&manager.find_internet_password(&options.parse()?)?)?
        }
        Command::DeleteInternetPassword { options } => {
            manager.delete_internet_password(&options.parse()?)?
        }
        Command::AddGenericPassword { account, service, password, options } => {
            manager.add_generic_password(&account, &service, &password, &options.parse()?)?
        }
        Command::FindGenericPassword { options } => {
            print_record(&manager.find_generic_password(&options.parse()?)?)?
        }
        Command::DeleteGenericPassword { options } => {
            manager.delete_generic_password(&options.parse()?)?
        }
        Command::List => {
            for file in security.keychain_files()? {
                println!("{}", file);
            }
        }
        Command::Default => println!("{}", security.default_keychain()?),
        Command::Login => println!("{}", security.login_keychain()?),
        Command::Genrsa { output, keysize } => {
            let keysize = keysize.or(config.key_size).unwrap_or(DEFAULT_KEY_SIZE);
            print!("{}", openssl.generate_rsa_key(&output, keysize)?);
        }
        Command::Csr { email, country, key, output } => {
            openssl.generate_cert_request(&email, &country, &key, &output)?
        }
        Command::P12ToPem { input, output } => openssl.convert_p12_to_pem(&input, &output)?,
    }

    Ok(())
}

fn print_record(record: &CredentialRecord) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(record).context("Failed to serialize record")?
    );
    Ok(())
}
