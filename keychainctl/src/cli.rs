//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use keychain_manager::{KeychainResult, PasswordOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keychainctl")]
#[command(about = "Manage macOS keychains and certificates from the command line")]
pub struct Cli {
    /// Keychain name; the default keychain is used when omitted
    #[arg(short, long, global = true)]
    pub keychain: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the named keychain
    Create {
        /// Keychain password (empty when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete the named keychain
    Delete,

    /// Lock the keychain
    Lock,

    /// Unlock the keychain
    Unlock {
        #[arg(short, long)]
        password: String,
    },

    /// Exit with success if the keychain is in the search list
    Exists,

    /// Print the resolved keychain file
    Path,

    /// Export all identities to an unprotected PKCS12 file
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a certificate
    ImportCert { path: PathBuf },

    /// Import an unprotected RSA private key
    ImportKey { path: PathBuf },

    /// Store an internet password
    AddInternetPassword {
        #[arg(short, long)]
        account: String,
        #[arg(short, long)]
        server: String,
        #[arg(short, long)]
        password: String,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Look up an internet password and print it as JSON
    FindInternetPassword {
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Delete an internet password
    DeleteInternetPassword {
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Store a generic password
    AddGenericPassword {
        #[arg(short, long)]
        account: String,
        #[arg(short, long)]
        service: String,
        #[arg(short, long)]
        password: String,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Look up a generic password and print it as JSON
    FindGenericPassword {
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Delete a generic password
    DeleteGenericPassword {
        #[command(flatten)]
        options: OptionArgs,
    },

    /// List keychain files in the search list
    List,

    /// Print the default keychain
    Default,

    /// Print the login keychain
    Login,

    /// Generate an RSA private key
    Genrsa {
        #[arg(short, long)]
        output: PathBuf,
        /// Key size in bits (KEYCHAIN_KEY_SIZE or 2048 when omitted)
        #[arg(long)]
        keysize: Option<u32>,
    },

    /// Generate a certificate signing request
    Csr {
        #[arg(long)]
        email: String,
        #[arg(long)]
        country: String,
        /// Private key to sign the request with
        #[arg(long)]
        key: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert an unprotected PKCS12 file to PEM
    P12ToPem {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Password entry attributes given as repeated `-o name=value`
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// Entry attribute, e.g. `-o account=me -o comment="ci token"`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub options: Vec<(String, String)>,
}

impl OptionArgs {
    /// Validate names against the option vocabulary
    pub fn parse(&self) -> KeychainResult<PasswordOptions> {
        PasswordOptions::from_pairs(self.options.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", s))
}
