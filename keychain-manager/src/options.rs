//! Password entry options and their `security` flags
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
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option names understood by the password subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionName {
    /// Account name
    Account,
    /// Comment string
    Comment,
    /// Four-character creator code
    Creator,
    /// Kind description
    Kind,
    /// Password data
    Password,
    /// Path (internet passwords)
    Path,
    /// Port number (internet passwords)
    Port,
    /// Four-character protocol code (internet passwords)
    Protocol,
    /// Server name (internet passwords)
    Server,
    /// Service name (generic passwords)
    Service,
    /// Four-character item type code
    Type,
    /// Generic attribute value
    Value,
}

impl OptionName {
    /// Every option, in lexical order of its name
    pub const ALL: [OptionName; 12] = [
        OptionName::Account,
        OptionName::Comment,
        OptionName::Creator,
        OptionName::Kind,
        OptionName::Password,
        OptionName::Path,
        OptionName::Port,
        OptionName::Protocol,
        OptionName::Server,
        OptionName::Service,
        OptionName::Type,
        OptionName::Value,
    ];

    /// Single-character flag passed to `security`.
    ///
    /// `Server` and `Service` both map to `s`: the tool uses the same flag for
    /// the server of an internet password and the service of a generic one.
    pub fn flag(&self) -> char {
        match self {
            OptionName::Account => 'a',
            OptionName::Creator => 'c',
            OptionName::Type => 'C',
            OptionName::Kind => 'D',
            OptionName::Value => 'G',
            OptionName::Comment => 'j',
            OptionName::Password => 'w',
            OptionName::Server => 's',
            OptionName::Path => 'p',
            OptionName::Port => 'P',
            OptionName::Protocol => 'r',
            OptionName::Service => 's',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Account => "account",
            OptionName::Comment => "comment",
            OptionName::Creator => "creator",
            OptionName::Kind => "kind",
            OptionName::Password => "password",
            OptionName::Path => "path",
            OptionName::Port => "port",
            OptionName::Protocol => "protocol",
            OptionName::Server => "server",
            OptionName::Service => "service",
            OptionName::Type => "type",
            OptionName::Value => "value",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = KeychainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| KeychainError::InvalidOption(s.to_string()))
    }
}

/// Options for adding, finding or deleting a password entry.
///
/// Only the fields that are set become arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PasswordOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from `(name, value)` pairs, rejecting unknown names
    pub fn from_pairs<I, K, V>(pairs: I) -> KeychainResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::new();
        for (name, value) in pairs {
            options.try_set(name.as_ref(), value)?;
        }
        Ok(options)
    }

    /// Set an option by name
    pub fn try_set(&mut self, name: &str, value: impl Into<String>) -> KeychainResult<()> {
        let name: OptionName = name.parse()?;
        self.set(name, value);
        Ok(())
    }

    pub fn set(&mut self, name: OptionName, value: impl Into<String>) {
        *self.slot_mut(name) = Some(value.into());
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, name: OptionName, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: OptionName) -> Option<&str> {
        self.slot(name).as_deref()
    }

    /// Set options in lexical order of name
    pub fn entries(&self) -> Vec<(OptionName, &str)> {
        OptionName::ALL
            .iter()
            .filter_map(|name| self.get(*name).map(|value| (*name, value)))
            .collect()
    }

    /// Overlay every option set in `other` on top of `self`
    pub fn merge(mut self, other: &PasswordOptions) -> Self {
        for (name, value) in other.entries() {
            self.set(name, value);
        }
        self
    }

    fn slot(&self, name: OptionName) -> &Option<String> {
        match name {
            OptionName::Account => &self.account,
            OptionName::Comment => &self.comment,
            OptionName::Creator => &self.creator,
            OptionName::Kind => &self.kind,
            OptionName::Password => &self.password,
            OptionName::Path => &self.path,
            OptionName::Port => &self.port,
            OptionName::Protocol => &self.protocol,
            OptionName::Server => &self.server,
            OptionName::Service => &self.service,
            OptionName::Type => &self.type_code,
            OptionName::Value => &self.value,
        }
    }

    fn slot_mut(&mut self, name: OptionName) -> &mut Option<String> {
        match name {
            OptionName::Account => &mut self.account,
            OptionName::Comment => &mut self.comment,
            OptionName::Creator => &mut self.creator,
            OptionName::Kind => &mut self.kind,
            OptionName::Password => &mut self.password,
            OptionName::Path => &mut self.path,
            OptionName::Port => &mut self.port,
            OptionName::Protocol => &mut self.protocol,
            OptionName::Server => &mut self.server,
            OptionName::Service => &mut self.service,
            OptionName::Type => &mut self.type_code,
            OptionName::Value => &mut self.value,
        }
    }
}

/// Turn options into `-<flag> <value>` pairs followed by `target`.
///
/// Pairs come out in lexical order of option name; `target` is always last.
pub fn flags_for_options(options: &PasswordOptions, target: &str) -> Vec<String> {
    let entries = options.entries();
    let mut args = Vec::with_capacity(entries.len() * 2 + 1);
    for (name, value) in entries {
        args.push(format!("-{}", name.flag()));
        args.push(value.to_string());
    }
    args.push(target.to_string());
    args
}

/// Same as [`flags_for_options`] for a raw name/value mapping.
///
/// Fails with [`KeychainError::InvalidOption`] on the first unknown name.
pub fn flags_for_pairs<I, K, V>(pairs: I, target: &str) -> KeychainResult<Vec<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let options = PasswordOptions::from_pairs(pairs)?;
    Ok(flags_for_options(&options, target))
}
