//! Parsing of `security` command output
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


use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static ERROR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^security: ").unwrap());
static KEYCHAIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^keychain: "(.+)""#).unwrap());
static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^password: "(.+)""#).unwrap());
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(\w{4})".+="(.+)""#).unwrap());

/// Key under which the keychain path is stored in a [`CredentialRecord`]
pub const KEYCHAIN_FIELD: &str = "keychain";
/// Key under which the password is stored in a [`CredentialRecord`]
pub const PASSWORD_FIELD: &str = "password";

/// Fields recovered from a `find-*-password` lookup.
///
/// Holds `keychain`, `password` and any four-character attribute codes
/// (`acct`, `svce`, `srvr`, ...) that had a quoted value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialRecord {
    fields: BTreeMap<String, String>,
}

impl CredentialRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn keychain(&self) -> Option<&str> {
        self.get(KEYCHAIN_FIELD)
    }

    pub fn password(&self) -> Option<&str> {
        self.get(PASSWORD_FIELD)
    }

    /// Value of a four-character attribute such as `acct`
    pub fn attribute(&self, code: &str) -> Option<&str> {
        self.get(code)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }
}

/// Extract a [`CredentialRecord`] from lookup output.
///
/// Lines are matched independently; unrecognised lines and attributes with
/// unquoted values (such as `<NULL>`) are skipped. Never fails: a failed
/// lookup is reported by the exit status, not by this function.
pub fn parse_credential_output(output: &str) -> CredentialRecord {
    let mut record = CredentialRecord::default();

    for line in output.lines() {
        if let Some(caps) = KEYCHAIN_RE.captures(line) {
            record.insert(KEYCHAIN_FIELD, &caps[1]);
        }
        if let Some(caps) = PASSWORD_RE.captures(line) {
            record.insert(PASSWORD_FIELD, &caps[1]);
        }
        if let Some(caps) = ATTRIBUTE_RE.captures(line) {
            record.insert(&caps[1], &caps[2]);
        }
    }

    record
}

/// Parse the path listing printed by `list-keychains`, `default-keychain`
/// and `login-keychain`
pub fn parse_keychain_list(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(|line| line.trim_matches(|c| c == '"' || c == ' ' || c == '\r'))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// True for the `security: ...` lines the tool prints when it fails
pub fn is_error_report(line: &str) -> bool {
    ERROR_RE.is_match(line)
}

/// First error line in `output`, if any
pub fn error_report(output: &str) -> Option<&str> {
    output.lines().find(|line| is_error_report(line))
}
