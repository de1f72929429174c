//! Keychain management through the macOS `security` tool
//!
//! Creates, locks and deletes keychains, stores and looks up internet and
//! generic passwords, and drives `openssl` for keys, certificate requests and
//! PKCS12 conversion. Everything is delegated to external programs; this crate
//! builds their command lines and parses what they print.
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


pub mod error;
pub mod keychain;
pub mod openssl;
pub mod options;
pub mod parser;
pub mod runner;
pub mod security;

pub use error::{KeychainError, KeychainResult};
pub use keychain::KeychainManager;
pub use openssl::{OpenSsl, DEFAULT_KEY_SIZE};
pub use options::{flags_for_options, flags_for_pairs, OptionName, PasswordOptions};
pub use parser::{parse_credential_output, parse_keychain_list, CredentialRecord};
pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use security::{SecurityCommand, SecurityTool};
