//! In-memory stand-in for the `security` and `openssl` tools

#![allow(dead_code)]

use keychain_manager::{CommandRunner, Invocation, KeychainError, KeychainResult};
use std::collections::HashMap;
use std::sync::Mutex;

const NOT_FOUND: &str =
    "security: SecKeychainSearchCopyNext: The specified item could not be found in the keychain.\n";

#[derive(Default)]
struct State {
    /// Keychain files in the search list
    keychains: Vec<String>,
    default_keychain: Option<String>,
    /// (subcommand kind, account, server-or-service) -> password
    passwords: HashMap<(String, String, String), String>,
    invocations: Vec<Invocation>,
}

/// Fake runner that keeps keychains and passwords in memory and records
/// every invocation it sees
pub struct FakeSecurity {
    state: Mutex<State>,
    keychain_dir: String,
}

impl FakeSecurity {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            keychain_dir: "/Users/test/Library/Keychains".to_string(),
        }
    }

    pub fn with_keychains(self, keychains: &[&str]) -> Self {
        self.state.lock().unwrap().keychains = keychains.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_default(self, keychain: &str) -> Self {
        self.state.lock().unwrap().default_keychain = Some(keychain.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .filter_map(|i| i.subcommand().map(str::to_string))
            .collect()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.subcommands().iter().filter(|s| *s == subcommand).count()
    }

    pub fn last(&self, subcommand: &str) -> Option<Invocation> {
        self.invocations()
            .into_iter()
            .rev()
            .find(|i| i.subcommand() == Some(subcommand))
    }

    /// Returns (exit code, combined output)
    fn run(&self, invocation: &Invocation) -> (i32, String) {
        let mut state = self.state.lock().unwrap();
        state.invocations.push(invocation.clone());

        let args = invocation.arguments();
        let flag = |name: &str| -> Option<String> {
            args.windows(2)
                .find(|w| w[0] == name)
                .map(|w| w[1].clone())
        };

        match invocation.subcommand().unwrap_or_default() {
            "list-keychains" => {
                let listing: String = state
                    .keychains
                    .iter()
                    .map(|k| format!("    \"{}\"\n", k))
                    .collect();
                (0, listing)
            }
            "default-keychain" | "login-keychain" => match &state.default_keychain {
                Some(k) => (0, format!("    \"{}\"\n", k)),
                None => (0, String::new()),
            },
            "create-keychain" => {
                let name = args.last().cloned().unwrap_or_default();
                let path = format!("{}/{}", self.keychain_dir, name);
                if state.keychains.contains(&path) {
                    return (48, "security: SecKeychainCreate: A keychain with the same name already exists.\n".to_string());
                }
                state.keychains.push(path);
                (0, String::new())
            }
            "delete-keychain" => {
                let path = args.last().cloned().unwrap_or_default();
                state.keychains.retain(|k| *k != path);
                (0, String::new())
            }
            "import" => (0, "1 key imported.\n".to_string()),
            "lock-keychain" | "unlock-keychain" | "export" => (0, String::new()),
            sub @ ("add-internet-password" | "add-generic-password") => {
                let kind = sub.trim_start_matches("add-").to_string();
                let key = (kind, flag("-a").unwrap_or_default(), flag("-s").unwrap_or_default());
                state.passwords.insert(key, flag("-w").unwrap_or_default());
                (0, String::new())
            }
            sub @ ("delete-internet-password" | "delete-generic-password") => {
                let kind = sub.trim_start_matches("delete-").to_string();
                let key = (kind, flag("-a").unwrap_or_default(), flag("-s").unwrap_or_default());
                match state.passwords.remove(&key) {
                    Some(_) => (0, String::new()),
                    None => (44, NOT_FOUND.to_string()),
                }
            }
            sub @ ("find-internet-password" | "find-generic-password") => {
                let kind = sub.trim_start_matches("find-").to_string();
                let target = args.last().cloned().unwrap_or_default();
                let key = (kind, flag("-a").unwrap_or_default(), flag("-s").unwrap_or_default());
                match state.passwords.get(&key) {
                    Some(password) => {
                        let code = if key.0 == "internet-password" { "srvr" } else { "svce" };
                        let output = format!(
                            "keychain: \"{}\"\nversion: 512\nclass: \"genp\"\nattributes:\n    \"acct\"<blob>=\"{}\"\n    \"{}\"<blob>=\"{}\"\n    \"crtr\"<uint32>=<NULL>\npassword: \"{}\"\n",
                            target, key.1, code, key.2, password
                        );
                        (0, output)
                    }
                    None => (44, NOT_FOUND.to_string()),
                }
            }
            "genrsa" | "req" | "pkcs12" => (0, String::new()),
            other => (1, format!("security: unknown command {}\n", other)),
        }
    }
}

impl CommandRunner for FakeSecurity {
    fn call(&self, invocation: &Invocation) -> KeychainResult<Option<i32>> {
        let (code, _) = self.run(invocation);
        Ok(Some(code))
    }

    fn check_output(&self, invocation: &Invocation) -> KeychainResult<String> {
        let (code, output) = self.run(invocation);
        if code != 0 {
            return Err(KeychainError::ToolInvocation {
                command: invocation.to_string(),
                exit_code: Some(code),
                output,
            });
        }
        Ok(output)
    }
}
