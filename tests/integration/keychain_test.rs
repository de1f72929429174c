//! Integration Tests for the Keychain Manager
//!
//! These tests require:
//! - macOS with the `security` tool
//! - `openssl` for the key import test
//!
//! Each test creates its own throwaway keychain and deletes it afterwards.

#![cfg(target_os = "macos")]

use keychain_manager::{
    KeychainError, KeychainManager, OpenSsl, OptionName, PasswordOptions, SecurityTool,
    DEFAULT_KEY_SIZE,
};
use tempfile::TempDir;
use uuid::Uuid;

fn scratch_keychain() -> KeychainManager {
    KeychainManager::new(format!("keychain-test-{}", Uuid::new_v4().simple()))
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_create_keychain() {
    let mut km = scratch_keychain();
    km.create().expect("Failed to create keychain");
    assert!(km.exists().unwrap());

    km.delete().expect("Failed to delete keychain");
    assert!(!km.exists().unwrap());
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_filename_keychain() {
    let mut km = scratch_keychain();
    assert!(!km.exists().unwrap());
    assert!(km.resolve().unwrap().is_none());

    km.create().unwrap();
    let filename = km.filename().unwrap();
    assert!(filename.contains(km.name().unwrap()));

    km.delete().unwrap();
    assert!(!km.exists().unwrap());
}

#[test]
#[ignore] // Requires macOS keychain access and openssl
fn test_import_rsa_key() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let rsa_file_path = dir.path().join("rsa.key");
    OpenSsl::system()
        .generate_rsa_key(&rsa_file_path, DEFAULT_KEY_SIZE)
        .expect("Failed to generate RSA key");

    let mut km = scratch_keychain();
    km.create().unwrap();
    let output = km.import_rsa_key(&rsa_file_path).unwrap();
    km.delete().unwrap();

    assert!(output.contains("1 key imported"), "unexpected output: {}", output);
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_generic_password_lifecycle() {
    let mut km = scratch_keychain();
    km.create().unwrap();
    km.unlock("").unwrap();

    let query = PasswordOptions::new()
        .with(OptionName::Account, "youremail@example.com")
        .with(OptionName::Service, "keychain-test");

    km.add_generic_password(
        "youremail@example.com",
        "keychain-test",
        "examplepass",
        &PasswordOptions::new().with(OptionName::Comment, "integration test"),
    )
    .unwrap();

    let record = km.find_generic_password(&query).unwrap();
    assert_eq!(record.password(), Some("examplepass"));
    assert_eq!(record.attribute("acct"), Some("youremail@example.com"));
    assert_eq!(record.attribute("svce"), Some("keychain-test"));

    km.delete_generic_password(&query).unwrap();
    let err = km.find_generic_password(&query).unwrap_err();
    assert!(matches!(err, KeychainError::ToolInvocation { .. }));

    km.delete().unwrap();
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_missing_internet_password_fails_on_lookup() {
    let mut km = scratch_keychain();
    km.create().unwrap();

    let query = PasswordOptions::new()
        .with(OptionName::Account, "nobody@example.com")
        .with(OptionName::Server, "example.com");

    km.delete_internet_password(&query).unwrap();
    let err = km.find_internet_password(&query).unwrap_err();
    assert!(matches!(err, KeychainError::ToolInvocation { .. }));

    km.delete().unwrap();
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_keychain_files() {
    let files = SecurityTool::system().keychain_files().unwrap();
    assert!(!files.is_empty());
}

#[test]
#[ignore] // Requires macOS keychain access
fn test_default_keychain_cannot_be_deleted() {
    let mut km = KeychainManager::default_keychain();
    assert!(km.exists().unwrap());
    assert!(matches!(km.delete(), Err(KeychainError::UnsupportedOperation(_))));
}
