//! Integration Tests for the certificate toolchain
//!
//! These tests require `openssl` on `PATH`.

use keychain_manager::{OpenSsl, DEFAULT_KEY_SIZE};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
#[ignore] // Requires openssl
fn test_csr_cert() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let rsa_file_path = dir.path().join("rsa.key");
    let csr_file_path = dir.path().join("cert.csr");
    let openssl = OpenSsl::system();

    openssl
        .generate_rsa_key(&rsa_file_path, DEFAULT_KEY_SIZE)
        .expect("Failed to generate RSA key");
    assert!(rsa_file_path.exists());
    let key_before = fs::read(&rsa_file_path).unwrap();

    openssl
        .generate_cert_request("andrew@example.com", "US", &rsa_file_path, &csr_file_path)
        .expect("Failed to run openssl req");
    assert!(csr_file_path.exists());

    // the request must not touch the key
    assert_eq!(fs::read(&rsa_file_path).unwrap(), key_before);
    assert!(key_before.len() < 16 * 1024);

    let verify = Command::new("openssl")
        .args(["req", "-noout", "-verify", "-in"])
        .arg(&csr_file_path)
        .output()
        .expect("Failed to run openssl");
    assert!(verify.status.success(), "openssl could not parse the request");
}

#[test]
#[ignore] // Requires openssl
fn test_generate_rsa_key_sizes() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let openssl = OpenSsl::system();

    let small = dir.path().join("small.key");
    let large = dir.path().join("large.key");
    openssl.generate_rsa_key(&small, 1024).unwrap();
    openssl.generate_rsa_key(&large, 4096).unwrap();

    let small_len = fs::metadata(&small).unwrap().len();
    let large_len = fs::metadata(&large).unwrap().len();
    assert!(small_len < large_len);
}
