//! Integration tests for the nova library.
//!
//! These tests verify the public API works correctly.

use nova::config::{Config, Environment};
use nova::crypto::{Cipher, PassphraseCheck, parse_iv};
use nova::project::ProjectResolver;
use std::path::{Path, PathBuf};

#[test]
fn test_config_load_with_defaults() {
    // Load config - will use defaults if no config file exists
    let config = Config::load().unwrap();

    // Check default values are sensible
    assert!(!config.editor().is_empty());
    assert!(!config.projects_dir().as_os_str().is_empty());
}

#[test]
fn test_database_url_forms() {
    let with_url = |url: &str| {
        Config::new(
            None,
            Environment {
                database_url: Some(url.to_string()),
                ..Default::default()
            },
        )
        .database_path()
    };

    assert_eq!(
        with_url("sqlite:///srv/nova/nova.db").unwrap(),
        PathBuf::from("/srv/nova/nova.db")
    );
    assert_eq!(
        with_url("/srv/nova/nova.db").unwrap(),
        PathBuf::from("/srv/nova/nova.db")
    );
    assert!(with_url("mysql://root@localhost/nova").is_err());
}

#[test]
fn test_envelope_from_one_process_opens_in_another() {
    // Both sides only share the passphrase and the configured IV
    let iv = "000102030405060708090a0b0c0d0e0f";
    let writer = Cipher::new(parse_iv(iv).unwrap());
    let reader = Cipher::new(parse_iv(iv).unwrap());

    let envelope = writer.encrypt("DATABASE_PASSWORD=hunter2\n", "p@ss").unwrap();
    assert_eq!(
        reader.decrypt(&envelope, "p@ss").unwrap(),
        "DATABASE_PASSWORD=hunter2\n"
    );
}

#[test]
fn test_verifier_envelope_round_trip() {
    let cipher = Cipher::new(*b"fedcba9876543210");
    let check = PassphraseCheck::Envelope(cipher.encrypt("correct horse", "correct horse").unwrap());

    assert!(check.verify(&cipher, "correct horse"));
    assert!(!check.verify(&cipher, "correct"));
    assert!(!check.verify(&cipher, ""));
}

#[test]
fn test_project_resolution() {
    let resolver = ProjectResolver::new(Path::new("/home/dev/Projects")).unwrap();

    assert_eq!(
        resolver.resolve(Path::new("/home/dev/Projects/nova")).as_deref(),
        Some("nova")
    );
    assert_eq!(resolver.resolve(Path::new("/home/dev/Projects/nova/src")), None);
    assert_eq!(resolver.resolve(Path::new("/home/dev")), None);
}
