//! End-to-end install over a local HTTP server: fetch, verify, unpack,
//! install, smoke-test — plus the abort-on-mismatch and idempotency
//! properties the pipeline guarantees.

#![cfg(unix)]

mod common;

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use tapkit_core::checksum::IntegrityError;
use tapkit_core::config::TapConfig;
use tapkit_core::formula::Formula;
use tapkit_core::installer;
use tapkit_core::receipts::Receipts;
use tempfile::tempdir;

const TARBALL_NAME: &str = "kmscrypter_Linux_x86_64.tar.gz";

/// tar.gz with one executable `name` at the archive root.
fn tarball(name: &str, script: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let data = script.as_bytes();
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, name, data).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

fn test_config(root: &Path) -> TapConfig {
    let cfg = TapConfig {
        bin_dir: Some(root.join("bin")),
        cache_dir: Some(root.join("cache")),
        state_dir: Some(root.join("state")),
        ..TapConfig::default()
    };
    std::fs::create_dir_all(root.join("cache")).unwrap();
    cfg
}

fn formula_for(base_url: &str, body: &[u8]) -> Formula {
    Formula {
        name: "kmscrypter".to_string(),
        desc: "AWS assume role credential wrapper".to_string(),
        homepage: "https://github.com/masahide/kmscrypter".to_string(),
        url: format!("{base_url}{TARBALL_NAME}"),
        version: "0.1.0".to_string(),
        sha256: hex::encode(Sha256::digest(body)),
    }
}

#[test]
fn install_end_to_end() {
    let body = tarball("kmscrypter", "#!/bin/sh\n[ \"$1\" = \"-v\" ] || exit 1\nexit 0\n");
    let base_url = common::http_server::start(body.clone());

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let formula = formula_for(&base_url, &body);

    let outcome = installer::install_formula(&cfg, &formula, false).unwrap();
    assert!(!outcome.cached);
    assert!(!outcome.replaced);
    assert_eq!(outcome.bin_path, root.path().join("bin").join("kmscrypter"));
    assert!(outcome.bin_path.is_file());
    let mode = std::fs::metadata(&outcome.bin_path)
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o755);

    // Receipt recorded.
    let receipts = Receipts::load(&cfg.receipts_path().unwrap()).unwrap();
    let receipt = receipts.get("kmscrypter").expect("receipt written");
    assert_eq!(receipt.version, "0.1.0");
    assert_eq!(receipt.bin_path, outcome.bin_path);

    // Smoke test: `kmscrypter -v` exits 0.
    let tested = installer::smoke_test(&cfg, "kmscrypter").unwrap();
    assert_eq!(tested, outcome.bin_path);
}

#[test]
fn reinstall_is_idempotent_and_uses_cache() {
    let body = tarball("kmscrypter", "#!/bin/sh\nexit 0\n");
    let base_url = common::http_server::start(body.clone());

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let formula = formula_for(&base_url, &body);

    let first = installer::install_formula(&cfg, &formula, false).unwrap();
    let second = installer::install_formula(&cfg, &formula, false).unwrap();

    assert!(second.cached, "unchanged artifact should come from cache");
    assert!(second.replaced);
    assert_eq!(first.bin_path, second.bin_path);
    let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&first.bin_path), 0o755);
}

#[test]
fn checksum_mismatch_aborts_before_install() {
    let body = tarball("kmscrypter", "#!/bin/sh\nexit 0\n");
    let base_url = common::http_server::start(body.clone());

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let mut formula = formula_for(&base_url, &body);
    // A sha256 for some other artifact: deterministic integrity failure.
    formula.sha256 = "0".repeat(64);

    let err = installer::install_formula(&cfg, &formula, false).unwrap_err();
    assert!(err.downcast_ref::<IntegrityError>().is_some(), "err: {err:#}");

    // Nothing was installed and the unverifiable artifact was not kept.
    assert!(!root.path().join("bin").join("kmscrypter").exists());
    let artifact = root
        .path()
        .join("cache")
        .join("kmscrypter-0.1.0")
        .join(TARBALL_NAME);
    assert!(!artifact.exists());

    // Re-running reproduces the same failure.
    let err = installer::install_formula(&cfg, &formula, false).unwrap_err();
    assert!(err.downcast_ref::<IntegrityError>().is_some());
}

#[test]
fn http_error_aborts_install() {
    let base_url = common::http_server::start_with_status(Vec::new(), 404);

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let formula = formula_for(&base_url, b"whatever");

    let err = installer::install_formula(&cfg, &formula, false).unwrap_err();
    assert!(format!("{err:#}").contains("404"), "err: {err:#}");
    assert!(!root.path().join("bin").join("kmscrypter").exists());
}

#[test]
fn failing_smoke_test_is_reported() {
    let body = tarball("kmscrypter", "#!/bin/sh\nexit 7\n");
    let base_url = common::http_server::start(body.clone());

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let formula = formula_for(&base_url, &body);

    installer::install_formula(&cfg, &formula, false).unwrap();
    let err = installer::smoke_test(&cfg, "kmscrypter").unwrap_err();
    assert!(format!("{err}").contains("smoke test failed"), "err: {err}");
}

#[test]
fn uninstall_removes_binary_and_receipt() {
    let body = tarball("kmscrypter", "#!/bin/sh\nexit 0\n");
    let base_url = common::http_server::start(body.clone());

    let root = tempdir().unwrap();
    let cfg = test_config(root.path());
    let formula = formula_for(&base_url, &body);

    let outcome = installer::install_formula(&cfg, &formula, false).unwrap();
    assert!(installer::uninstall(&cfg, "kmscrypter").unwrap());
    assert!(!outcome.bin_path.exists());
    let receipts = Receipts::load(&cfg.receipts_path().unwrap()).unwrap();
    assert!(receipts.get("kmscrypter").is_none());

    // Second uninstall has nothing left to do.
    assert!(!installer::uninstall(&cfg, "kmscrypter").unwrap());
}
