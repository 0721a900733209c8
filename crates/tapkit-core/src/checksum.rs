//! SHA-256 digesting and verification of fetched artifacts.
//!
//! Digests are computed in chunks so memory use stays bounded for large
//! tarballs. Verification compares against the formula's expected digest;
//! a mismatch must abort the pipeline before any unpack or install step.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Digest mismatch between a fetched artifact and its formula.
#[derive(Debug, thiserror::Error)]
#[error("checksum mismatch: expected {expected}, got {actual}")]
pub struct IntegrityError {
    pub expected: String,
    pub actual: String,
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Verify that `path` digests to `expected` (lowercase hex).
/// Returns the digest on success so callers can log it.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<String> {
    let actual = sha256_path(path)?;
    if actual != expected {
        return Err(IntegrityError {
            expected: expected.to_string(),
            actual,
        }
        .into());
    }
    Ok(actual)
}
