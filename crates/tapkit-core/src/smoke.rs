//! Post-install smoke test: run the binary with `-v` and require exit 0.
//!
//! Exit status is the sole criterion. Output is not parsed and the check
//! is never retried.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Smoke test failure: the binary would not launch, or exited non-zero.
#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    #[error("failed to launch {path}: {source}")]
    Launch {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("smoke test failed: {path} -v ({status})")]
    Failed { path: String, status: ExitStatus },
}

/// Run `<bin> -v` and require exit status 0.
pub fn run(bin: &Path) -> Result<(), SmokeError> {
    let status = Command::new(bin)
        .arg("-v")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| SmokeError::Launch {
            path: bin.display().to_string(),
            source,
        })?;
    if !status.success() {
        return Err(SmokeError::Failed {
            path: bin.display().to_string(),
            status,
        });
    }
    tracing::debug!(bin = %bin.display(), "smoke test passed");
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-bin");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn exit_zero_passes() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "exit 0");
        run(&bin).unwrap();
    }

    #[test]
    fn nonzero_exit_fails_with_status() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "exit 3");
        match run(&bin).unwrap_err() {
            SmokeError::Failed { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn flag_is_passed_to_the_binary() {
        let dir = tempfile::tempdir().unwrap();
        // Exits 0 only when invoked with -v.
        let bin = script(dir.path(), r#"[ "$1" = "-v" ] || exit 1"#);
        run(&bin).unwrap();
    }

    #[test]
    fn missing_binary_is_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        match run(&dir.path().join("absent")).unwrap_err() {
            SmokeError::Launch { .. } => {}
            other => panic!("unexpected error: {other}"),
        }
    }
}
