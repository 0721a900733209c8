//! Install step: place a staged executable into the bin directory.
//!
//! The copy goes to a temp name inside the bin directory and is renamed
//! over the final path, so a re-install replaces the previous binary
//! atomically and repeated installs of the same artifact are idempotent.

use std::path::{Path, PathBuf};

/// Failure to install a staged executable.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The staged source file does not exist.
    #[error("source file not found: {}", .0.display())]
    MissingSource(PathBuf),
    /// Filesystem failure while copying or renaming.
    #[error("install failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an installed binary landed and whether it replaced a previous one.
#[derive(Debug)]
pub struct Installed {
    pub path: PathBuf,
    pub replaced: bool,
}

/// Copy `source` into `bin_dir` as `name` with mode 0755.
pub fn install_binary(
    source: &Path,
    bin_dir: &Path,
    name: &str,
) -> Result<Installed, InstallError> {
    if !source.is_file() {
        return Err(InstallError::MissingSource(source.to_path_buf()));
    }
    std::fs::create_dir_all(bin_dir)?;
    let final_path = bin_dir.join(name);
    let replaced = final_path.exists();

    // Write next to the final path so the rename stays on one filesystem.
    let tmp_path = bin_dir.join(format!(".{name}.tmp"));
    std::fs::copy(source, &tmp_path)?;
    set_executable(&tmp_path)?;
    std::fs::rename(&tmp_path, &final_path)?;

    tracing::info!(path = %final_path.display(), replaced, "installed binary");
    Ok(Installed {
        path: final_path,
        replaced,
    })
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

/// Executability is not a permission bit outside Unix.
#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
