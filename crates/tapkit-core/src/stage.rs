//! Staging: unpack a release tarball and locate the executable inside.

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Unpack a gzip-compressed tarball into `dest_dir` (created if needed).
/// Entries that would escape `dest_dir` are refused by the tar crate.
pub fn unpack_tar_gz(archive: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("create dir: {}", dest_dir.display()))?;
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut ar = Archive::new(GzDecoder::new(file));
    ar.unpack(dest_dir)
        .with_context(|| format!("unpack {}", archive.display()))?;
    tracing::debug!(archive = %archive.display(), dest = %dest_dir.display(), "unpacked");
    Ok(())
}

/// Path of the executable `name` at the root of an unpacked archive.
/// Release tarballs place the binary at the archive root; a tarball without
/// it cannot be installed.
pub fn staged_binary(stage_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = stage_dir.join(name);
    if !path.is_file() {
        bail!("archive does not contain executable {:?}", name);
    }
    Ok(path)
}
