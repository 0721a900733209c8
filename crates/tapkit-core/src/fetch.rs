//! Artifact fetch: single-stream HTTP GET written to a `.part` file.
//!
//! Release tarballs are small, so one sequential GET with redirects is
//! enough. The body lands in `<dest>.part` and is renamed to `dest` only
//! after the transfer finishes with a 2xx status, so `dest` never holds a
//! partial body. Failures surface immediately; there is no retry.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transfer timeouts for a fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Total timeout for the whole transfer.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Download `url` to `dest`, creating parent directories as needed.
/// Follows redirects; any non-2xx final status is an error.
/// Returns the number of bytes written.
pub fn download(url: &str, dest: &Path, opts: FetchOptions) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let part = part_path(dest);
    let mut file =
        File::create(&part).with_context(|| format!("create {}", part.display()))?;
    let mut written: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if let Err(e) = file.write_all(data) {
                tracing::warn!("write to {} failed: {}", part.display(), e);
                return Ok(0); // abort transfer
            }
            written += data.len() as u64;
            Ok(data.len())
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if code < 200 || code >= 300 {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    file.sync_all()
        .with_context(|| format!("sync {}", part.display()))?;
    drop(file);
    std::fs::rename(&part, dest)
        .with_context(|| format!("rename {} to {}", part.display(), dest.display()))?;
    tracing::debug!(url, bytes = written, dest = %dest.display(), "fetched");
    Ok(written)
}

/// In-progress file next to the destination (`foo.tar.gz` → `foo.tar.gz.part`).
fn part_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_os_string();
    s.push(".part");
    PathBuf::from(s)
}
