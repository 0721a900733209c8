//! Formula: declarative metadata for one prebuilt binary release.
//!
//! A formula names the artifact (download URL, version, expected SHA-256)
//! and the executable the release tarball contains. Formulas are static
//! configuration: built in via [`bundled`] or loaded from a TOML file,
//! validated once, never mutated.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Release metadata for one prebuilt binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    /// Executable name, both inside the archive and in the bin directory.
    pub name: String,
    /// One-line description of the tool.
    pub desc: String,
    /// Project homepage.
    pub homepage: String,
    /// Download URL of the release tarball.
    pub url: String,
    /// Release version string.
    pub version: String,
    /// Expected SHA-256 of the tarball, lowercase hex.
    pub sha256: String,
}

impl Formula {
    /// Parse a formula from TOML and validate it.
    pub fn from_toml_str(s: &str) -> Result<Formula> {
        let f: Formula = toml::from_str(s).context("parse formula TOML")?;
        f.validate()?;
        Ok(f)
    }

    /// Load and validate a formula from a TOML file.
    pub fn load(path: &Path) -> Result<Formula> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("read formula: {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("formula {}", path.display()))
    }

    /// Validate the formula's fields before any of them are used.
    ///
    /// `name` becomes a file name in the bin directory, so it must not carry
    /// path separators or whitespace. `sha256` must be a full lowercase hex
    /// digest; anything else would make verification unfalsifiable.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty()
            || self.name == "."
            || self.name == ".."
            || self.name.contains(['/', '\\'])
            || self.name.chars().any(char::is_whitespace)
        {
            bail!("formula name {:?} is not a valid file name", self.name);
        }
        let parsed =
            url::Url::parse(&self.url).with_context(|| format!("formula url {:?}", self.url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!("formula url must be http(s): {}", self.url);
        }
        if self.version.is_empty() {
            bail!("formula version must not be empty");
        }
        if self.sha256.len() != 64
            || !self.sha256.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            bail!("formula sha256 must be 64 lowercase hex chars");
        }
        self.artifact_filename()?;
        Ok(())
    }

    /// File name of the release tarball, derived from the URL's last path segment.
    pub fn artifact_filename(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.url).context("invalid formula url")?;
        let name = parsed
            .path_segments()
            .and_then(|mut segs| segs.next_back())
            .filter(|s| !s.is_empty());
        match name {
            Some(n) => Ok(n.to_string()),
            None => bail!("formula url has no file name: {}", self.url),
        }
    }
}

/// Look up a formula that ships with tapkit.
pub fn bundled(name: &str) -> Option<Formula> {
    match name {
        "kmscrypter" => Some(Formula {
            name: "kmscrypter".to_string(),
            desc: "AWS assume role credential wrapper".to_string(),
            homepage: "https://github.com/masahide/kmscrypter".to_string(),
            url: "https://github.com/masahide/kmscrypter/releases/download/v0.1.0/kmscrypter_Darwin_x86_64.tar.gz"
                .to_string(),
            version: "0.1.0".to_string(),
            sha256: "547fc38943ce0094d2091ecf79a580782b9cdcfc0ae25a714eefcce880e1561b"
                .to_string(),
        }),
        _ => None,
    }
}

/// Resolve a CLI formula argument: a path (contains a separator or ends in
/// `.toml`) loads a formula file, anything else names a bundled formula.
pub fn resolve(name_or_path: &str) -> Result<Formula> {
    if name_or_path.contains(['/', '\\']) || name_or_path.ends_with(".toml") {
        return Formula::load(Path::new(name_or_path));
    }
    bundled(name_or_path).with_context(|| {
        format!("no bundled formula named {name_or_path:?}; pass a path to a formula TOML file")
    })
}
