//! Directory scanning for files whose names match the configured patterns.

use std::path::{Component, Path};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::Error;

pub const DEFAULT_EXTENSIONS: [&str; 4] = ["*.jpg", "*.jpeg", "*.png", "*.gif"];

/// A matched file, before any date parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path below the scan root, `/`-separated.
    pub relative_path: String,
    /// Bare filename.
    pub base_name: String,
}

/// Compiled, case-sensitive filename patterns such as `*.jpg`.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    patterns: Vec<Pattern>,
}

impl ExtensionMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, Error> {
        let patterns = patterns
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Pattern::new(raw).map_err(|source| Error::InvalidPattern {
                    pattern: raw.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn matches(&self, base_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(base_name))
    }
}

/// Walk `root` recursively and return every non-directory entry whose base
/// name matches `matcher`.
///
/// Symlinks below the root are listed by their own name and never followed,
/// so a dangling link or a link cycle cannot stall the walk.
///
/// # Errors
/// The first I/O error (unreadable root, unreadable subdirectory) aborts the
/// whole scan with [`Error::Scan`] so a cycle never publishes half a
/// directory.
pub fn scan(root: &Path, matcher: &ExtensionMatcher) -> Result<Vec<ScannedFile>, Error> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| Error::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(base_name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 filename");
            continue;
        };
        if !matcher.matches(base_name) {
            continue;
        }
        let Some(relative_path) = relative_to(root, entry.path()) else {
            continue;
        };
        out.push(ScannedFile {
            relative_path,
            base_name: base_name.to_string(),
        });
    }
    Ok(out)
}

fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
