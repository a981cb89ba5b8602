//! Library directory scanning and resource-list joining.
//!
//! The directory listing is treated as a set: entries are sorted by path
//! before they are joined, so the produced resource string does not depend
//! on the order the platform happens to return.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{ProvisionError, Result};

/// List the regular files directly inside `dir`, as absolute paths, sorted.
///
/// Sub-directories and other non-file entries are skipped. Symlinks are
/// followed, so a link pointing at a jar counts as a regular file.
/// A missing or unreadable directory is fatal.
pub fn scan_library(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = absolute(dir)?;

    let unreadable = |source| ProvisionError::LibraryDirUnreadable {
        path: dir.clone(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => trace!(path = %path.display(), "skipping non-file entry"),
            Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable entry"),
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "scanned library directory");
    Ok(files)
}

/// Join resource paths with `delimiter`, without a trailing delimiter.
///
/// An empty slice yields the empty string; callers decide whether that is
/// acceptable. A path containing the delimiter would be split apart by the
/// console's argument parser, so it is rejected.
pub fn join_resources(paths: &[PathBuf], delimiter: char) -> Result<String> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        let s = path
            .to_str()
            .ok_or_else(|| ProvisionError::NonUtf8Path(path.clone()))?;
        if s.contains(delimiter) {
            return Err(ProvisionError::DelimiterInPath {
                path: path.clone(),
                delimiter,
            });
        }
        parts.push(s);
    }

    Ok(parts.join(&delimiter.to_string()))
}

/// Resolve a relative directory against the current working directory.
fn absolute(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
