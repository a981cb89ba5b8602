//! Reads secret records from a secrets root directory.
//!
//! Layout: one sub-directory per alias, each holding a required
//! `password` file and an optional `username` file.
//!
//! ```text
//! <root>/
//!   ds-main/
//!     username
//!     password
//!   mq-broker/
//!     password
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::record::SecretRecord;
use crate::errors::{ProvisionError, Result};

/// Name of the required password file.
pub const PASSWORD_FILE: &str = "password";

/// Name of the optional username file.
pub const USERNAME_FILE: &str = "username";

/// Load every record under `root`, sorted by alias.
///
/// All records are read before any is returned, so a missing password
/// surfaces before a single alias is created. Plain files and hidden
/// entries in the root are ignored. Any other directory name is used as the
/// alias verbatim; it only has to be valid UTF-8.
pub fn load_secrets(root: &Path) -> Result<Vec<SecretRecord>> {
    let unreadable = |source| ProvisionError::SecretsRootUnreadable {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(root).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if !path.is_dir() {
            debug!(path = %path.display(), "skipping non-directory in secrets root");
            continue;
        }

        let name = entry.file_name();
        let alias = name
            .to_str()
            .ok_or_else(|| ProvisionError::InvalidAliasName(name.to_string_lossy().into_owned()))?;
        // Hidden entries are Kubernetes projection bookkeeping (`..data`).
        if alias.starts_with('.') {
            continue;
        }
        dirs.push((alias.to_string(), path));
    }
    dirs.sort();

    let mut records = Vec::with_capacity(dirs.len());
    for (alias, dir) in dirs {
        records.push(load_record(&alias, &dir)?);
    }

    debug!(root = %root.display(), count = records.len(), "loaded secrets");
    Ok(records)
}

/// Read one record from its directory.
pub fn load_record(alias: &str, dir: &Path) -> Result<SecretRecord> {
    let password_path = dir.join(PASSWORD_FILE);
    let password = match fs::read(&password_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ProvisionError::MissingPassword {
                alias: alias.to_string(),
                path: password_path,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let username = match fs::read(dir.join(USERNAME_FILE)) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(alias, "no username file, using empty username");
            None
        }
        Err(e) => return Err(e.into()),
    };

    Ok(SecretRecord::new(alias, username, password))
}
