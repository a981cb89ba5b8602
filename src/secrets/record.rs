//! A credential read from one directory under the secrets root.

use std::ffi::OsString;
use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::errors::Result;

/// One alias worth of credentials.
///
/// The alias is the directory name. Username and password are kept as raw
/// bytes: nothing about their encoding is assumed, and these two buffers are
/// wiped from memory on drop. Argv expanded from them is owned by an
/// [`Invocation`](crate::console::Invocation), which wipes its own copy; the
/// copy `std::process::Command` makes while spawning is not wiped.
pub struct SecretRecord {
    pub alias: String,
    pub username: Zeroizing<Vec<u8>>,
    pub password: Zeroizing<Vec<u8>>,
    /// Whether a `username` file was present (an absent one reads as empty).
    pub has_username: bool,
}

impl SecretRecord {
    pub fn new(alias: impl Into<String>, username: Option<Vec<u8>>, password: Vec<u8>) -> Self {
        let has_username = username.is_some();
        Self {
            alias: alias.into(),
            username: Zeroizing::new(username.unwrap_or_default()),
            password: Zeroizing::new(password),
            has_username,
        }
    }

    /// Value-free summary for listings.
    pub fn summary(&self) -> SecretSummary {
        SecretSummary {
            alias: self.alias.clone(),
            has_username: self.has_username,
            username_len: self.username.len(),
            password_len: self.password.len(),
        }
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("alias", &self.alias)
            .field("has_username", &self.has_username)
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What `provisio secrets` shows about a record. Never contains values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretSummary {
    pub alias: String,
    pub has_username: bool,
    pub username_len: usize,
    pub password_len: usize,
}

/// Turn raw bytes into a process argument without re-encoding them.
#[cfg(unix)]
pub(crate) fn bytes_to_os(_alias: &str, bytes: Vec<u8>) -> Result<OsString> {
    use std::os::unix::ffi::OsStringExt;
    Ok(OsString::from_vec(bytes))
}

/// Process arguments are Unicode here, so bytes that are not UTF-8 cannot be
/// passed through unchanged and are rejected.
#[cfg(not(unix))]
pub(crate) fn bytes_to_os(alias: &str, bytes: Vec<u8>) -> Result<OsString> {
    String::from_utf8(bytes)
        .map(OsString::from)
        .map_err(|e| {
            let mut rejected = e.into_bytes();
            zeroize::Zeroize::zeroize(&mut rejected);
            crate::errors::ProvisionError::NonUtf8Secret(alias.to_string())
        })
}
