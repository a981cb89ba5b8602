use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in provisio.
#[derive(Debug, Error)]
pub enum ProvisionError {
    // --- Library scan errors ---
    #[error("Library directory {path} cannot be read: {source}")]
    LibraryDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid delimiter '{0}' — must be exactly one character")]
    InvalidDelimiter(String),

    #[error("Invalid module name '{0}'")]
    InvalidModuleName(String),

    #[error("Library path {0} is not valid UTF-8")]
    NonUtf8Path(PathBuf),

    #[error("Library path {path} contains the resource delimiter '{delimiter}'")]
    DelimiterInPath { path: PathBuf, delimiter: char },

    // --- Secret errors ---
    #[error("Secrets root {path} cannot be read: {source}")]
    SecretsRootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret '{alias}' has no password file at {path}")]
    MissingPassword { alias: String, path: PathBuf },

    #[error("Secret directory name '{0}' is not valid UTF-8")]
    InvalidAliasName(String),

    #[error("Secret '{0}' is not valid UTF-8, which console arguments require on this platform")]
    NonUtf8Secret(String),

    // --- Console errors ---
    #[error("Console executable '{0}' not found")]
    ConsoleNotFound(String),

    #[error("Console exited with code {code} while running {operation}")]
    ConsoleFailed { operation: String, code: i32 },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for provisio results.
pub type Result<T> = std::result::Result<T, ProvisionError>;
