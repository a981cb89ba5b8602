//! Secrets module: credential aliases sourced from a secrets directory.
//!
//! This module provides:
//! - `SecretRecord` and `SecretSummary` types (`record`)
//! - Reading records from `<root>/<alias>/{username,password}` (`loader`)
//! - Alias-creation argv templates and the creation loop (`alias`)

pub mod alias;
pub mod loader;
pub mod record;

// Re-export the most commonly used items.
pub use alias::{create_aliases, AliasTemplate, PasswordInput, REDACTED};
pub use loader::{load_record, load_secrets};
pub use record::{SecretRecord, SecretSummary};
