//! Configuration: `.provisio.toml` loading.

pub mod settings;

pub use settings::{AuditSettings, ModuleSettings, SecretsSettings, Settings, DEFAULT_DELIMITER};
