use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::console::ConsoleConfig;
use crate::errors::{ProvisionError, Result};
use crate::registrar::{parse_delimiter, RegistrarConfig};
use crate::secrets::{AliasTemplate, PasswordInput};

/// Project-level configuration, loaded from `.provisio.toml`.
///
/// Paths and names that differ per server live here rather than in code,
/// so one binary serves every host. Anything left unset must be supplied
/// on the command line before the command that needs it runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// How to reach the administrative console.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Library module registration.
    #[serde(default)]
    pub module: ModuleSettings,

    /// Credential alias creation.
    #[serde(default)]
    pub secrets: SecretsSettings,

    /// Provisioning history.
    #[serde(default)]
    pub audit: AuditSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSettings {
    /// Directory scanned for library archives.
    pub library_dir: Option<PathBuf>,

    /// Module name passed to `module add --name=`.
    pub name: Option<String>,

    /// Resource path delimiter (one character, default [`DEFAULT_DELIMITER`]).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Also pass `--resource-delimiter=` to the console.
    #[serde(default)]
    pub explicit_delimiter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsSettings {
    /// Directory holding one sub-directory per alias.
    pub root: Option<PathBuf>,

    /// Argv for one alias-creation call, with `{alias}`, `{username}`
    /// and `{password}` placeholders.
    #[serde(default = "default_alias_args")]
    pub alias_args: Vec<String>,

    /// How the password is handed to the console.
    #[serde(default)]
    pub password_input: PasswordInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Directory (relative to project root) holding `audit.db`.
    #[serde(default = "default_audit_dir")]
    pub dir: PathBuf,
}

// ── Serde default helpers ────────────────────────────────────────────

/// The platform's path-list separator, which is also the console's own
/// resource delimiter. `:` cannot be used on Windows, where every absolute
/// path contains one.
pub const DEFAULT_DELIMITER: &str = if cfg!(windows) { ";" } else { ":" };

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_alias_args() -> Vec<String> {
    vec![
        "--alias={alias}".to_string(),
        "--username={username}".to_string(),
        "--password={password}".to_string(),
    ]
}

fn default_audit_dir() -> PathBuf {
    PathBuf::from(".provisio")
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            library_dir: None,
            name: None,
            delimiter: default_delimiter(),
            explicit_delimiter: false,
        }
    }
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            root: None,
            alias_args: default_alias_args(),
            password_input: PasswordInput::default(),
        }
    }
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            dir: default_audit_dir(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".provisio.toml";

    /// Load settings from `<project_dir>/.provisio.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_file(&config_path)
    }

    /// Load settings from an explicit path, which must exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProvisionError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            ProvisionError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Build the registrar inputs; library dir and module name must be set.
    pub fn registrar_config(&self) -> Result<RegistrarConfig> {
        let library_dir = self.module.library_dir.clone().ok_or_else(|| {
            ProvisionError::ConfigError(
                "module.library_dir is not set (use --library-dir)".into(),
            )
        })?;
        let module_name = self.module.name.clone().ok_or_else(|| {
            ProvisionError::ConfigError("module.name is not set (use --module-name)".into())
        })?;

        Ok(RegistrarConfig {
            library_dir,
            module_name,
            delimiter: parse_delimiter(&self.module.delimiter)?,
            explicit_delimiter: self.module.explicit_delimiter,
        })
    }

    /// The secrets root; must be set.
    pub fn secrets_root(&self) -> Result<&Path> {
        self.secrets.root.as_deref().ok_or_else(|| {
            ProvisionError::ConfigError("secrets.root is not set (use --secrets-root)".into())
        })
    }

    /// Build the validated alias-creation template.
    pub fn alias_template(&self) -> Result<AliasTemplate> {
        AliasTemplate::new(self.secrets.alias_args.clone(), self.secrets.password_input)
    }

    /// Directory holding the provisioning history database.
    pub fn audit_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.audit.dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
