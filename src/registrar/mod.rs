//! Registrar module: turns a library directory into one `module add` call.
//!
//! This module provides:
//! - Directory scanning and resource joining (`scan`)
//! - `RegistrarConfig`: the explicit inputs of a registration
//! - `ModuleAddCommand`: the rendered console command
//! - `Registrar`: validates config, builds the command, hands it to a `Console`

pub mod scan;

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::console::{Console, ConsoleConfig, Invocation, Operation};
use crate::errors::{ProvisionError, Result};

pub use scan::{join_resources, scan_library};

/// Inputs of a module registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarConfig {
    /// Directory whose regular files become the module's resources.
    pub library_dir: PathBuf,

    /// Module name as the console knows it (e.g. `org.example.integration`).
    pub module_name: String,

    /// Single character separating resource paths.
    pub delimiter: char,

    /// Also pass `--resource-delimiter=<delimiter>` to the console.
    pub explicit_delimiter: bool,
}

/// Parse a delimiter setting; it must be exactly one character.
pub fn parse_delimiter(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(ProvisionError::InvalidDelimiter(raw.to_string())),
    }
}

fn module_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid module name regex"))
}

/// Check that a module name is safe to place in `--name=`.
pub fn validate_module_name(name: &str, delimiter: char) -> Result<()> {
    if !module_name_pattern().is_match(name) || name.contains(delimiter) {
        return Err(ProvisionError::InvalidModuleName(name.to_string()));
    }
    Ok(())
}

/// A rendered `module add` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleAddCommand {
    pub name: String,
    pub resources: Vec<PathBuf>,
    pub delimiter: char,
    pub explicit_delimiter: bool,
    /// The joined `--resources` value.
    pub resources_arg: String,
}

impl ModuleAddCommand {
    /// Build the command from already-scanned resources.
    pub fn new(
        name: &str,
        resources: Vec<PathBuf>,
        delimiter: char,
        explicit_delimiter: bool,
    ) -> Result<Self> {
        validate_module_name(name, delimiter)?;
        let resources_arg = join_resources(&resources, delimiter)?;

        Ok(Self {
            name: name.to_string(),
            resources,
            delimiter,
            explicit_delimiter,
            resources_arg,
        })
    }

    /// Build the invocation that hands this command to the console.
    pub fn invocation(&self, console: &ConsoleConfig) -> Invocation {
        let command = self.to_string();
        let args = console.command_args(&command);
        Invocation::new(Operation::ModuleAdd, &self.name, args, command)
    }
}

impl fmt::Display for ModuleAddCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "module add --name={} --resources={}",
            self.name, self.resources_arg
        )?;
        if self.explicit_delimiter {
            write!(f, " --resource-delimiter={}", self.delimiter)?;
        }
        Ok(())
    }
}

/// Registers one library directory as one console module.
#[derive(Debug, Clone)]
pub struct Registrar {
    config: RegistrarConfig,
}

impl Registrar {
    /// Validate the configuration up front, before touching the filesystem.
    pub fn new(config: RegistrarConfig) -> Result<Self> {
        if config.delimiter.is_whitespace() {
            return Err(ProvisionError::InvalidDelimiter(config.delimiter.to_string()));
        }
        validate_module_name(&config.module_name, config.delimiter)?;
        Ok(Self { config })
    }

    /// Scan the library directory and render the command.
    pub fn command(&self) -> Result<ModuleAddCommand> {
        let resources = scan_library(&self.config.library_dir)?;
        if resources.is_empty() {
            warn!(
                dir = %self.config.library_dir.display(),
                "library directory is empty, registering module with no resources"
            );
        }

        ModuleAddCommand::new(
            &self.config.module_name,
            resources,
            self.config.delimiter,
            self.config.explicit_delimiter,
        )
    }

    /// Build the command and hand it to `console` exactly once.
    pub fn register(
        &self,
        console: &mut dyn Console,
        console_config: &ConsoleConfig,
    ) -> Result<ModuleAddCommand> {
        let command = self.command()?;
        info!(
            module = %command.name,
            resources = command.resources.len(),
            "registering module"
        );
        console.execute(&command.invocation(console_config))?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    use crate::console::DryRunConsole;

    fn config(dir: &TempDir) -> RegistrarConfig {
        RegistrarConfig {
            library_dir: dir.path().to_path_buf(),
            module_name: "org.example.integration".into(),
            delimiter: ':',
            explicit_delimiter: false,
        }
    }

    #[test]
    fn parse_delimiter_accepts_single_char() {
        assert_eq!(parse_delimiter(":").unwrap(), ':');
        assert_eq!(parse_delimiter(";").unwrap(), ';');
    }

    #[test]
    fn parse_delimiter_rejects_other_lengths() {
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("::").is_err());
        assert!(parse_delimiter(" ").is_err());
    }

    #[test]
    fn module_names() {
        assert!(validate_module_name("org.example.integration", ':').is_ok());
        assert!(validate_module_name("my-module_2", ':').is_ok());
        assert!(validate_module_name("", ':').is_err());
        assert!(validate_module_name("has space", ':').is_err());
        assert!(validate_module_name("a.b", '.').is_err());
    }

    #[test]
    fn display_without_explicit_delimiter() {
        let cmd = ModuleAddCommand::new(
            "m",
            vec![PathBuf::from("/l/a.jar"), PathBuf::from("/l/b.jar")],
            ':',
            false,
        )
        .unwrap();
        assert_eq!(
            cmd.to_string(),
            "module add --name=m --resources=/l/a.jar:/l/b.jar"
        );
    }

    #[test]
    fn display_with_explicit_delimiter() {
        let cmd = ModuleAddCommand::new("m", vec![PathBuf::from("/l/a.jar")], ';', true).unwrap();
        assert_eq!(
            cmd.to_string(),
            "module add --name=m --resources=/l/a.jar --resource-delimiter=;"
        );
    }

    #[test]
    fn invocation_uses_console_command_flag() {
        let cmd = ModuleAddCommand::new("m", vec![PathBuf::from("/l/a.jar")], ':', false).unwrap();
        let inv = cmd.invocation(&ConsoleConfig::new("jboss-cli.sh"));
        assert_eq!(
            inv.args(),
            &[OsString::from("--command=module add --name=m --resources=/l/a.jar")]
        );
        assert_eq!(inv.operation(), Operation::ModuleAdd);
        assert_eq!(inv.target(), "m");
    }

    #[test]
    fn new_rejects_bad_module_name() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir);
        cfg.module_name = "bad:name".into();
        assert!(matches!(
            Registrar::new(cfg),
            Err(ProvisionError::InvalidModuleName(_))
        ));
    }

    #[test]
    fn register_invokes_console_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jar"), b"").unwrap();

        let registrar = Registrar::new(config(&dir)).unwrap();
        let mut console = DryRunConsole::quiet();
        let cmd = registrar
            .register(&mut console, &ConsoleConfig::new("jboss-cli.sh"))
            .unwrap();

        assert_eq!(console.recorded().len(), 1);
        assert_eq!(console.recorded()[0].1, cmd.to_string());
    }

    #[test]
    fn empty_directory_passes_empty_resources() {
        let dir = TempDir::new().unwrap();
        let registrar = Registrar::new(config(&dir)).unwrap();

        let cmd = registrar.command().unwrap();
        assert_eq!(cmd.resources_arg, "");
        assert_eq!(
            cmd.to_string(),
            "module add --name=org.example.integration --resources="
        );
    }
}
