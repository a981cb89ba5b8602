//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::config::Settings;
use crate::console::{Console, DryRunConsole, ProcessConsole};
use crate::errors::Result;

/// provisio CLI: application-server module and alias provisioning.
#[derive(Parser)]
#[command(
    name = "provisio",
    about = "Register library modules and credential aliases on an application server",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./.provisio.toml if present)
    #[arg(long, global = true, env = "PROVISIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console executable (overrides console.executable)
    #[arg(long, global = true, env = "PROVISIO_CONSOLE")]
    pub console: Option<String>,

    /// Directory scanned for library archives (overrides module.library_dir)
    #[arg(long, global = true, env = "PROVISIO_LIBRARY_DIR")]
    pub library_dir: Option<PathBuf>,

    /// Module name (overrides module.name)
    #[arg(long, global = true)]
    pub module_name: Option<String>,

    /// Resource path delimiter, one character (overrides module.delimiter)
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    /// Pass --resource-delimiter to the console
    #[arg(long, global = true)]
    pub explicit_delimiter: bool,

    /// Directory holding one sub-directory per alias (overrides secrets.root)
    #[arg(long, global = true, env = "PROVISIO_SECRETS_ROOT")]
    pub secrets_root: Option<PathBuf>,

    /// Print console invocations instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Register every file in the library directory as one module
    Module,

    /// Create a credential alias for every entry in the secrets root
    Aliases,

    /// List the entries in the secrets root (values are never shown)
    Secrets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the console invocations without running them
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register the module, then create the aliases
    Provision,

    /// Show provisioning history
    History {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config` or the working directory, then apply
/// command-line overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_file(path)?,
        None => Settings::load(&std::env::current_dir()?)?,
    };

    if let Some(console) = &cli.console {
        settings.console.executable = console.clone();
    }
    if let Some(dir) = &cli.library_dir {
        settings.module.library_dir = Some(dir.clone());
    }
    if let Some(name) = &cli.module_name {
        settings.module.name = Some(name.clone());
    }
    if let Some(delimiter) = &cli.delimiter {
        settings.module.delimiter = delimiter.clone();
    }
    if cli.explicit_delimiter {
        settings.module.explicit_delimiter = true;
    }
    if let Some(root) = &cli.secrets_root {
        settings.secrets.root = Some(root.clone());
    }

    Ok(settings)
}

/// Build the console every mutating command talks to.
///
/// `--dry-run` gives a printing console; otherwise the real console binary
/// is resolved and, when history is compiled in, wrapped so every call is
/// recorded.
pub fn open_console(cli: &Cli, settings: &Settings) -> Result<Box<dyn Console>> {
    if cli.dry_run {
        return Ok(Box::new(DryRunConsole::printing(|line| {
            output::info(&format!("[dry-run] {line}"))
        })));
    }

    let console = ProcessConsole::new(&settings.console)?;

    #[cfg(feature = "audit-log")]
    let console = {
        let dir = settings.audit_dir(&std::env::current_dir()?);
        crate::audit::AuditedConsole::new(console, crate::audit::AuditLog::open_or_create(&dir))
    };

    Ok(Box::new(console))
}
