//! `provisio aliases`: create one credential alias per secret entry.

use crate::cli::output;
use crate::cli::{load_settings, open_console, Cli};
use crate::errors::Result;
use crate::secrets::{create_aliases, load_secrets};

/// Execute the `aliases` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let template = settings.alias_template()?;
    let root = settings.secrets_root()?;

    // Read everything first: a missing password aborts before any console call.
    let records = load_secrets(root)?;
    if records.is_empty() {
        output::warning(&format!("No secret entries found in {}", root.display()));
        return Ok(());
    }

    let mut console = open_console(cli, &settings)?;
    let created = create_aliases(&records, &template, console.as_mut())?;

    if !cli.dry_run {
        for alias in &created {
            output::info(&format!("  + {alias}"));
        }
        output::success(&format!("Created {} alias(es)", created.len()));
    }

    Ok(())
}
