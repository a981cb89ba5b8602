//! `provisio provision`: register the module, then create the aliases.
//!
//! Every input is read and validated before the first console call, so a
//! missing password file or an unreadable library directory aborts the run
//! with the server untouched. After that, the first console failure stops
//! the run.

use tracing::info;

use crate::cli::output;
use crate::cli::{load_settings, open_console, Cli};
use crate::console::Console;
use crate::errors::Result;
use crate::registrar::Registrar;
use crate::secrets::{create_aliases, load_secrets};

/// Execute the `provision` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;

    let registrar = Registrar::new(settings.registrar_config()?)?;
    let template = settings.alias_template()?;
    let records = load_secrets(settings.secrets_root()?)?;
    let command = registrar.command()?;

    info!(
        module = %command.name,
        aliases = records.len(),
        "inputs validated, starting provisioning"
    );

    let mut console = open_console(cli, &settings)?;

    console.execute(&command.invocation(&settings.console))?;
    if !cli.dry_run {
        output::success(&format!(
            "Registered module '{}' with {} resource(s)",
            command.name,
            command.resources.len()
        ));
    }

    let created = create_aliases(&records, &template, console.as_mut())?;
    if !cli.dry_run {
        output::success(&format!("Created {} alias(es)", created.len()));
    }

    Ok(())
}
