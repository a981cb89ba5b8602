//! `provisio module`: register the library directory as one module.

use crate::cli::output;
use crate::cli::{load_settings, open_console, Cli};
use crate::errors::Result;
use crate::registrar::Registrar;

/// Execute the `module` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let registrar = Registrar::new(settings.registrar_config()?)?;
    let mut console = open_console(cli, &settings)?;

    let command = registrar.register(console.as_mut(), &settings.console)?;

    if !cli.dry_run {
        output::success(&format!(
            "Registered module '{}' with {} resource(s)",
            command.name,
            command.resources.len()
        ));
    }

    Ok(())
}
