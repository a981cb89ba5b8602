//! `provisio secrets`: list what the secrets root holds, without values.

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::{ProvisionError, Result};
use crate::secrets::{load_secrets, SecretSummary};

/// Execute the `secrets` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let root = settings.secrets_root()?;

    let summaries: Vec<SecretSummary> = load_secrets(root)?.iter().map(|r| r.summary()).collect();

    if json {
        let out = serde_json::to_string_pretty(&summaries)
            .map_err(|e| ProvisionError::SerializationError(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    output::info(&format!(
        "{} — {} entr{}",
        root.display(),
        summaries.len(),
        if summaries.len() == 1 { "y" } else { "ies" }
    ));
    output::print_secrets_table(&summaries);

    Ok(())
}
