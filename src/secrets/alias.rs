//! Alias creation: expands an argv template per secret record.
//!
//! Placeholders `{alias}`, `{username}` and `{password}` are substituted
//! inside individual argv elements. The result goes straight to the console
//! process as separate arguments; it is never joined into a shell string.

use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

use super::record::{bytes_to_os, SecretRecord};
use crate::console::{render_args, Console, Invocation, Operation};
use crate::errors::{ProvisionError, Result};

const ALIAS: &str = "{alias}";
const USERNAME: &str = "{username}";
const PASSWORD: &str = "{password}";

/// Shown instead of the password in any rendered invocation.
pub const REDACTED: &str = "********";

/// How the password reaches the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordInput {
    /// Substituted into the `{password}` placeholder of an argument.
    #[default]
    Argument,
    /// Written to the console's standard input; no placeholder allowed.
    Stdin,
}

/// Validated argv template for one alias-creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTemplate {
    args: Vec<String>,
    password_input: PasswordInput,
}

impl AliasTemplate {
    pub fn new(args: Vec<String>, password_input: PasswordInput) -> Result<Self> {
        if !args.iter().any(|a| a.contains(ALIAS)) {
            return Err(ProvisionError::ConfigError(format!(
                "secrets.alias_args must contain an {ALIAS} placeholder"
            )));
        }

        let has_password = args.iter().any(|a| a.contains(PASSWORD));
        match (password_input, has_password) {
            (PasswordInput::Argument, false) => Err(ProvisionError::ConfigError(format!(
                "secrets.alias_args must contain a {PASSWORD} placeholder unless password_input = \"stdin\""
            ))),
            (PasswordInput::Stdin, true) => Err(ProvisionError::ConfigError(format!(
                "secrets.alias_args must not contain {PASSWORD} when password_input = \"stdin\""
            ))),
            _ => Ok(Self {
                args,
                password_input,
            }),
        }
    }

    /// Build the invocation for one record.
    pub fn invocation(&self, record: &SecretRecord) -> Result<Invocation> {
        let mut args = Vec::with_capacity(self.args.len());
        let mut shown = Vec::with_capacity(self.args.len());

        for template in &self.args {
            args.push(bytes_to_os(
                &record.alias,
                expand(
                    template,
                    record.alias.as_bytes(),
                    &record.username,
                    &record.password,
                ),
            )?);
            shown.push(
                String::from_utf8_lossy(&expand(
                    template,
                    record.alias.as_bytes(),
                    &record.username,
                    REDACTED.as_bytes(),
                ))
                .into_owned(),
            );
        }

        let mut display = render_args(&shown);
        if self.password_input == PasswordInput::Stdin {
            display.push_str(" < ");
            display.push_str(REDACTED);
        }

        let invocation = Invocation::new(Operation::AliasAdd, &record.alias, args, display);
        Ok(match self.password_input {
            PasswordInput::Argument => invocation,
            PasswordInput::Stdin => invocation.with_stdin(Zeroizing::new(record.password.to_vec())),
        })
    }
}

/// Substitute the placeholders in one template argument.
fn expand(template: &str, alias: &[u8], username: &[u8], password: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.extend_from_slice(rest[..start].as_bytes());
        let tail = &rest[start..];

        let (value, len) = if tail.starts_with(ALIAS) {
            (alias, ALIAS.len())
        } else if tail.starts_with(USERNAME) {
            (username, USERNAME.len())
        } else if tail.starts_with(PASSWORD) {
            (password, PASSWORD.len())
        } else {
            (&b"{"[..], 1)
        };

        out.extend_from_slice(value);
        rest = &tail[len..];
    }

    out.extend_from_slice(rest.as_bytes());
    out
}

/// Forward every record to the console, stopping at the first failure.
///
/// Returns the aliases that were created.
pub fn create_aliases(
    records: &[SecretRecord],
    template: &AliasTemplate,
    console: &mut dyn Console,
) -> Result<Vec<String>> {
    let mut created = Vec::with_capacity(records.len());
    for record in records {
        info!(alias = %record.alias, "creating alias");
        console.execute(&template.invocation(record)?)?;
        created.push(record.alias.clone());
    }
    Ok(created)
}
