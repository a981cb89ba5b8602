//! `provisio plan`: show every console invocation without running any.
//!
//! Uses the same code paths as `module` and `aliases`, against a console
//! that only records. Passwords are rendered as `********`.

use serde::Serialize;

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::config::Settings;
use crate::console::{render_args, DryRunConsole, Operation};
use crate::errors::{ProvisionError, Result};
use crate::registrar::{ModuleAddCommand, Registrar};
use crate::secrets::{create_aliases, load_secrets};

/// Everything `provision` would do, in order.
#[derive(Debug, Serialize)]
pub struct Plan {
    pub module: Option<ModuleAddCommand>,
    pub calls: Vec<PlannedCall>,
}

/// One console invocation, redacted.
#[derive(Debug, Serialize)]
pub struct PlannedCall {
    pub operation: Operation,
    pub argv: String,
}

/// Execute the `plan` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let plan = build_plan(&settings)?;

    if json {
        let out = serde_json::to_string_pretty(&plan)
            .map_err(|e| ProvisionError::SerializationError(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    if plan.calls.is_empty() {
        output::info("Nothing to do.");
        return Ok(());
    }

    for (i, call) in plan.calls.iter().enumerate() {
        println!("{:>3}. [{}] {}", i + 1, call.operation, call.argv);
    }

    Ok(())
}

/// Build the plan from whichever sections are configured.
///
/// The module step is included when both library dir and module name are
/// set; the alias steps when a secrets root is set.
pub fn build_plan(settings: &Settings) -> Result<Plan> {
    let module_configured =
        settings.module.library_dir.is_some() && settings.module.name.is_some();
    let aliases_configured = settings.secrets.root.is_some();

    if !module_configured && !aliases_configured {
        return Err(ProvisionError::ConfigError(
            "nothing to plan: set module.library_dir and module.name, or secrets.root".into(),
        ));
    }

    let mut console = DryRunConsole::quiet();
    let mut module = None;

    if module_configured {
        let registrar = Registrar::new(settings.registrar_config()?)?;
        module = Some(registrar.register(&mut console, &settings.console)?);
    }

    if aliases_configured {
        let template = settings.alias_template()?;
        let records = load_secrets(settings.secrets_root()?)?;
        create_aliases(&records, &template, &mut console)?;
    }

    let mut prefix = vec![settings.console.executable.clone()];
    prefix.extend(settings.console.args.iter().cloned());
    let prefix = render_args(&prefix);

    let calls = console
        .recorded()
        .iter()
        .map(|(operation, display)| {
            let command = quote_command(&settings.console.command_flag, *operation, display);
            PlannedCall {
                operation: *operation,
                argv: format!("{prefix} {command}"),
            }
        })
        .collect();

    Ok(Plan { module, calls })
}

/// Module commands travel as one argument after the command flag; show them
/// quoted so the rendered line can be pasted into a shell.
fn quote_command(flag: &str, operation: Operation, display: &str) -> String {
    match operation {
        Operation::ModuleAdd if flag.ends_with('=') => format!("'{flag}{display}'"),
        Operation::ModuleAdd if flag.is_empty() => format!("'{display}'"),
        Operation::ModuleAdd => format!("{flag} '{display}'"),
        Operation::AliasAdd => display.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn plan_requires_something_configured() {
        assert!(build_plan(&Settings::default()).is_err());
    }

    #[test]
    fn plan_lists_module_then_aliases() {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        let secrets = tmp.path().join("secrets");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("a.jar"), b"").unwrap();
        fs::create_dir_all(secrets.join("ds")).unwrap();
        fs::write(secrets.join("ds/password"), b"topsecret").unwrap();
        fs::write(secrets.join("ds/username"), b"app").unwrap();

        let mut settings = Settings::default();
        settings.module.library_dir = Some(lib.clone());
        settings.module.name = Some("org.example".into());
        settings.secrets.root = Some(secrets);

        let plan = build_plan(&settings).unwrap();
        assert_eq!(plan.calls.len(), 2);
        assert_eq!(plan.calls[0].operation, Operation::ModuleAdd);
        assert_eq!(
            plan.calls[0].argv,
            format!(
                "jboss-cli.sh '--command=module add --name=org.example --resources={}'",
                lib.join("a.jar").display()
            )
        );
        assert_eq!(plan.calls[1].operation, Operation::AliasAdd);
        assert_eq!(
            plan.calls[1].argv,
            "jboss-cli.sh --alias=ds --username=app --password=********"
        );
        assert_eq!(
            plan.module.unwrap().resources,
            vec![lib.join("a.jar")]
        );
    }

    #[test]
    fn plan_never_contains_passwords() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("mq")).unwrap();
        fs::write(tmp.path().join("mq/password"), b"do-not-print").unwrap();

        let mut settings = Settings::default();
        settings.secrets.root = Some(PathBuf::from(tmp.path()));

        let plan = build_plan(&settings).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        assert!(!json.contains("do-not-print"));
        assert!(plan.module.is_none());
    }

    #[test]
    fn quote_command_variants() {
        assert_eq!(
            quote_command("--command=", Operation::ModuleAdd, "module add"),
            "'--command=module add'"
        );
        assert_eq!(
            quote_command("-c", Operation::ModuleAdd, "module add"),
            "-c 'module add'"
        );
        assert_eq!(
            quote_command("", Operation::ModuleAdd, "module add"),
            "'module add'"
        );
        assert_eq!(quote_command("-c", Operation::AliasAdd, "a b"), "a b");
    }
}
