//! `provisio history`: display provisioning history.
//!
//! Usage:
//!   provisio history               # show last 50 entries
//!   provisio history --last 20     # show last 20
//!   provisio history --since 7d    # entries from last 7 days

use chrono::{TimeDelta, Utc};

use crate::cli::{load_settings, Cli};
use crate::errors::{ProvisionError, Result};

/// Execute the `history` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::output;

    let settings = load_settings(cli)?;
    let dir = settings.audit_dir(&std::env::current_dir()?);

    if !AuditLog::db_path(&dir).exists() {
        output::info("No provisioning history yet.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| ProvisionError::AuditError("failed to open history database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No history entries found.");
        return Ok(());
    }

    print_history_table(&entries);

    Ok(())
}

/// Execute the `history` command (built without history support).
#[cfg(not(feature = "audit-log"))]
pub fn execute(cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    let _ = load_settings(cli)?;
    if let Some(s) = since {
        parse_duration(s)?;
    }
    Err(ProvisionError::AuditError(
        "provisio was built without the `audit-log` feature".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(ProvisionError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        ProvisionError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let out_of_range = || {
        ProvisionError::CommandFailed(format!(
            "invalid duration '{input}' — value is out of range"
        ))
    };

    let duration = match unit {
        'd' => TimeDelta::try_days(num),
        'h' => TimeDelta::try_hours(num),
        _ => TimeDelta::try_minutes(num),
    }
    .ok_or_else(out_of_range)?;

    Utc::now().checked_sub_signed(duration).ok_or_else(out_of_range)
}

/// Print history entries in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_history_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Target", "Outcome", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.operation.clone(),
            entry.target.clone(),
            colorize_outcome(&entry.outcome),
            entry.details.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} history entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_outcome(outcome: &str) -> String {
    use console::style;

    match outcome {
        crate::audit::OUTCOME_OK => style(outcome).green().to_string(),
        crate::audit::OUTCOME_FAILED => style(outcome).red().to_string(),
        _ => outcome.to_string(),
    }
}
