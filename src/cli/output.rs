//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::secrets::SecretSummary;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of secret entries (Alias, Username, Password length).
pub fn print_secrets_table(secrets: &[SecretSummary]) {
    if secrets.is_empty() {
        info("No secret entries in the secrets root.");
        tip("Create <root>/<alias>/password (and optionally username) to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Alias", "Username", "Password"]);

    for s in secrets {
        let username = if s.has_username {
            format!("{} bytes", s.username_len)
        } else {
            style("missing").yellow().to_string()
        };
        table.add_row(vec![
            s.alias.clone(),
            username,
            format!("{} bytes", s.password_len),
        ]);
    }

    println!("{table}");
}
