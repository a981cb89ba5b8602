//! `provisio completions <shell>`: print a completion script to stdout.
//!
//! The shell argument is validated by clap; `provisio completions --help`
//! lists the accepted values.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    generate(shell, &mut Cli::command(), "provisio", out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Commands;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_names_the_subcommands() {
        let out = script(Shell::Bash);
        assert!(out.contains("provisio"));
        assert!(out.contains("provision"));
        assert!(out.contains("history"));
    }

    #[test]
    fn every_supported_shell_generates() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!script(shell).is_empty(), "{shell} produced nothing");
        }
    }

    #[test]
    fn shell_is_parsed_by_clap() {
        let cli = Cli::try_parse_from(["provisio", "completions", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));

        assert!(Cli::try_parse_from(["provisio", "completions", "tcsh"]).is_err());
    }
}
