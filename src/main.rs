use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use provisio::cli::commands;
use provisio::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // PROVISIO_LOG takes precedence over --verbose.
    let filter = EnvFilter::try_from_env("PROVISIO_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("provisio=debug")
        } else {
            EnvFilter::new("provisio=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Module => commands::module::execute(&cli),
        Commands::Aliases => commands::aliases::execute(&cli),
        Commands::Secrets { json } => commands::secrets_cmd::execute(&cli, json),
        Commands::Plan { json } => commands::plan::execute(&cli, json),
        Commands::Provision => commands::provision::execute(&cli),
        Commands::History { last, ref since } => {
            commands::history::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        provisio::cli::output::error(&e.to_string());
        if let provisio::errors::ProvisionError::ConfigError(_) = e {
            provisio::cli::output::tip("Settings come from .provisio.toml or the matching --flag.");
        }
        std::process::exit(1);
    }
}
