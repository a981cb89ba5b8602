//! One module per subcommand.

pub mod aliases;
pub mod completions;
pub mod history;
pub mod module;
pub mod plan;
pub mod provision;
pub mod secrets_cmd;
