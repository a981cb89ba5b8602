pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod registrar;
pub mod secrets;

#[cfg(feature = "audit-log")]
pub mod audit;
