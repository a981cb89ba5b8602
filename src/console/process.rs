//! Executes invocations by spawning the console binary.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info};

use super::{Console, ConsoleConfig, Invocation};
use crate::errors::{ProvisionError, Result};

/// Runs each invocation as a child process of the configured console.
#[derive(Debug)]
pub struct ProcessConsole {
    executable: PathBuf,
    base_args: Vec<OsString>,
}

impl ProcessConsole {
    /// Resolve the console executable and build a console handle.
    ///
    /// A bare name (no path separator) is looked up on `PATH`; an explicit
    /// path must exist.
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let executable = resolve_executable(&config.executable)?;
        debug!(executable = %executable.display(), "resolved console executable");

        Ok(Self {
            executable,
            base_args: config.args.iter().map(OsString::from).collect(),
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn spawn(&self, invocation: &Invocation) -> io::Result<ExitStatus> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.base_args).args(invocation.args());

        let Some(input) = invocation.stdin() else {
            return cmd.status();
        };

        let mut child = cmd.stdin(Stdio::piped()).spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The console may exit before reading everything it was given.
            match stdin.write_all(input) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }
        child.wait()
    }
}

impl Console for ProcessConsole {
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        info!(
            operation = %invocation.operation(),
            target = invocation.target(),
            "invoking console"
        );
        debug!(argv = invocation.display(), "console argv");

        let status = self.spawn(invocation).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ProvisionError::ConsoleNotFound(self.executable.display().to_string())
            } else {
                ProvisionError::CommandFailed(format!(
                    "failed to run {}: {e}",
                    self.executable.display()
                ))
            }
        })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ProvisionError::ConsoleFailed {
                operation: format!("{} {}", invocation.operation(), invocation.target()),
                code,
            }),
            None => Err(ProvisionError::CommandFailed(
                "console terminated by signal".into(),
            )),
        }
    }
}

fn resolve_executable(name: &str) -> Result<PathBuf> {
    if name.trim().is_empty() {
        return Err(ProvisionError::ConfigError(
            "console executable is not set".into(),
        ));
    }

    let path = Path::new(name);
    if path.components().count() > 1 || path.is_absolute() {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ProvisionError::ConsoleNotFound(name.to_string()));
    }

    which::which(name).map_err(|_| ProvisionError::ConsoleNotFound(name.to_string()))
}
