//! A console that reports what it would run instead of running it.

use std::fmt;

use tracing::info;

use super::{Console, Invocation, Operation};
use crate::errors::Result;

/// Records redacted invocations; nothing is executed.
///
/// Each redacted argv is also handed to an optional printer, so callers
/// decide how a dry run is shown.
#[derive(Default)]
pub struct DryRunConsole {
    printer: Option<Box<dyn FnMut(&str)>>,
    recorded: Vec<(Operation, String)>,
}

impl DryRunConsole {
    /// Record and pass every redacted argv to `printer`.
    pub fn printing(printer: impl FnMut(&str) + 'static) -> Self {
        Self {
            printer: Some(Box::new(printer)),
            recorded: Vec::new(),
        }
    }

    /// Record without printing anything.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// The redacted argv of every invocation seen, in order.
    pub fn recorded(&self) -> &[(Operation, String)] {
        &self.recorded
    }
}

impl fmt::Debug for DryRunConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DryRunConsole")
            .field("printing", &self.printer.is_some())
            .field("recorded", &self.recorded)
            .finish()
    }
}

impl Console for DryRunConsole {
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        info!(
            operation = %invocation.operation(),
            target = invocation.target(),
            "dry run, not invoking console"
        );
        if let Some(print) = self.printer.as_mut() {
            print(invocation.display());
        }
        self.recorded
            .push((invocation.operation(), invocation.display().to_string()));
        Ok(())
    }
}
