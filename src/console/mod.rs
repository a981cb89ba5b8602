//! Console module: the seam to the vendor's administrative console.
//!
//! This module provides:
//! - `Invocation`: one argv (plus optional stdin) handed to the console
//! - `Console`: the trait every executor implements
//! - `ProcessConsole`: spawns the real console binary (`process`)
//! - `DryRunConsole`: prints and records instead of executing (`dry_run`)
//!
//! Arguments are always passed as separate argv elements. No shell is
//! involved, so secret material is never re-parsed by `sh -c`.

pub mod dry_run;
pub mod process;

use std::ffi::OsString;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::Result;

pub use dry_run::DryRunConsole;
pub use process::ProcessConsole;

/// What a console invocation does, used for logging and provisioning history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    ModuleAdd,
    AliasAdd,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ModuleAdd => "module-add",
            Operation::AliasAdd => "alias-add",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call into the console.
///
/// `args` are appended after the console's configured base arguments.
/// `display` is a redacted rendering safe to print or log. Argv and stdin
/// buffers are zeroed on drop.
pub struct Invocation {
    operation: Operation,
    target: String,
    args: Vec<OsString>,
    stdin: Option<Zeroizing<Vec<u8>>>,
    display: String,
}

impl Invocation {
    pub fn new(
        operation: Operation,
        target: impl Into<String>,
        args: Vec<OsString>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            target: target.into(),
            args,
            stdin: None,
            display: display.into(),
        }
    }

    /// Attach bytes to be written to the console's standard input.
    pub fn with_stdin(mut self, input: Zeroizing<Vec<u8>>) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The module name or alias this invocation acts on.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn stdin(&self) -> Option<&[u8]> {
        self.stdin.as_ref().map(|s| s.as_slice())
    }

    /// Redacted rendering of the argv.
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        self.wipe_args();
    }
}

impl Invocation {
    /// Overwrite and release the argv buffers, which may hold an expanded
    /// password.
    fn wipe_args(&mut self) {
        for arg in self.args.drain(..) {
            wipe_os(arg);
        }
    }
}

#[cfg(unix)]
fn wipe_os(arg: OsString) {
    use std::os::unix::ffi::OsStringExt;
    drop(Zeroizing::new(arg.into_vec()));
}

#[cfg(not(unix))]
fn wipe_os(arg: OsString) {
    if let Ok(s) = arg.into_string() {
        drop(Zeroizing::new(s));
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("operation", &self.operation)
            .field("target", &self.target)
            .field("display", &self.display)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Anything that can carry out console invocations.
pub trait Console {
    /// Run one invocation to completion. A failing console call is fatal.
    fn execute(&mut self, invocation: &Invocation) -> Result<()>;
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        (**self).execute(invocation)
    }
}

/// How to reach the console binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Path or bare name (looked up on `PATH`) of the console executable.
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Arguments placed before every invocation (e.g. `--connect`).
    #[serde(default)]
    pub args: Vec<String>,

    /// Flag used to hand a command string to the console.
    ///
    /// A flag ending in `=` is glued to the command (`--command=module add ...`);
    /// otherwise flag and command are two arguments. Empty means the command
    /// is passed on its own.
    #[serde(default = "default_command_flag")]
    pub command_flag: String,
}

fn default_executable() -> String {
    "jboss-cli.sh".to_string()
}

fn default_command_flag() -> String {
    "--command=".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig::new(default_executable())
    }
}

impl ConsoleConfig {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            command_flag: default_command_flag(),
        }
    }

    /// Build the argv that hands `command` to the console.
    pub fn command_args(&self, command: &str) -> Vec<OsString> {
        let flag = self.command_flag.as_str();
        if flag.is_empty() {
            vec![OsString::from(command)]
        } else if flag.ends_with('=') {
            vec![OsString::from(format!("{flag}{command}"))]
        } else {
            vec![OsString::from(flag), OsString::from(command)]
        }
    }
}

/// Render argv for display, quoting arguments that contain whitespace.
pub fn render_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| {
            let a = a.as_ref();
            if a.is_empty() || a.chars().any(char::is_whitespace) {
                format!("'{a}'")
            } else {
                a.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_args_glued_flag() {
        let cfg = ConsoleConfig::new("jboss-cli.sh");
        assert_eq!(
            cfg.command_args("module add --name=x"),
            vec![OsString::from("--command=module add --name=x")]
        );
    }

    #[test]
    fn command_args_separate_flag() {
        let cfg = ConsoleConfig {
            command_flag: "-c".into(),
            ..ConsoleConfig::new("wsadmin.sh")
        };
        assert_eq!(
            cfg.command_args("print 1"),
            vec![OsString::from("-c"), OsString::from("print 1")]
        );
    }

    #[test]
    fn command_args_without_flag() {
        let cfg = ConsoleConfig {
            command_flag: String::new(),
            ..ConsoleConfig::new("console")
        };
        assert_eq!(cfg.command_args("x y"), vec![OsString::from("x y")]);
    }

    #[test]
    fn render_args_quotes_whitespace() {
        assert_eq!(render_args(&["a", "b c", ""]), "a 'b c' ''");
    }

    #[test]
    fn invocation_debug_hides_stdin() {
        let inv = Invocation::new(Operation::AliasAdd, "db", vec![], "add db")
            .with_stdin(Zeroizing::new(b"hunter2".to_vec()));
        let dbg = format!("{inv:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn wipe_releases_every_argument() {
        let mut inv = Invocation::new(
            Operation::AliasAdd,
            "db",
            vec![OsString::from("--alias=db"), OsString::from("--password=hunter2")],
            "add db",
        );
        inv.wipe_args();
        assert!(inv.args().is_empty());
        assert_eq!(inv.display(), "add db");
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::ModuleAdd.to_string(), "module-add");
        assert_eq!(Operation::AliasAdd.as_str(), "alias-add");
    }
}
