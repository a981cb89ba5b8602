//! Round-trip tests against a stub console.
//!
//! The stub is a shell script run as `sh <script>`; it writes each argument
//! it receives on its own line so the test can read back exactly what the
//! console would have parsed.

#![cfg(unix)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use provisio::console::{Console, ConsoleConfig, ProcessConsole};
use provisio::errors::ProvisionError;
use provisio::registrar::{Registrar, RegistrarConfig};
use provisio::secrets::{create_aliases, load_secrets, AliasTemplate, PasswordInput};
use tempfile::TempDir;

struct Stub {
    _dir: TempDir,
    script: PathBuf,
    argv_log: PathBuf,
    stdin_log: PathBuf,
}

impl Stub {
    /// `body` runs after the argv has been recorded.
    fn new(body: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("console.sh");
        let argv_log = dir.path().join("argv.log");
        let stdin_log = dir.path().join("stdin.log");

        fs::write(
            &script,
            format!(
                "for a in \"$@\"; do printf '%s\\n' \"$a\" >> '{}'; done\n{body}\n",
                argv_log.display()
            ),
        )
        .unwrap();

        Self {
            _dir: dir,
            script,
            argv_log,
            stdin_log,
        }
    }

    fn config(&self) -> ConsoleConfig {
        ConsoleConfig {
            args: vec![self.script.to_str().unwrap().to_string()],
            ..ConsoleConfig::new("sh")
        }
    }

    fn argv(&self) -> Vec<String> {
        fs::read_to_string(&self.argv_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"PK").unwrap();
}

#[test]
fn module_add_round_trips_the_resource_list() {
    let stub = Stub::new("exit 0");
    let lib = TempDir::new().unwrap();
    for name in ["c.jar", "a.jar", "b.jar"] {
        touch(lib.path(), name);
    }

    let registrar = Registrar::new(RegistrarConfig {
        library_dir: lib.path().to_path_buf(),
        module_name: "org.example.integration".into(),
        delimiter: ':',
        explicit_delimiter: true,
    })
    .unwrap();

    let config = stub.config();
    let mut console = ProcessConsole::new(&config).unwrap();
    registrar.register(&mut console, &config).unwrap();

    let argv = stub.argv();
    assert_eq!(argv.len(), 1);
    let command = argv[0].strip_prefix("--command=").unwrap();

    // Parse the way the console does: whitespace-separated `--key=value`.
    let mut name = None;
    let mut resources = None;
    let mut delimiter = None;
    for token in command.split_whitespace().skip(2) {
        if let Some(v) = token.strip_prefix("--name=") {
            name = Some(v.to_string());
        } else if let Some(v) = token.strip_prefix("--resources=") {
            resources = Some(v.to_string());
        } else if let Some(v) = token.strip_prefix("--resource-delimiter=") {
            delimiter = Some(v.to_string());
        }
    }

    assert!(command.starts_with("module add "));
    assert_eq!(name.as_deref(), Some("org.example.integration"));
    assert_eq!(delimiter.as_deref(), Some(":"));

    let registered: BTreeSet<PathBuf> = resources
        .unwrap()
        .split(':')
        .map(PathBuf::from)
        .collect();
    let expected: BTreeSet<PathBuf> = ["a.jar", "b.jar", "c.jar"]
        .iter()
        .map(|f| lib.path().join(f))
        .collect();
    assert_eq!(registered, expected);
}

#[test]
fn alias_arguments_arrive_unaltered() {
    let stub = Stub::new("exit 0");
    let root = TempDir::new().unwrap();
    let entry = root.path().join("ds-main");
    fs::create_dir(&entry).unwrap();
    fs::write(entry.join("username"), b"admin").unwrap();
    fs::write(entry.join("password"), b"a b;$(echo pwned)`x`").unwrap();

    let template = AliasTemplate::new(
        vec![
            "--alias={alias}".into(),
            "--username={username}".into(),
            "--password={password}".into(),
        ],
        PasswordInput::Argument,
    )
    .unwrap();

    let records = load_secrets(root.path()).unwrap();
    let mut console = ProcessConsole::new(&stub.config()).unwrap();
    create_aliases(&records, &template, &mut console).unwrap();

    assert_eq!(
        stub.argv(),
        vec![
            "--alias=ds-main",
            "--username=admin",
            "--password=a b;$(echo pwned)`x`",
        ]
    );
}

#[test]
fn stdin_mode_pipes_the_password() {
    let stub = Stub::new("");
    let script = format!(
        "{}cat > '{}'\n",
        fs::read_to_string(&stub.script).unwrap(),
        stub.stdin_log.display()
    );
    fs::write(&stub.script, script).unwrap();

    let root = TempDir::new().unwrap();
    let entry = root.path().join("mq");
    fs::create_dir(&entry).unwrap();
    fs::write(entry.join("password"), b"hunter2").unwrap();

    let template =
        AliasTemplate::new(vec!["--alias={alias}".into()], PasswordInput::Stdin).unwrap();
    let records = load_secrets(root.path()).unwrap();
    let mut console = ProcessConsole::new(&stub.config()).unwrap();
    create_aliases(&records, &template, &mut console).unwrap();

    assert_eq!(stub.argv(), vec!["--alias=mq"]);
    assert_eq!(fs::read(&stub.stdin_log).unwrap(), b"hunter2");
}

#[test]
fn non_zero_exit_carries_the_code() {
    let stub = Stub::new("exit 7");
    let lib = TempDir::new().unwrap();
    touch(lib.path(), "a.jar");

    let registrar = Registrar::new(RegistrarConfig {
        library_dir: lib.path().to_path_buf(),
        module_name: "m".into(),
        delimiter: ':',
        explicit_delimiter: false,
    })
    .unwrap();

    let config = stub.config();
    let mut console = ProcessConsole::new(&config).unwrap();
    let err = registrar.register(&mut console, &config).unwrap_err();

    match err {
        ProvisionError::ConsoleFailed { code, operation } => {
            assert_eq!(code, 7);
            assert!(operation.contains("module-add"));
        }
        other => panic!("expected ConsoleFailed, got {other:?}"),
    }
}

#[test]
fn unknown_console_is_reported() {
    let result = ProcessConsole::new(&ConsoleConfig::new("provisio-no-such-console"));
    assert!(matches!(result, Err(ProvisionError::ConsoleNotFound(_))));
}

#[test]
fn boxed_console_forwards() {
    let stub = Stub::new("exit 0");
    let lib = TempDir::new().unwrap();
    touch(lib.path(), "a.jar");

    let registrar = Registrar::new(RegistrarConfig {
        library_dir: lib.path().to_path_buf(),
        module_name: "m".into(),
        delimiter: ':',
        explicit_delimiter: false,
    })
    .unwrap();

    let config = stub.config();
    let mut console: Box<dyn Console> = Box::new(ProcessConsole::new(&config).unwrap());
    registrar.register(console.as_mut(), &config).unwrap();
    assert_eq!(stub.argv().len(), 1);
}
