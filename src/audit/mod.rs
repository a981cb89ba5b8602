//! Provisioning history: SQLite-based record of console invocations.
//!
//! Stores one row per console call (module registration, alias creation)
//! in a local SQLite database at `<audit_dir>/audit.db`. Only operation,
//! target and outcome are stored; secret material never reaches this module.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, provisioning continues without history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::console::{Console, Invocation};
use crate::errors::{ProvisionError, Result};

/// Outcome stored for a successful invocation.
pub const OUTCOME_OK: &str = "ok";

/// Outcome stored for a failed invocation.
pub const OUTCOME_FAILED: &str = "failed";

/// A single history entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub target: String,
    pub outcome: String,
    pub details: Option<String>,
}

/// SQLite-backed provisioning history.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the history database at `<dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened. Callers should
    /// treat this as "history unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the history database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                target      TEXT NOT NULL,
                outcome     TEXT NOT NULL,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Open the database, creating `dir` first if needed.
    pub fn open_or_create(dir: &Path) -> Option<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).ok()?;
        }
        Self::open(dir)
    }

    /// Record an invocation. Write errors are ignored.
    pub fn log(&self, operation: &str, target: &str, outcome: &str, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO history (timestamp, operation, target, outcome, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, target, outcome, details],
        );
    }

    /// Query recent entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, target, outcome, details
                 FROM history
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, target, outcome, details
                 FROM history
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ProvisionError::AuditError(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    target: row.get(3)?,
                    outcome: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| ProvisionError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| ProvisionError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the history database.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join("audit.db")
    }
}

/// Wraps a console and records the outcome of every invocation.
pub struct AuditedConsole<C> {
    inner: C,
    log: Option<AuditLog>,
}

impl<C: Console> AuditedConsole<C> {
    /// History is skipped silently when `log` is `None`.
    pub fn new(inner: C, log: Option<AuditLog>) -> Self {
        if log.is_none() {
            debug!("provisioning history unavailable, continuing without it");
        }
        Self { inner, log }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Console> Console for AuditedConsole<C> {
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        let result = self.inner.execute(invocation);

        if let Some(log) = &self.log {
            let op = invocation.operation().as_str();
            match &result {
                Ok(()) => log.log(op, invocation.target(), OUTCOME_OK, None),
                Err(e) => log.log(
                    op,
                    invocation.target(),
                    OUTCOME_FAILED,
                    Some(&e.to_string()),
                ),
            }
        }

        result
    }
}
