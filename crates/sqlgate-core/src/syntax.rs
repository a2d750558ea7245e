//! Syntax check: delegate parsing to the database engine itself
//!
//! Rather than reimplementing a SQL grammar, the candidate is handed to
//! DuckDB's own parser in a non-executing mode, so acceptance matches
//! exactly what the engine will accept. `json_serialize_sql` parses the
//! statement without binding table names or executing anything; binder
//! work is left to the semantic layer. It also only serializes SELECT
//! statements, so non-read-only forms already fail here.
//!
//! The round trip runs on a worker thread with a bounded timeout. Each
//! call opens its own connection, which the worker releases whenever it
//! finishes, including after the caller has already timed out.

use duckdb::Connection;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::CheckError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Parse check backed by a live DuckDB database file.
#[derive(Debug, Clone)]
pub struct SyntaxChecker {
    db_path: PathBuf,
    timeout: Duration,
}

impl SyntaxChecker {
    pub fn new<P: Into<PathBuf>>(db_path: P) -> Self {
        Self {
            db_path: db_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the engine to parse `query` without executing it.
    ///
    /// Returns `Ok(None)` when the engine accepts the statement and
    /// `Ok(Some(message))` with the engine's own error text when it does
    /// not. A round trip exceeding the timeout is `Err(CheckError::Timeout)`.
    pub fn check(&self, query: &str) -> Result<Option<String>, CheckError> {
        let (tx, rx) = mpsc::channel();
        let db_path = self.db_path.clone();
        let query = query.to_string();

        thread::spawn(move || {
            let _ = tx.send(parse_on_engine(&db_path, &query));
        });

        recv_verdict(&rx, self.timeout)
    }
}

/// Wait for the worker's verdict. A worker that dies without sending
/// (e.g. a panic inside the engine) is an internal fault, not a timeout.
fn recv_verdict(
    rx: &mpsc::Receiver<Result<Option<String>, CheckError>>,
    timeout: Duration,
) -> Result<Option<String>, CheckError> {
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(CheckError::Timeout),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(CheckError::Internal(
            "syntax worker exited without a result".to_string(),
        )),
    }
}

fn parse_on_engine(db_path: &Path, query: &str) -> Result<Option<String>, CheckError> {
    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare("SELECT json_serialize_sql(?::VARCHAR)")?;
    let payload: String = stmt.query_row([query], |row| row.get(0))?;

    let document: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| CheckError::Internal(format!("unreadable serializer output: {e}")))?;

    if document
        .get("error")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
    {
        let message = document
            .get("error_message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown parse error");
        return Ok(Some(message.to_string()));
    }
    Ok(None)
}
