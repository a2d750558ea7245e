//! Error types for schema loading and check execution

use thiserror::Error;

/// Fatal at startup: the validator cannot be constructed without a
/// reachable, parseable schema.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("failed to read schema definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse schema definition: {0}")]
    Definition(#[from] serde_json::Error),

    #[error("schema contains no tables")]
    Empty,
}

/// A checker failed to execute (as opposed to a query failing a check).
///
/// Never propagates past the orchestrator: every variant is converted to
/// a failing [`CheckResult`](crate::outcome::CheckResult) so one
/// misbehaving checker cannot abort the pipeline.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("failed to lex query: {0}")]
    Lex(String),

    #[error("malformed literal: {0}")]
    BadLiteral(String),

    #[error("syntax check timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}
