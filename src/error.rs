//! Errors for the wallet data layer.
//!
//! Contains error variants for:
//! - Record store failures (invalid keys, constraint violations)
//! - Query construction errors (unknown field paths)
//! - Bridge failures (worker errors, closed worker, timeouts)
//!
//! Errors raised inside the worker cross the message boundary as plain
//! strings and come back to the caller as [`Error::Worker`].

use thiserror::Error;

/// Failures reported by a [`RecordStore`](crate::stores::RecordStore).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("invalid key in table {table}")]
    InvalidKey { table: &'static str },
    #[error("key already exists in table {table}: {key}")]
    Constraint { table: &'static str, key: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unknown payment field: {0}")]
    UnknownField(String),
    #[error("cannot summarise payment {id}: {reason}")]
    Summary { id: String, reason: &'static str },
    /// Error message returned by the worker for a request.
    #[error("{0}")]
    Worker(String),
    #[error("worker is not running")]
    WorkerClosed,
    #[error("request timed out")]
    Timeout,
    #[error("unexpected reply for {0}")]
    UnexpectedReply(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
