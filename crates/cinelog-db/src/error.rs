// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Storage failure taxonomy.
///
/// `Connection` means "no data available" to callers: the operation aborts,
/// nothing retries. `Statement` is recoverable at the operation boundary.
/// `Duplicate` is the canonical already-exists signal, raised from the UNIQUE
/// constraints rather than any pre-check. `NotFound` is silent for navigation
/// paths.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("cannot open database at {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("statement failed: {0}")]
    Statement(#[source] rusqlite::Error),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("no matching row: {0}")]
    NotFound(String),

    #[error("unknown procedure {0:?}")]
    UnknownProcedure(String),

    #[error("invalid database path: {0}")]
    InvalidPath(String),
}

impl DbError {
    /// Classify an execution-time failure, promoting unique-constraint
    /// violations to `Duplicate`. Other constraint failures (NOT NULL,
    /// CHECK) stay `Statement` and surface as check-your-input conditions.
    pub(crate) fn from_execution(context: &str, source: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &source
            && (code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        {
            return Self::Duplicate(format!("{context}: {source}"));
        }
        Self::Statement(source)
    }
}

pub type DbResult<T> = Result<T, DbError>;
