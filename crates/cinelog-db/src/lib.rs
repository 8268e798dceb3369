// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use cinelog_app::{ColumnValueKind, QueryRows, TableColumn, TableKind, Value, is_identifier_column};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub mod error;
pub mod loader;
pub mod procedures;
mod watchlist;

pub use error::{DbError, DbResult};

pub const APP_NAME: &str = "cinelog";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "movie",
        &[
            "movie_id",
            "title",
            "release_year",
            "runtime_minutes",
            "director_id",
        ],
    ),
    ("actor", &["actor_id", "name", "birth_year", "nationality"]),
    (
        "director",
        &["director_id", "name", "birth_year", "nationality"],
    ),
    (
        "production_company",
        &["company_id", "name", "founded_year", "headquarters"],
    ),
    ("genre", &["genre_id", "name"]),
    ("awards", &["award_id", "name", "category"]),
    ("country", &["country_id", "name"]),
    ("language", &["language_id", "name"]),
    ("movie_genre", &["movie_id", "genre_id"]),
    ("movie_cast", &["movie_id", "actor_id", "role"]),
    ("movie_awards", &["movie_id", "award_id", "year_won"]),
    ("movie_company", &["movie_id", "company_id"]),
    ("movie_country", &["movie_id", "country_id"]),
    ("movie_audio", &["movie_id", "language_id"]),
    ("movie_subtitle", &["movie_id", "language_id"]),
    (
        "watchlists",
        &[
            "watchlist_id",
            "name",
            "description",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "watchlist_entries",
        &[
            "watchlist_id",
            "movie_id",
            "rating",
            "comment",
            "created_at",
            "updated_at",
        ],
    ),
];

/// Normalized result of one executor call.
///
/// A result with exactly one column flattens to `Values`; two or more
/// columns keep their shape as `Rows`. An empty result takes the shape the
/// caller declared up front: `Values` when tuples were requested, `Rows`
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Values(Vec<Value>),
    Rows(QueryRows),
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Option<&[Value]> {
        match self {
            Self::Values(values) => Some(values),
            Self::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> Option<&QueryRows> {
        match self {
            Self::Values(_) => None,
            Self::Rows(rows) => Some(rows),
        }
    }

    pub fn into_rows(self) -> Option<QueryRows> {
        match self {
            Self::Values(_) => None,
            Self::Rows(rows) => Some(rows),
        }
    }
}

/// Statement runner with one connection per call.
///
/// The database location is injected once at construction; nothing in the
/// process holds a long-lived handle, so consecutive calls are strictly
/// ordered and there is no cross-call state to lock.
#[derive(Debug, Clone)]
pub struct Executor {
    db_path: PathBuf,
}

impl Executor {
    pub fn new(path: &Path) -> DbResult<Self> {
        validate_db_path(&path.to_string_lossy())?;
        Ok(Self {
            db_path: path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run one statement with bound positional parameters.
    ///
    /// Mutating statements (first keyword INSERT/UPDATE/DELETE,
    /// case-insensitive) are committed before the connection closes;
    /// everything else runs read-only. The connection is released on every
    /// exit path. `want_tuples` only matters for empty results: it picks the
    /// flat-sequence empty shape over the row-mapping one.
    pub fn execute(
        &self,
        statement: &str,
        params: &[Value],
        want_tuples: bool,
    ) -> DbResult<QueryOutput> {
        let conn = self.connect()?;
        run_statement(&conn, statement, params, want_tuples)
    }

    /// Invoke a registered procedure by name under the same normalization
    /// rule as `execute`. Nothing is committed beyond what the registered
    /// statement itself does.
    pub fn call_procedure(&self, name: &str, params: &[Value]) -> DbResult<QueryOutput> {
        let procedure = procedures::lookup(name)
            .ok_or_else(|| DbError::UnknownProcedure(name.to_owned()))?;
        tracing::debug!(procedure = name, params = params.len(), "call procedure");
        let conn = self.connect()?;
        run_statement(&conn, procedure.sql, params, false)
    }

    /// Mutation path that reports the inserted rowid. Used by the typed
    /// watchlist operations; the generic `execute` contract has no channel
    /// for it.
    pub(crate) fn insert_returning_id(&self, statement: &str, params: &[Value]) -> DbResult<i64> {
        let conn = self.connect()?;
        conn.execute(statement, rusqlite::params_from_iter(params.iter().map(to_sql_value)))
            .map_err(|source| DbError::from_execution("insert", source))?;
        Ok(conn.last_insert_rowid())
    }

    /// Mutation path that reports how many rows changed.
    pub(crate) fn run_mutation(&self, statement: &str, params: &[Value]) -> DbResult<usize> {
        let conn = self.connect()?;
        conn.execute(statement, rusqlite::params_from_iter(params.iter().map(to_sql_value)))
            .map_err(|source| DbError::from_execution("mutation", source))
    }

    /// Create the schema on an empty database; verify it on a populated one.
    pub fn bootstrap(&self) -> Result<()> {
        let conn = self
            .connect()
            .context("open database for bootstrap")?;
        if has_user_tables(&conn)? {
            validate_schema(&conn)?;
        } else {
            conn.execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        let conn = self.connect().context("open database")?;
        let mut stmt = conn
            .prepare(
                "
                SELECT name
                FROM sqlite_master
                WHERE type = 'table'
                  AND name NOT LIKE 'sqlite_%'
                ORDER BY name ASC
                ",
            )
            .context("prepare table names query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query table names")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect table names")
    }

    /// Columns of a browsable table that are eligible for the structured
    /// filter: declaration order, identifier columns excluded, each tagged
    /// with its parse kind.
    pub fn filter_columns(&self, kind: TableKind) -> Result<Vec<TableColumn>> {
        let columns = self.table_columns(kind.table())?;
        Ok(columns
            .into_iter()
            .filter(|column| !is_identifier_column(&column.name))
            .collect())
    }

    pub fn table_columns(&self, table: &str) -> Result<Vec<TableColumn>> {
        if !is_safe_identifier(table) {
            bail!("invalid table name: {table:?}");
        }

        let conn = self.connect().context("open database")?;
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .with_context(|| format!("inspect columns for {table}"))?;
        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let declared: String = row.get(2)?;
                Ok(TableColumn {
                    name,
                    kind: column_kind_from_declared(&declared),
                })
            })
            .with_context(|| format!("query column info for {table}"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("collect columns for {table}"))
    }

    fn connect(&self) -> DbResult<Connection> {
        let conn = Connection::open(&self.db_path).map_err(|source| DbError::Connection {
            path: self.db_path.display().to_string(),
            source,
        })?;
        configure_connection(&conn).map_err(|source| DbError::Connection {
            path: self.db_path.display().to_string(),
            source,
        })?;
        Ok(conn)
    }
}

fn run_statement(
    conn: &Connection,
    statement: &str,
    params: &[Value],
    want_tuples: bool,
) -> DbResult<QueryOutput> {
    let trimmed = statement.trim();
    if statement_mutates(trimmed) {
        conn.execute(trimmed, rusqlite::params_from_iter(params.iter().map(to_sql_value)))
            .map_err(|source| DbError::from_execution("execute statement", source))?;
        return Ok(empty_output(want_tuples));
    }

    let mut stmt = conn.prepare(trimmed).map_err(DbError::Statement)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|column| (*column).to_owned())
        .collect();
    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter().map(to_sql_value)))
        .map_err(DbError::Statement)?;

    let mut collected: Vec<Vec<Value>> = Vec::new();
    while let Some(row) = rows.next().map_err(DbError::Statement)? {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            let value = row.get_ref(index).map_err(DbError::Statement)?;
            values.push(value_from_ref(value));
        }
        collected.push(values);
    }

    Ok(normalize_output(columns, collected, want_tuples))
}

fn normalize_output(columns: Vec<String>, rows: Vec<Vec<Value>>, want_tuples: bool) -> QueryOutput {
    if rows.is_empty() {
        return empty_output(want_tuples);
    }
    if columns.len() == 1 {
        let values = rows
            .into_iter()
            .filter_map(|mut row| row.pop())
            .collect::<Vec<_>>();
        return QueryOutput::Values(values);
    }
    QueryOutput::Rows(QueryRows::new(columns, rows))
}

fn empty_output(want_tuples: bool) -> QueryOutput {
    if want_tuples {
        QueryOutput::Values(Vec::new())
    } else {
        QueryOutput::Rows(QueryRows::empty())
    }
}

/// First-keyword check deciding the commit-before-close rule.
fn statement_mutates(statement: &str) -> bool {
    let Some(first) = statement.split_whitespace().next() else {
        return false;
    };
    first.eq_ignore_ascii_case("INSERT")
        || first.eq_ignore_ascii_case("UPDATE")
        || first.eq_ignore_ascii_case("DELETE")
}

pub fn validate_db_path(path: &str) -> DbResult<()> {
    if path.is_empty() {
        return Err(DbError::InvalidPath("path must not be empty".to_owned()));
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            return Err(DbError::InvalidPath(format!(
                "{path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            )));
        }
    }

    if path.starts_with("file:") {
        return Err(DbError::InvalidPath(format!(
            "{path:?} uses file: URI syntax; pass a plain filesystem path"
        )));
    }

    if path.contains('?') {
        return Err(DbError::InvalidPath(format!(
            "{path:?} contains '?'; remove query parameters and use a plain file path"
        )));
    }

    Ok(())
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(value) => rusqlite::types::Value::Integer(*value),
        Value::Real(value) => rusqlite::types::Value::Real(*value),
        Value::Text(value) => rusqlite::types::Value::Text(value.clone()),
    }
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::Integer(value),
        ValueRef::Real(value) => Value::Real(value),
        ValueRef::Text(value) => Value::Text(String::from_utf8_lossy(value).into_owned()),
        ValueRef::Blob(value) => Value::Text(String::from_utf8_lossy(value).into_owned()),
    }
}

fn column_kind_from_declared(declared: &str) -> ColumnValueKind {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("INT") {
        ColumnValueKind::Integer
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        ColumnValueKind::Real
    } else {
        ColumnValueKind::Text
    }
}

pub(crate) fn is_safe_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .with_context(|| format!("inspect columns for {table}"))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .with_context(|| format!("query column info for {table}"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("collect columns for {table}"))?;

        if columns.is_empty() {
            bail!(
                "database is missing required table `{table}`; point [storage].db_path at a cinelog database or remove the file to re-create it"
            );
        }

        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.iter().any(|have| have == column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; re-create the database before launching",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

pub(crate) fn now_rfc3339() -> DbResult<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|error| DbError::Statement(rusqlite::Error::ToSqlConversionFailure(Box::new(error))))
}
