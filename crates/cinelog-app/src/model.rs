// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::{MovieId, WatchlistId};

/// Scalar cell value as it travels between storage, models, and views.
///
/// Dates stay in their storage form (`[year]-[month]-[day]` text); nothing in
/// the browsing layer does date arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Rendering form: nulls display as the empty string.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(value) => value.to_string(),
            Self::Real(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }

    /// Case-insensitive substring test against the rendered form.
    pub fn contains_ci(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.display().to_lowercase().contains(needle_lower)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Columns whose name carries an `_id` suffix or infix are join keys: kept in
/// the model for lookups, never rendered and never filterable.
pub fn is_identifier_column(name: &str) -> bool {
    name.contains("_id")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Movie,
    Actor,
    Director,
    ProductionCompany,
    Genre,
    Awards,
}

impl TableKind {
    pub const ALL: [Self; 6] = [
        Self::Movie,
        Self::Actor,
        Self::Director,
        Self::ProductionCompany,
        Self::Genre,
        Self::Awards,
    ];

    pub const fn table(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Actor => "actor",
            Self::Director => "director",
            Self::ProductionCompany => "production_company",
            Self::Genre => "genre",
            Self::Awards => "awards",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Self::Movie),
            "actor" => Some(Self::Actor),
            "director" => Some(Self::Director),
            "production_company" => Some(Self::ProductionCompany),
            "genre" => Some(Self::Genre),
            "awards" => Some(Self::Awards),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Actor => "Actors",
            Self::Director => "Directors",
            Self::ProductionCompany => "Companies",
            Self::Genre => "Genres",
            Self::Awards => "Awards",
        }
    }
}

/// Declared value kind of a table column, used to parse raw filter text into
/// a comparable `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnValueKind {
    Integer,
    Real,
    Text,
}

impl ColumnValueKind {
    /// Parse raw dialog text. Blank input means unconstrained; malformed
    /// numeric input is `Err` so the caller can surface a check-your-input
    /// message.
    pub fn parse_value(self, raw: &str) -> Result<Option<Value>, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match self {
            Self::Integer => trimmed
                .parse::<i64>()
                .map(|value| Some(Value::Integer(value)))
                .map_err(|_| format!("expected a whole number, got {trimmed:?}")),
            Self::Real => trimmed
                .parse::<f64>()
                .map(|value| Some(Value::Real(value)))
                .map_err(|_| format!("expected a number, got {trimmed:?}")),
            Self::Text => Ok(Some(Value::Text(trimmed.to_owned()))),
        }
    }
}

/// One column of a browsable table as the filter dialog sees it: the name
/// plus the kind raw input should parse to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub kind: ColumnValueKind,
}

/// Typed dialog-input variant. Each prompt field is one of these, so callers
/// extract values by kind instead of branching on a widget type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    Integer(i64),
    Text(String),
    Multiline(String),
}

impl InputValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Integer(_) => None,
            Self::Text(value) | Self::Multiline(value) => Some(value),
        }
    }
}

/// One row of a watchlist as the curation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub watchlist_id: WatchlistId,
    pub movie_id: MovieId,
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub id: WatchlistId,
    pub name: String,
    pub description: String,
}

/// Materialized multi-column query result: ordered column names plus rows of
/// values aligned to them. Immutable once built; mutation happens in the
/// table model that wraps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl QueryRows {
    /// Rows narrower or wider than the header are dropped rather than
    /// shipped as partial rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows.into_iter().filter(|row| row.len() == width).collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn get(&self, row: usize, column_name: &str) -> Option<&Value> {
        let col = self.column_index(column_name)?;
        self.rows.get(row)?.get(col)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
