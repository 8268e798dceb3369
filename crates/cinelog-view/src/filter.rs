// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use cinelog_app::{QueryRows, TableColumn, TableKind, Value, is_identifier_column};
use std::collections::BTreeSet;

use crate::model::TableModel;

/// Storage side of the structured filter: one registered filter statement
/// per browsable table, positional parameters in column order.
pub trait FilterBackend {
    fn filter_table(&mut self, table: TableKind, params: &[Value]) -> Result<QueryRows>;
}

/// One structured-filter submission. Ordered per eligible column; `None`
/// means no constraint on that column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    entries: Vec<(String, Option<Value>)>,
}

impl FilterCriteria {
    pub fn new(entries: Vec<(String, Option<Value>)>) -> Self {
        Self { entries }
    }

    /// Parse raw dialog text, one field per eligible column in order. Blank
    /// fields are unconstrained; malformed values (wrong type for the
    /// column) fail with a message fit for a check-your-input dialog.
    pub fn from_raw_inputs(columns: &[TableColumn], raw: &[String]) -> Result<Self> {
        if columns.len() != raw.len() {
            bail!(
                "filter dialog returned {} fields for {} columns",
                raw.len(),
                columns.len()
            );
        }

        let mut entries = Vec::with_capacity(columns.len());
        for (column, input) in columns.iter().zip(raw) {
            match column.kind.parse_value(input) {
                Ok(value) => entries.push((column.name.clone(), value)),
                Err(message) => bail!("column {}: {message} -- fix the value and retry", column.name),
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, Option<Value>)] {
        &self.entries
    }

    /// Positional parameters for the filter procedure; unconstrained columns
    /// bind as null.
    pub fn params(&self) -> Vec<Value> {
        self.entries
            .iter()
            .map(|(_, value)| value.clone().unwrap_or(Value::Null))
            .collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Model rows replaced by the filtered result set.
    Applied,
    /// All-blank submission: the default snapshot is back.
    Cleared,
    /// Recoverable check-your-input condition; the model is untouched.
    InvalidInput(String),
}

/// Read-through narrowing over one [`TableModel`].
///
/// The structured filter swaps the underlying data set; the free-text search
/// narrows what is rendered from it. The two compose, and either is
/// reversible on its own.
#[derive(Debug, Clone)]
pub struct FilterView {
    model: TableModel,
    search: String,
    hidden: BTreeSet<String>,
    pub selected: Option<usize>,
}

impl FilterView {
    pub fn new(model: TableModel) -> Self {
        Self {
            model,
            search: String::new(),
            hidden: BTreeSet::new(),
            selected: None,
        }
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut TableModel {
        &mut self.model
    }

    /// Live free-text search, re-applied on every keystroke. View-level
    /// only: no query is issued and the model keeps every row.
    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Source-row indices currently visible: a row stays when any column's
    /// rendered value contains the needle, case-insensitively.
    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.model.row_count())
            .filter(|row| self.is_row_visible(*row))
            .collect()
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        if self.search.is_empty() {
            return row < self.model.row_count();
        }
        let Some(values) = self.model.row(row) else {
            return false;
        };
        values.iter().any(|value| value.contains_ci(&self.search))
    }

    /// Send a structured filter to storage and swap the model rows for the
    /// result. An all-blank submission restores the default snapshot
    /// instead of querying.
    pub fn apply_structured(
        &mut self,
        backend: &mut dyn FilterBackend,
        table: TableKind,
        criteria: &FilterCriteria,
    ) -> FilterOutcome {
        if criteria.is_unconstrained() {
            self.model.restore_default();
            return FilterOutcome::Cleared;
        }

        match backend.filter_table(table, &criteria.params()) {
            Ok(rows) => {
                self.model.reset(rows);
                FilterOutcome::Applied
            }
            Err(error) => FilterOutcome::InvalidInput(format!(
                "check your filter input and try again: {error:#}"
            )),
        }
    }

    pub fn reset_to_default(&mut self) {
        self.model.restore_default();
    }

    /// Toggle a column's visibility flag. Identifier columns are always
    /// hidden and not toggleable; the return value reports whether the
    /// toggle applied.
    pub fn toggle_column(&mut self, name: &str) -> bool {
        if is_identifier_column(name) {
            return false;
        }
        if !self.hidden.remove(name) {
            self.hidden.insert(name.to_owned());
        }
        true
    }

    pub fn is_column_hidden(&self, name: &str) -> bool {
        is_identifier_column(name) || self.hidden.contains(name)
    }

    pub fn hidden_columns(&self) -> Vec<&str> {
        self.model
            .columns()
            .iter()
            .map(String::as_str)
            .filter(|column| self.is_column_hidden(column))
            .collect()
    }
}
