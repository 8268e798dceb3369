// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cinelog_app::{QueryRows, Value, is_identifier_column};

/// Change notification a renderer drains after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    CellChanged { row: usize, col: usize },
    StructureReset,
}

/// In-memory authoritative state for one rendered table.
///
/// The rows handed in at construction double as the default snapshot, so an
/// unfiltered view can always be restored after structured filters replace
/// the visible data.
#[derive(Debug, Clone)]
pub struct TableModel {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    snapshot: QueryRows,
    events: Vec<TableEvent>,
}

impl TableModel {
    pub fn new(data: QueryRows) -> Self {
        let snapshot = data.clone();
        let (columns, rows) = data.into_parts();
        Self {
            columns,
            rows,
            snapshot,
            events: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(QueryRows::empty())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns eligible for rendering: identifier columns stay internal.
    pub fn display_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| !is_identifier_column(column))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)
    }

    pub fn value_by_name(&self, row: usize, column_name: &str) -> Option<&Value> {
        let col = self.column_index(column_name)?;
        self.cell_at(row, col)
    }

    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == column_name)
    }

    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// In-place cell mutation. Out-of-range coordinates are ignored rather
    /// than padded, so no partial rows can appear.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Value) {
        let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) else {
            return;
        };
        *cell = value;
        self.events.push(TableEvent::CellChanged { row, col });
    }

    pub fn set_cell_by_name(&mut self, row: usize, column_name: &str, value: Value) {
        let Some(col) = self.column_index(column_name) else {
            return;
        };
        self.set_cell(row, col, value);
    }

    /// Remove one row; later rows shift up by one index.
    pub fn remove_row(&mut self, row: usize) {
        if row >= self.rows.len() {
            return;
        }
        self.rows.remove(row);
        self.events.push(TableEvent::StructureReset);
    }

    /// Wholesale replacement: the column set is recomputed from the incoming
    /// header (empty input leaves an empty column set).
    pub fn reset(&mut self, data: QueryRows) {
        let (columns, rows) = data.into_parts();
        self.columns = columns;
        self.rows = rows;
        self.events.push(TableEvent::StructureReset);
    }

    /// Restore the unfiltered rows captured at construction.
    pub fn restore_default(&mut self) {
        self.reset(self.snapshot.clone());
    }

    /// Linear scan for a value in a named column; first match wins.
    pub fn find_row(&self, value: &Value, column_name: &str) -> Option<(usize, usize)> {
        let col = self.column_index(column_name)?;
        self.rows
            .iter()
            .position(|row| row.get(col) == Some(value))
            .map(|row| (row, col))
    }

    /// Drain pending change notifications in emission order.
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{TableEvent, TableModel};
    use cinelog_app::{QueryRows, Value};

    fn movie_rows() -> QueryRows {
        QueryRows::new(
            vec![
                "movie_id".to_owned(),
                "title".to_owned(),
                "release_year".to_owned(),
            ],
            vec![
                vec![Value::Integer(1), Value::from("Dark Knight"), Value::Integer(2008)],
                vec![Value::Integer(2), Value::from("Lightroom"), Value::Integer(2008)],
                vec![Value::Integer(3), Value::from("Silent Harbor"), Value::Integer(1995)],
            ],
        )
    }

    #[test]
    fn counts_match_underlying_rows() {
        let model = TableModel::new(movie_rows());
        assert_eq!(model.row_count(), 3);
        assert_eq!(model.column_count(), 3);
        assert_eq!(model.columns(), ["movie_id", "title", "release_year"]);
    }

    #[test]
    fn display_columns_hide_identifiers() {
        let model = TableModel::new(movie_rows());
        assert_eq!(model.display_columns(), ["title", "release_year"]);
    }

    #[test]
    fn set_cell_emits_exactly_one_cell_changed() {
        let mut model = TableModel::new(movie_rows());
        model.set_cell(1, 1, Value::from("Light Room"));

        assert_eq!(model.cell_at(1, 1), Some(&Value::from("Light Room")));
        assert_eq!(
            model.take_events(),
            vec![TableEvent::CellChanged { row: 1, col: 1 }]
        );
        assert!(model.take_events().is_empty());
    }

    #[test]
    fn set_cell_ignores_out_of_range_coordinates() {
        let mut model = TableModel::new(movie_rows());
        model.set_cell(9, 0, Value::Null);
        model.set_cell(0, 9, Value::Null);
        assert!(model.take_events().is_empty());
        assert_eq!(model.row_count(), 3);
    }

    #[test]
    fn remove_row_shifts_later_indices() {
        let mut model = TableModel::new(movie_rows());
        model.remove_row(1);

        assert_eq!(model.row_count(), 2);
        assert_eq!(model.value_by_name(1, "title"), Some(&Value::from("Silent Harbor")));
        assert_eq!(model.take_events(), vec![TableEvent::StructureReset]);
    }

    #[test]
    fn reset_recomputes_columns_from_new_header() {
        let mut model = TableModel::new(movie_rows());
        model.reset(QueryRows::new(
            vec!["genre_id".to_owned(), "name".to_owned()],
            vec![vec![Value::Integer(1), Value::from("Comedy")]],
        ));

        assert_eq!(model.columns(), ["genre_id", "name"]);
        assert_eq!(model.row_count(), 1);

        model.reset(QueryRows::empty());
        assert!(model.columns().is_empty());
        assert_eq!(model.row_count(), 0);
    }

    #[test]
    fn restore_default_returns_to_construction_rows() {
        let mut model = TableModel::new(movie_rows());
        model.reset(QueryRows::empty());
        model.restore_default();

        assert_eq!(model.row_count(), 3);
        assert_eq!(model.columns(), ["movie_id", "title", "release_year"]);
    }

    #[test]
    fn find_row_returns_first_match() {
        let model = TableModel::new(movie_rows());
        assert_eq!(model.find_row(&Value::Integer(2008), "release_year"), Some((0, 2)));
        assert_eq!(model.find_row(&Value::Integer(3), "movie_id"), Some((2, 0)));
        assert_eq!(model.find_row(&Value::Integer(99), "movie_id"), None);
        assert_eq!(model.find_row(&Value::Integer(1), "missing"), None);
    }
}
