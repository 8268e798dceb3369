// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! First-run bulk import: one CSV per table, loaded in dependency order so
//! parent rows exist before the junction rows that reference them.

use anyhow::{Context, Result, bail};
use cinelog_app::Value;
use std::path::Path;

use crate::{Executor, is_safe_identifier};

/// Parent tables first, junction tables after.
pub const IMPORT_ORDER: &[&str] = &[
    "actor",
    "production_company",
    "awards",
    "genre",
    "country",
    "director",
    "language",
    "movie",
    "movie_genre",
    "movie_awards",
    "movie_audio",
    "movie_cast",
    "movie_company",
    "movie_country",
    "movie_subtitle",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub files: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Import every `<table>.csv` present under `dir`.
///
/// A missing file is fine (the table just stays empty). A row that fails to
/// insert is logged and skipped; the rest of the file continues.
pub fn import_dir(executor: &Executor, dir: &Path) -> Result<ImportReport> {
    if !dir.is_dir() {
        bail!(
            "import directory {} does not exist -- set [storage].data_dir to the CSV directory",
            dir.display()
        );
    }

    let mut report = ImportReport::default();
    for table in IMPORT_ORDER {
        let file = dir.join(format!("{table}.csv"));
        if !file.exists() {
            tracing::debug!(table, "no CSV for table, skipping");
            continue;
        }
        report.files += 1;
        let (inserted, skipped) = import_file(executor, table, &file)
            .with_context(|| format!("import {}", file.display()))?;
        report.inserted += inserted;
        report.skipped += skipped;
        tracing::info!(table, inserted, skipped, "imported table");
    }
    Ok(report)
}

fn import_file(executor: &Executor, table: &str, file: &Path) -> Result<(usize, usize)> {
    let mut reader = csv::Reader::from_path(file)
        .with_context(|| format!("open CSV {}", file.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read CSV header {}", file.display()))?
        .clone();

    if !is_safe_identifier(table) {
        bail!("invalid table name {table:?}");
    }
    for column in headers.iter() {
        if !is_safe_identifier(column) {
            bail!("invalid column name {column:?} in {}", file.display());
        }
    }

    let placeholders = (1..=headers.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    let statement = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        headers.iter().collect::<Vec<_>>().join(", "),
    );

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(table, row = index + 1, %error, "unreadable CSV row skipped");
                skipped += 1;
                continue;
            }
        };

        let params: Vec<Value> = record.iter().map(parse_field).collect();
        match executor.execute(&statement, &params, false) {
            Ok(_) => inserted += 1,
            Err(error) => {
                tracing::warn!(table, row = index + 1, %error, "row insert failed, skipped");
                skipped += 1;
            }
        }
    }
    Ok((inserted, skipped))
}

/// CSV fields are untyped text: empty means null, numerics bind as numbers,
/// everything else stays text.
fn parse_field(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(value) = field.parse::<i64>() {
        return Value::Integer(value);
    }
    if let Ok(value) = field.parse::<f64>() {
        return Value::Real(value);
    }
    Value::Text(field.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{IMPORT_ORDER, parse_field};
    use cinelog_app::Value;

    #[test]
    fn parents_precede_junction_tables() {
        let movie = IMPORT_ORDER.iter().position(|t| *t == "movie").unwrap();
        let genre = IMPORT_ORDER.iter().position(|t| *t == "genre").unwrap();
        let movie_genre = IMPORT_ORDER
            .iter()
            .position(|t| *t == "movie_genre")
            .unwrap();
        assert!(movie < movie_genre);
        assert!(genre < movie_genre);
    }

    #[test]
    fn fields_parse_to_typed_values() {
        assert_eq!(parse_field(""), Value::Null);
        assert_eq!(parse_field("1995"), Value::Integer(1995));
        assert_eq!(parse_field("7.5"), Value::Real(7.5));
        assert_eq!(parse_field("Dark Knight"), Value::Text("Dark Knight".to_owned()));
    }
}
