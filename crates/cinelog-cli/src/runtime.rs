// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cinelog_app::{
    MovieId, QueryRows, TableKind, Value, Watchlist, WatchlistEntry, WatchlistId,
};
use cinelog_db::{DbError, Executor, procedures};
use cinelog_view::{
    CreateOutcome, EntryStore, FilterBackend, FilterView, InsertOutcome, TabPane, TabSet,
    TableModel,
};

/// Bridges the view crate's storage seam onto the query executor.
pub struct DbRuntime<'a> {
    executor: &'a Executor,
}

impl<'a> DbRuntime<'a> {
    pub fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// Build the catalog tab strip from full-table loads.
    pub fn load_tabs(&self) -> Result<TabSet> {
        let mut tabs = Vec::new();
        for kind in TableKind::ALL {
            let output = self
                .executor
                .execute(&format!("SELECT * FROM {}", kind.table()), &[], false)
                .with_context(|| format!("load {} tab", kind.table()))?;
            let rows = output.into_rows().unwrap_or_else(QueryRows::empty);
            tabs.push(TabPane {
                kind,
                view: FilterView::new(TableModel::new(rows)),
            });
        }
        Ok(TabSet::new(tabs))
    }
}

impl FilterBackend for DbRuntime<'_> {
    fn filter_table(&mut self, table: TableKind, params: &[Value]) -> Result<QueryRows> {
        let name = procedures::filter_procedure_name(table);
        let output = self
            .executor
            .call_procedure(&name, params)
            .with_context(|| format!("filter {}", table.table()))?;
        Ok(output.into_rows().unwrap_or_else(QueryRows::empty))
    }
}

impl EntryStore for DbRuntime<'_> {
    fn list_watchlists(&mut self) -> Result<Vec<Watchlist>> {
        Ok(self.executor.list_watchlists()?)
    }

    fn watchlist_entries(&mut self, watchlist: WatchlistId) -> Result<QueryRows> {
        Ok(self.executor.watchlist_entries(watchlist)?)
    }

    fn insert_entry(&mut self, entry: &WatchlistEntry) -> Result<InsertOutcome> {
        match self.executor.insert_entry(entry) {
            Ok(()) => Ok(InsertOutcome::Inserted),
            // The UNIQUE pair constraint is the authoritative guard; its
            // violation is the already-exists signal, not a failure.
            Err(DbError::Duplicate(_)) => Ok(InsertOutcome::DuplicatePair),
            Err(error) => Err(error.into()),
        }
    }

    fn update_entry(&mut self, entry: &WatchlistEntry) -> Result<()> {
        Ok(self.executor.update_entry(entry)?)
    }

    fn delete_entry(&mut self, watchlist: WatchlistId, movie: MovieId) -> Result<()> {
        Ok(self.executor.delete_entry(watchlist, movie)?)
    }

    fn create_watchlist(&mut self, name: &str, description: &str) -> Result<CreateOutcome> {
        match self.executor.create_watchlist(name, description) {
            Ok(id) => Ok(CreateOutcome::Created(id)),
            Err(DbError::Duplicate(_)) => Ok(CreateOutcome::NameTaken),
            Err(error) => Err(error.into()),
        }
    }
}
