// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use cinelog_app::{
    EntryFormInput, InputValue, MovieId, QueryRows, TableKind, Value, Watchlist, WatchlistEntry,
    WatchlistFormInput, WatchlistId,
};

use crate::filter::{FilterBackend, FilterView};
use crate::model::TableModel;

/// Storage seam for the curation layer. The CLI runtime implements it over
/// the query executor; tests implement it in memory.
pub trait EntryStore: FilterBackend {
    fn list_watchlists(&mut self) -> Result<Vec<Watchlist>>;
    fn watchlist_entries(&mut self, watchlist: WatchlistId) -> Result<QueryRows>;
    fn insert_entry(&mut self, entry: &WatchlistEntry) -> Result<InsertOutcome>;
    fn update_entry(&mut self, entry: &WatchlistEntry) -> Result<()>;
    fn delete_entry(&mut self, watchlist: WatchlistId, movie: MovieId) -> Result<()>;
    fn create_watchlist(&mut self, name: &str, description: &str) -> Result<CreateOutcome>;
}

/// Insert result as storage reports it. The UNIQUE pair constraint is the
/// authoritative duplicate guard, so a duplicate is an outcome here, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicatePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(WatchlistId),
    NameTaken,
}

/// Detail-collection seam standing in for the add/edit dialogs. Fields come
/// back in display order; `None` means the user cancelled.
pub trait EntryPrompt {
    fn entry_details(
        &mut self,
        movie_title: &str,
        prefill: Option<&EntryFormInput>,
    ) -> Option<Vec<InputValue>>;

    fn watchlist_details(&mut self) -> Option<Vec<InputValue>>;
}

/// Generic action-confirmation seam. Deletion is irreversible, so the
/// controller always consults it before issuing a DELETE.
pub trait ActionConfirm {
    fn confirm(&mut self, action: &str, subject: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLocation {
    pub pane: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// The pair already exists. The location is where to navigate, when the
    /// owning watchlist view is loaded.
    AlreadyExists(Option<EntryLocation>),
    Cancelled,
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Cancelled,
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateWatchlistOutcome {
    Created,
    NameTaken,
    Cancelled,
    InvalidInput(String),
}

/// One loaded watchlist: its metadata plus the filterable view of its
/// entries.
#[derive(Debug)]
pub struct WatchlistPane {
    pub watchlist: Watchlist,
    pub view: FilterView,
}

/// Keeps every loaded watchlist view consistent with storage through the
/// add/edit/delete lifecycle.
#[derive(Debug, Default)]
pub struct WatchlistController {
    panes: Vec<WatchlistPane>,
}

impl WatchlistController {
    pub fn new() -> Self {
        Self { panes: Vec::new() }
    }

    /// Load every stored watchlist and its entries.
    pub fn load(store: &mut dyn EntryStore) -> Result<Self> {
        let mut panes = Vec::new();
        for watchlist in store.list_watchlists()? {
            let rows = store.watchlist_entries(watchlist.id)?;
            panes.push(WatchlistPane {
                watchlist,
                view: FilterView::new(TableModel::new(rows)),
            });
        }
        Ok(Self { panes })
    }

    pub fn panes(&self) -> &[WatchlistPane] {
        &self.panes
    }

    pub fn pane(&self, index: usize) -> Option<&WatchlistPane> {
        self.panes.get(index)
    }

    pub fn pane_mut(&mut self, index: usize) -> Option<&mut WatchlistPane> {
        self.panes.get_mut(index)
    }

    /// Locate an entry pair among the loaded views. First match wins.
    pub fn find_entry(&self, watchlist: WatchlistId, movie: MovieId) -> Option<EntryLocation> {
        self.panes.iter().enumerate().find_map(|(index, pane)| {
            if pane.watchlist.id != watchlist {
                return None;
            }
            pane.view
                .model()
                .find_row(&Value::Integer(movie.get()), "movie_id")
                .map(|(row, _col)| EntryLocation { pane: index, row })
        })
    }

    /// The add lifecycle: duplicate check, detail prompt, insert, then
    /// re-query so the view mirrors storage instead of being patched
    /// optimistically.
    pub fn add_to_watchlist(
        &mut self,
        store: &mut dyn EntryStore,
        prompt: &mut dyn EntryPrompt,
        watchlist: WatchlistId,
        movie: MovieId,
        movie_title: &str,
    ) -> Result<AddOutcome> {
        if let Some(location) = self.find_entry(watchlist, movie) {
            return Ok(AddOutcome::AlreadyExists(Some(location)));
        }

        let Some(inputs) = prompt.entry_details(movie_title, None) else {
            return Ok(AddOutcome::Cancelled);
        };
        let form = match EntryFormInput::from_inputs(&inputs) {
            Ok(form) => form,
            Err(error) => return Ok(AddOutcome::InvalidInput(error.to_string())),
        };
        if let Err(error) = form.validate() {
            return Ok(AddOutcome::InvalidInput(error.to_string()));
        }

        let entry = WatchlistEntry {
            watchlist_id: watchlist,
            movie_id: movie,
            rating: form.rating,
            comment: form.normalized_comment(),
        };
        match store.insert_entry(&entry)? {
            InsertOutcome::Inserted => {
                self.refresh_watchlist(store, watchlist)?;
                Ok(AddOutcome::Inserted)
            }
            InsertOutcome::DuplicatePair => {
                // A concurrent insert slipped past the pre-check; the
                // constraint said so. Refresh and hand back the location.
                self.refresh_watchlist(store, watchlist)?;
                Ok(AddOutcome::AlreadyExists(self.find_entry(watchlist, movie)))
            }
        }
    }

    /// Edit rating/comment of an entry at a known row. The identity pair is
    /// immutable, so on success only the two changed cells are patched.
    pub fn edit_entry(
        &mut self,
        store: &mut dyn EntryStore,
        prompt: &mut dyn EntryPrompt,
        pane: usize,
        row: usize,
    ) -> Result<EditOutcome> {
        let Some(identity) = self.entry_at(pane, row) else {
            return Ok(EditOutcome::InvalidInput(
                "that entry is no longer present -- refresh the watchlist and retry".to_owned(),
            ));
        };
        let (watchlist, movie, title, prefill) = identity;

        let Some(inputs) = prompt.entry_details(&title, Some(&prefill)) else {
            return Ok(EditOutcome::Cancelled);
        };
        let form = match EntryFormInput::from_inputs(&inputs) {
            Ok(form) => form,
            Err(error) => return Ok(EditOutcome::InvalidInput(error.to_string())),
        };
        if let Err(error) = form.validate() {
            return Ok(EditOutcome::InvalidInput(error.to_string()));
        }

        let comment = form.normalized_comment();
        store.update_entry(&WatchlistEntry {
            watchlist_id: watchlist,
            movie_id: movie,
            rating: form.rating,
            comment: comment.clone(),
        })?;

        let model = self.panes[pane].view.model_mut();
        model.set_cell_by_name(row, "rating", Value::Integer(form.rating));
        model.set_cell_by_name(row, "comment", Value::Text(comment));
        Ok(EditOutcome::Updated)
    }

    /// Delete an entry at a known row, behind the confirmation seam.
    pub fn delete_entry(
        &mut self,
        store: &mut dyn EntryStore,
        confirm: &mut dyn ActionConfirm,
        pane: usize,
        row: usize,
    ) -> Result<DeleteOutcome> {
        let Some((watchlist, movie, title, _prefill)) = self.entry_at(pane, row) else {
            return Ok(DeleteOutcome::Cancelled);
        };
        if !confirm.confirm("delete", &title) {
            return Ok(DeleteOutcome::Cancelled);
        }

        store.delete_entry(watchlist, movie)?;
        self.panes[pane].view.model_mut().remove_row(row);
        Ok(DeleteOutcome::Deleted)
    }

    /// Create a watchlist from prompted details. A taken name is rejected
    /// before the insert when the pane is loaded; the UNIQUE name constraint
    /// backstops the rest.
    pub fn create_watchlist(
        &mut self,
        store: &mut dyn EntryStore,
        prompt: &mut dyn EntryPrompt,
    ) -> Result<CreateWatchlistOutcome> {
        let Some(inputs) = prompt.watchlist_details() else {
            return Ok(CreateWatchlistOutcome::Cancelled);
        };
        let form = match WatchlistFormInput::from_inputs(&inputs) {
            Ok(form) => form,
            Err(error) => return Ok(CreateWatchlistOutcome::InvalidInput(error.to_string())),
        };
        if let Err(error) = form.validate() {
            return Ok(CreateWatchlistOutcome::InvalidInput(error.to_string()));
        }
        if self
            .panes
            .iter()
            .any(|pane| pane.watchlist.name == form.name)
        {
            return Ok(CreateWatchlistOutcome::NameTaken);
        }

        match store.create_watchlist(&form.name, &form.description)? {
            CreateOutcome::NameTaken => Ok(CreateWatchlistOutcome::NameTaken),
            CreateOutcome::Created(id) => {
                let rows = store.watchlist_entries(id)?;
                self.panes.push(WatchlistPane {
                    watchlist: Watchlist {
                        id,
                        name: form.name,
                        description: form.description,
                    },
                    view: FilterView::new(TableModel::new(rows)),
                });
                Ok(CreateWatchlistOutcome::Created)
            }
        }
    }

    fn refresh_watchlist(
        &mut self,
        store: &mut dyn EntryStore,
        watchlist: WatchlistId,
    ) -> Result<()> {
        let Some(index) = self
            .panes
            .iter()
            .position(|pane| pane.watchlist.id == watchlist)
        else {
            return Ok(());
        };
        let rows = store.watchlist_entries(watchlist)?;
        self.panes[index].view.model_mut().reset(rows);
        Ok(())
    }

    fn entry_at(
        &self,
        pane: usize,
        row: usize,
    ) -> Option<(WatchlistId, MovieId, String, EntryFormInput)> {
        let model = self.panes.get(pane)?.view.model();
        let watchlist = model.value_by_name(row, "watchlist_id")?.as_integer()?;
        let movie = model.value_by_name(row, "movie_id")?.as_integer()?;
        let title = model
            .value_by_name(row, "title")
            .map(Value::display)
            .unwrap_or_default();
        let prefill = EntryFormInput {
            rating: model
                .value_by_name(row, "rating")
                .and_then(Value::as_integer)
                .unwrap_or(0),
            comment: model
                .value_by_name(row, "comment")
                .map(Value::display)
                .unwrap_or_default(),
        };
        Some((
            WatchlistId::new(watchlist),
            MovieId::new(movie),
            title,
            prefill,
        ))
    }
}

/// One browsable catalog tab.
#[derive(Debug)]
pub struct TabPane {
    pub kind: TableKind,
    pub view: FilterView,
}

/// The catalog tab strip, including cross-tab reference navigation.
#[derive(Debug, Default)]
pub struct TabSet {
    tabs: Vec<TabPane>,
    active: usize,
}

impl TabSet {
    pub fn new(tabs: Vec<TabPane>) -> Self {
        Self { tabs, active: 0 }
    }

    pub fn tabs(&self) -> &[TabPane] {
        &self.tabs
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_pane(&self) -> Option<&TabPane> {
        self.tabs.get(self.active)
    }

    pub fn active_pane_mut(&mut self) -> Option<&mut TabPane> {
        self.tabs.get_mut(self.active)
    }

    /// Switch tabs. The free-text search does not follow: the outgoing tab
    /// is restored to full visibility and the incoming one starts clean.
    pub fn set_active(&mut self, index: usize) {
        if index >= self.tabs.len() || index == self.active {
            return;
        }
        if let Some(pane) = self.tabs.get_mut(self.active) {
            pane.view.clear_search();
        }
        self.active = index;
        if let Some(pane) = self.tabs.get_mut(self.active) {
            pane.view.clear_search();
        }
    }

    /// Follow a person/entity reference into its home tab: locate the row by
    /// identifier, switch there, and select it. A miss (filtered out or
    /// unloaded) is a no-op.
    pub fn goto_reference(
        &mut self,
        target: TableKind,
        id_column: &str,
        id: i64,
    ) -> Option<(usize, usize)> {
        let tab_index = self.tabs.iter().position(|tab| tab.kind == target)?;
        let (row, _col) = self.tabs[tab_index]
            .view
            .model()
            .find_row(&Value::Integer(id), id_column)?;

        self.set_active(tab_index);
        if let Some(pane) = self.tabs.get_mut(tab_index) {
            pane.view.selected = Some(row);
        }
        Some((tab_index, row))
    }
}
