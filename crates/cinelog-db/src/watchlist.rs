// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cinelog_app::{MovieId, QueryRows, Value, Watchlist, WatchlistEntry, WatchlistId};

use crate::error::{DbError, DbResult};
use crate::{Executor, now_rfc3339};

impl Executor {
    pub fn create_watchlist(&self, name: &str, description: &str) -> DbResult<WatchlistId> {
        let now = now_rfc3339()?;
        let id = self.insert_returning_id(
            "
            INSERT INTO watchlists (name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            &[
                Value::from(name),
                Value::from(description),
                Value::from(now.clone()),
                Value::from(now),
            ],
        )?;
        Ok(WatchlistId::new(id))
    }

    pub fn list_watchlists(&self) -> DbResult<Vec<Watchlist>> {
        let output = self.execute(
            "
            SELECT watchlist_id, name, description
            FROM watchlists
            ORDER BY watchlist_id ASC
            ",
            &[],
            false,
        )?;

        // Three columns, so the normalized shape is always Rows.
        let Some(rows) = output.into_rows() else {
            return Ok(Vec::new());
        };
        let mut watchlists = Vec::with_capacity(rows.len());
        for index in 0..rows.len() {
            let id = rows
                .get(index, "watchlist_id")
                .and_then(Value::as_integer)
                .ok_or_else(|| DbError::NotFound("watchlist_id column".to_owned()))?;
            let name = rows
                .get(index, "name")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_owned();
            let description = rows
                .get(index, "description")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_owned();
            watchlists.push(Watchlist {
                id: WatchlistId::new(id),
                name,
                description,
            });
        }
        Ok(watchlists)
    }

    /// Rows a watchlist tab displays, via the registered entries procedure.
    pub fn watchlist_entries(&self, watchlist_id: WatchlistId) -> DbResult<QueryRows> {
        let output = self.call_procedure(
            "get_watchlist_entries",
            &[Value::Integer(watchlist_id.get())],
        )?;
        Ok(output.into_rows().unwrap_or_else(QueryRows::empty))
    }

    /// Insert one entry. A pair already present raises `DbError::Duplicate`
    /// from the UNIQUE constraint, which callers map to their already-exists
    /// outcome.
    pub fn insert_entry(&self, entry: &WatchlistEntry) -> DbResult<()> {
        let now = now_rfc3339()?;
        self.execute(
            "
            INSERT INTO watchlist_entries (watchlist_id, movie_id, rating, comment, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            &[
                Value::Integer(entry.watchlist_id.get()),
                Value::Integer(entry.movie_id.get()),
                Value::Integer(entry.rating),
                Value::from(entry.comment.as_str()),
                Value::from(now.clone()),
                Value::from(now),
            ],
            false,
        )?;
        Ok(())
    }

    /// Update rating and comment for an existing pair. The identity pair is
    /// immutable; a miss is `NotFound`.
    pub fn update_entry(&self, entry: &WatchlistEntry) -> DbResult<()> {
        let now = now_rfc3339()?;
        let affected = self.run_mutation(
            "
            UPDATE watchlist_entries
            SET rating = ?1, comment = ?2, updated_at = ?3
            WHERE watchlist_id = ?4 AND movie_id = ?5
            ",
            &[
                Value::Integer(entry.rating),
                Value::from(entry.comment.as_str()),
                Value::from(now),
                Value::Integer(entry.watchlist_id.get()),
                Value::Integer(entry.movie_id.get()),
            ],
        )?;
        if affected == 0 {
            return Err(DbError::NotFound(format!(
                "watchlist entry ({}, {})",
                entry.watchlist_id.get(),
                entry.movie_id.get()
            )));
        }
        Ok(())
    }

    pub fn delete_entry(&self, watchlist_id: WatchlistId, movie_id: MovieId) -> DbResult<()> {
        let affected = self.run_mutation(
            "
            DELETE FROM watchlist_entries
            WHERE watchlist_id = ?1 AND movie_id = ?2
            ",
            &[
                Value::Integer(watchlist_id.get()),
                Value::Integer(movie_id.get()),
            ],
        )?;
        if affected == 0 {
            return Err(DbError::NotFound(format!(
                "watchlist entry ({}, {})",
                watchlist_id.get(),
                movie_id.get()
            )));
        }
        Ok(())
    }
}
