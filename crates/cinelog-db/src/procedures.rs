// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Named parameterized statements, invoked by name through
//! [`Executor::call_procedure`](crate::Executor::call_procedure).
//!
//! Each `filter_<table>` procedure takes one positional parameter per
//! eligible column of its table, in declaration order. A null parameter
//! leaves that column unconstrained.

use cinelog_app::TableKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Procedure {
    pub name: &'static str,
    /// Parameter names in positional order.
    pub params: &'static [&'static str],
    pub sql: &'static str,
}

pub const PROCEDURES: &[Procedure] = &[
    Procedure {
        name: "filter_movie",
        params: &["title", "release_year", "runtime_minutes"],
        sql: "
            SELECT movie_id, title, release_year, runtime_minutes, director_id
            FROM movie
            WHERE (?1 IS NULL OR title = ?1)
              AND (?2 IS NULL OR release_year = ?2)
              AND (?3 IS NULL OR runtime_minutes = ?3)
            ORDER BY movie_id ASC
            ",
    },
    Procedure {
        name: "filter_actor",
        params: &["name", "birth_year", "nationality"],
        sql: "
            SELECT actor_id, name, birth_year, nationality
            FROM actor
            WHERE (?1 IS NULL OR name = ?1)
              AND (?2 IS NULL OR birth_year = ?2)
              AND (?3 IS NULL OR nationality = ?3)
            ORDER BY actor_id ASC
            ",
    },
    Procedure {
        name: "filter_director",
        params: &["name", "birth_year", "nationality"],
        sql: "
            SELECT director_id, name, birth_year, nationality
            FROM director
            WHERE (?1 IS NULL OR name = ?1)
              AND (?2 IS NULL OR birth_year = ?2)
              AND (?3 IS NULL OR nationality = ?3)
            ORDER BY director_id ASC
            ",
    },
    Procedure {
        name: "filter_production_company",
        params: &["name", "founded_year", "headquarters"],
        sql: "
            SELECT company_id, name, founded_year, headquarters
            FROM production_company
            WHERE (?1 IS NULL OR name = ?1)
              AND (?2 IS NULL OR founded_year = ?2)
              AND (?3 IS NULL OR headquarters = ?3)
            ORDER BY company_id ASC
            ",
    },
    Procedure {
        name: "filter_genre",
        params: &["name"],
        sql: "
            SELECT genre_id, name
            FROM genre
            WHERE (?1 IS NULL OR name = ?1)
            ORDER BY genre_id ASC
            ",
    },
    Procedure {
        name: "filter_awards",
        params: &["name", "category"],
        sql: "
            SELECT award_id, name, category
            FROM awards
            WHERE (?1 IS NULL OR name = ?1)
              AND (?2 IS NULL OR category = ?2)
            ORDER BY award_id ASC
            ",
    },
    Procedure {
        name: "get_watchlist_entries",
        params: &["watchlist_id"],
        sql: "
            SELECT we.watchlist_id, we.movie_id, m.title, we.rating, we.comment
            FROM watchlist_entries we
            JOIN movie m ON m.movie_id = we.movie_id
            WHERE we.watchlist_id = ?1
            ORDER BY m.title ASC, m.movie_id ASC
            ",
    },
];

pub fn lookup(name: &str) -> Option<&'static Procedure> {
    PROCEDURES
        .iter()
        .find(|procedure| procedure.name == name)
}

/// Procedure name the structured filter uses for a browsable table.
pub fn filter_procedure_name(kind: TableKind) -> String {
    format!("filter_{}", kind.table())
}

#[cfg(test)]
mod tests {
    use super::{filter_procedure_name, lookup};
    use cinelog_app::TableKind;

    #[test]
    fn every_browsable_table_has_a_filter_procedure() {
        for kind in TableKind::ALL {
            let name = filter_procedure_name(kind);
            assert!(lookup(&name).is_some(), "missing procedure {name}");
        }
    }

    #[test]
    fn unknown_names_miss_the_registry() {
        assert!(lookup("filter_watchlist_entries").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn watchlist_entries_procedure_takes_one_parameter() {
        let procedure = lookup("get_watchlist_entries").expect("registered");
        assert_eq!(procedure.params, ["watchlist_id"]);
    }
}
