// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use cinelog_app::{MovieId, Value, WatchlistEntry, WatchlistId};
use cinelog_db::{DbError, Executor, loader};
use cinelog_testkit::{sample_catalog, temp_db_path, write_catalog_csvs};

fn seeded_executor() -> Result<(tempfile::TempDir, Executor)> {
    let (temp, db_path) = temp_db_path()?;
    let executor = Executor::new(&db_path)?;
    executor.bootstrap()?;

    let csv_dir = temp.path().join("catalog");
    std::fs::create_dir_all(&csv_dir)?;
    write_catalog_csvs(&csv_dir, &sample_catalog())?;
    loader::import_dir(&executor, &csv_dir)?;
    Ok((temp, executor))
}

#[test]
fn bootstrap_creates_full_schema() -> Result<()> {
    let (_temp, db_path) = temp_db_path()?;
    let executor = Executor::new(&db_path)?;
    executor.bootstrap()?;

    let tables = executor.table_names()?;
    for required in ["movie", "actor", "genre", "watchlists", "watchlist_entries"] {
        assert!(
            tables.iter().any(|table| table == required),
            "missing table {required}"
        );
    }

    // Bootstrap over an already-valid database is a no-op, not an error.
    executor.bootstrap()?;
    Ok(())
}

#[test]
fn csv_import_seeds_catalog_in_dependency_order() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;

    let output = executor.execute("SELECT COUNT(*) FROM movie", &[], false)?;
    assert_eq!(output.values(), Some(&[Value::Integer(4)][..]));

    let output = executor.execute("SELECT COUNT(*) FROM movie_genre", &[], false)?;
    assert_eq!(output.values(), Some(&[Value::Integer(4)][..]));
    Ok(())
}

#[test]
fn csv_import_skips_bad_rows_and_continues() -> Result<()> {
    let (temp, db_path) = temp_db_path()?;
    let executor = Executor::new(&db_path)?;
    executor.bootstrap()?;

    let csv_dir = temp.path().join("partial");
    std::fs::create_dir_all(&csv_dir)?;
    // Second row has a null title, which the schema rejects.
    std::fs::write(
        csv_dir.join("movie.csv"),
        "movie_id,title,release_year,runtime_minutes,director_id\n\
         1,Heat,1995,170,\n\
         2,,1979,117,\n\
         3,Alien,1979,117,\n",
    )?;

    let report = loader::import_dir(&executor, &csv_dir)?;
    assert_eq!(report.files, 1);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 1);

    let output = executor.execute(
        "SELECT title FROM movie ORDER BY movie_id ASC",
        &[],
        false,
    )?;
    assert_eq!(
        output.values(),
        Some(&[Value::from("Heat"), Value::from("Alien")][..])
    );
    Ok(())
}

#[test]
fn import_dir_requires_an_existing_directory() -> Result<()> {
    let (temp, db_path) = temp_db_path()?;
    let executor = Executor::new(&db_path)?;
    executor.bootstrap()?;

    let error = loader::import_dir(&executor, &temp.path().join("nowhere"))
        .expect_err("missing dir should fail");
    assert!(error.to_string().contains("does not exist"));
    Ok(())
}

#[test]
fn filter_procedure_narrows_by_bound_values_only() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;

    // release_year bound, everything else unconstrained.
    let params = [Value::Null, Value::Integer(2008), Value::Null];
    let output = executor.call_procedure("filter_movie", &params)?;
    let rows = output.rows().expect("filter results are rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.get(0, "title"), Some(&Value::from("Dark Knight")));
    assert_eq!(rows.get(1, "title"), Some(&Value::from("Lightroom")));

    // Applying the same criteria again yields the same visible set.
    let again = executor.call_procedure("filter_movie", &params)?;
    assert_eq!(again.rows(), Some(rows));
    Ok(())
}

#[test]
fn all_null_filter_returns_every_row() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let output = executor.call_procedure(
        "filter_movie",
        &[Value::Null, Value::Null, Value::Null],
    )?;
    assert_eq!(output.len(), 4);
    Ok(())
}

#[test]
fn unknown_procedure_is_rejected_by_name() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let error = executor
        .call_procedure("filter_watchlists", &[])
        .expect_err("unregistered procedure should fail");
    assert!(matches!(error, DbError::UnknownProcedure(_)));
    Ok(())
}

#[test]
fn entry_round_trips_through_the_entries_procedure() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("noir", "rainy day picks")?;

    executor.insert_entry(&WatchlistEntry {
        watchlist_id,
        movie_id: MovieId::new(3),
        rating: 4,
        comment: "slow burn".to_owned(),
    })?;

    let rows = executor.watchlist_entries(watchlist_id)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.get(0, "watchlist_id"),
        Some(&Value::Integer(watchlist_id.get()))
    );
    assert_eq!(rows.get(0, "movie_id"), Some(&Value::Integer(3)));
    assert_eq!(rows.get(0, "title"), Some(&Value::from("Silent Harbor")));
    assert_eq!(rows.get(0, "rating"), Some(&Value::Integer(4)));
    assert_eq!(rows.get(0, "comment"), Some(&Value::from("slow burn")));
    Ok(())
}

#[test]
fn duplicate_pair_insert_raises_duplicate_and_changes_nothing() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("favorites", "")?;

    let entry = WatchlistEntry {
        watchlist_id,
        movie_id: MovieId::new(1),
        rating: 5,
        comment: "NA".to_owned(),
    };
    executor.insert_entry(&entry)?;

    let error = executor
        .insert_entry(&entry)
        .expect_err("second insert of the pair should fail");
    assert!(matches!(error, DbError::Duplicate(_)));

    let rows = executor.watchlist_entries(watchlist_id)?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[test]
fn taken_watchlist_name_is_a_duplicate() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    executor.create_watchlist("favorites", "")?;

    let error = executor
        .create_watchlist("favorites", "second attempt")
        .expect_err("taken name should fail");
    assert!(matches!(error, DbError::Duplicate(_)));

    assert_eq!(executor.list_watchlists()?.len(), 1);
    Ok(())
}

#[test]
fn update_entry_changes_rating_and_comment_only() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("favorites", "")?;
    executor.insert_entry(&WatchlistEntry {
        watchlist_id,
        movie_id: MovieId::new(2),
        rating: 2,
        comment: "meh".to_owned(),
    })?;

    executor.update_entry(&WatchlistEntry {
        watchlist_id,
        movie_id: MovieId::new(2),
        rating: 5,
        comment: "NA".to_owned(),
    })?;

    let rows = executor.watchlist_entries(watchlist_id)?;
    assert_eq!(rows.get(0, "movie_id"), Some(&Value::Integer(2)));
    assert_eq!(rows.get(0, "rating"), Some(&Value::Integer(5)));
    assert_eq!(rows.get(0, "comment"), Some(&Value::from("NA")));
    Ok(())
}

#[test]
fn update_of_missing_pair_is_not_found() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("favorites", "")?;

    let error = executor
        .update_entry(&WatchlistEntry {
            watchlist_id,
            movie_id: MovieId::new(99),
            rating: 3,
            comment: "NA".to_owned(),
        })
        .expect_err("missing pair should fail");
    assert!(matches!(error, DbError::NotFound(_)));
    Ok(())
}

#[test]
fn delete_entry_issues_exact_key_and_removes_one_row() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("favorites", "")?;
    for movie_id in [1, 2, 3] {
        executor.insert_entry(&WatchlistEntry {
            watchlist_id,
            movie_id: MovieId::new(movie_id),
            rating: 3,
            comment: "NA".to_owned(),
        })?;
    }

    executor.delete_entry(watchlist_id, MovieId::new(2))?;
    let rows = executor.watchlist_entries(watchlist_id)?;
    assert_eq!(rows.len(), 2);

    let error = executor
        .delete_entry(watchlist_id, MovieId::new(2))
        .expect_err("already deleted pair should miss");
    assert!(matches!(error, DbError::NotFound(_)));
    Ok(())
}

#[test]
fn entry_rating_outside_bounds_is_a_statement_error() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let watchlist_id = executor.create_watchlist("favorites", "")?;

    let error = executor
        .insert_entry(&WatchlistEntry {
            watchlist_id,
            movie_id: MovieId::new(1),
            rating: 9,
            comment: "NA".to_owned(),
        })
        .expect_err("rating above 5 violates the CHECK constraint");
    assert!(matches!(error, DbError::Statement(_)));
    Ok(())
}

#[test]
fn watchlist_ids_are_assigned_by_storage() -> Result<()> {
    let (_temp, executor) = seeded_executor()?;
    let first = executor.create_watchlist("first", "")?;
    let second = executor.create_watchlist("second", "")?;
    assert!(second.get() > first.get());

    let watchlists = executor.list_watchlists()?;
    assert_eq!(watchlists.len(), 2);
    assert_eq!(watchlists[0].id, WatchlistId::new(first.get()));
    assert_eq!(watchlists[0].name, "first");
    Ok(())
}
