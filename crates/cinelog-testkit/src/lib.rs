// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic fixtures for cinelog tests: a small hand-written movie
//! catalog, CSV fixture files for the bulk loader, and a seedable faker for
//! volume data.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const GENRES: [&str; 8] = [
    "Action",
    "Comedy",
    "Crime",
    "Drama",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Thriller",
];

pub const NATIONALITIES: [&str; 8] = [
    "American",
    "British",
    "Canadian",
    "French",
    "German",
    "Japanese",
    "Korean",
    "Mexican",
];

const TITLE_HEADS: [&str; 12] = [
    "Dark", "Silent", "Broken", "Crimson", "Last", "Hidden", "Golden", "Iron", "Lost", "Pale",
    "Distant", "Burning",
];
const TITLE_TAILS: [&str; 12] = [
    "Knight", "Harbor", "Signal", "Garden", "Empire", "Witness", "Horizon", "Covenant", "Echo",
    "Station", "Crossing", "Reckoning",
];

const FIRST_NAMES: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Elliot", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Turner", "Brooks",
];

/// Splitmix-style generator; same seed, same data, no `rand` dependency.
#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn movie_title(&mut self) -> String {
        let head = TITLE_HEADS[self.rng.int_n(TITLE_HEADS.len())];
        let tail = TITLE_TAILS[self.rng.int_n(TITLE_TAILS.len())];
        format!("{head} {tail}")
    }

    pub fn person_name(&mut self) -> String {
        let first = FIRST_NAMES[self.rng.int_n(FIRST_NAMES.len())];
        let last = LAST_NAMES[self.rng.int_n(LAST_NAMES.len())];
        format!("{first} {last}")
    }

    pub fn release_year(&mut self) -> i64 {
        1960 + self.rng.int_n(65) as i64
    }

    pub fn runtime_minutes(&mut self) -> i64 {
        75 + self.rng.int_n(110) as i64
    }

    pub fn nationality(&mut self) -> &'static str {
        NATIONALITIES[self.rng.int_n(NATIONALITIES.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMovie {
    pub movie_id: i64,
    pub title: &'static str,
    pub release_year: i64,
    pub runtime_minutes: i64,
    pub director_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePerson {
    pub id: i64,
    pub name: &'static str,
    pub birth_year: i64,
    pub nationality: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCatalog {
    pub movies: Vec<SampleMovie>,
    pub actors: Vec<SamplePerson>,
    pub directors: Vec<SamplePerson>,
    pub genres: Vec<(i64, &'static str)>,
    /// (movie_id, genre_id)
    pub movie_genres: Vec<(i64, i64)>,
    /// (movie_id, actor_id, role)
    pub movie_cast: Vec<(i64, i64, &'static str)>,
}

/// The fixed catalog most tests run against. Small enough to assert against
/// by eye, varied enough to exercise search and filters.
pub fn sample_catalog() -> SampleCatalog {
    SampleCatalog {
        movies: vec![
            SampleMovie {
                movie_id: 1,
                title: "Dark Knight",
                release_year: 2008,
                runtime_minutes: 152,
                director_id: 1,
            },
            SampleMovie {
                movie_id: 2,
                title: "Lightroom",
                release_year: 2008,
                runtime_minutes: 97,
                director_id: 2,
            },
            SampleMovie {
                movie_id: 3,
                title: "Silent Harbor",
                release_year: 1995,
                runtime_minutes: 118,
                director_id: 2,
            },
            SampleMovie {
                movie_id: 4,
                title: "Crimson Echo",
                release_year: 2001,
                runtime_minutes: 104,
                director_id: 3,
            },
        ],
        actors: vec![
            SamplePerson {
                id: 1,
                name: "Avery Walker",
                birth_year: 1971,
                nationality: "American",
            },
            SamplePerson {
                id: 2,
                name: "Jordan Hill",
                birth_year: 1983,
                nationality: "British",
            },
            SamplePerson {
                id: 3,
                name: "Riley Diaz",
                birth_year: 1990,
                nationality: "Mexican",
            },
        ],
        directors: vec![
            SamplePerson {
                id: 1,
                name: "Morgan Reed",
                birth_year: 1965,
                nationality: "American",
            },
            SamplePerson {
                id: 2,
                name: "Casey Turner",
                birth_year: 1958,
                nationality: "Canadian",
            },
            SamplePerson {
                id: 3,
                name: "Quinn Brooks",
                birth_year: 1979,
                nationality: "French",
            },
        ],
        genres: vec![(1, "Action"), (2, "Comedy"), (3, "Drama")],
        movie_genres: vec![(1, 1), (2, 2), (3, 3), (4, 3)],
        movie_cast: vec![(1, 1, "Lead"), (1, 2, "Support"), (2, 3, "Lead"), (3, 1, "Lead")],
    }
}

/// Write the catalog as the per-table CSV files the bulk loader consumes.
pub fn write_catalog_csvs(dir: &Path, catalog: &SampleCatalog) -> Result<()> {
    let mut writer = csv_writer(dir, "movie")?;
    writer.write_record([
        "movie_id",
        "title",
        "release_year",
        "runtime_minutes",
        "director_id",
    ])?;
    for movie in &catalog.movies {
        writer.write_record([
            movie.movie_id.to_string(),
            movie.title.to_owned(),
            movie.release_year.to_string(),
            movie.runtime_minutes.to_string(),
            movie.director_id.to_string(),
        ])?;
    }
    writer.flush()?;

    for (table, people) in [("actor", &catalog.actors), ("director", &catalog.directors)] {
        let id_column = format!("{table}_id");
        let mut writer = csv_writer(dir, table)?;
        writer.write_record([id_column.as_str(), "name", "birth_year", "nationality"])?;
        for person in people {
            writer.write_record([
                person.id.to_string(),
                person.name.to_owned(),
                person.birth_year.to_string(),
                person.nationality.to_owned(),
            ])?;
        }
        writer.flush()?;
    }

    let mut writer = csv_writer(dir, "genre")?;
    writer.write_record(["genre_id", "name"])?;
    for (genre_id, name) in &catalog.genres {
        writer.write_record([genre_id.to_string(), (*name).to_owned()])?;
    }
    writer.flush()?;

    let mut writer = csv_writer(dir, "movie_genre")?;
    writer.write_record(["movie_id", "genre_id"])?;
    for (movie_id, genre_id) in &catalog.movie_genres {
        writer.write_record([movie_id.to_string(), genre_id.to_string()])?;
    }
    writer.flush()?;

    let mut writer = csv_writer(dir, "movie_cast")?;
    writer.write_record(["movie_id", "actor_id", "role"])?;
    for (movie_id, actor_id, role) in &catalog.movie_cast {
        writer.write_record([movie_id.to_string(), actor_id.to_string(), (*role).to_owned()])?;
    }
    writer.flush()?;

    Ok(())
}

fn csv_writer(dir: &Path, table: &str) -> Result<csv::Writer<std::fs::File>> {
    let path = dir.join(format!("{table}.csv"));
    csv::Writer::from_path(&path).with_context(|| format!("create CSV fixture {}", path.display()))
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let temp = tempfile::tempdir().context("create temp dir")?;
    let path = temp.path().join("cinelog.db");
    Ok((temp, path))
}

#[cfg(test)]
mod tests {
    use super::{CatalogFaker, sample_catalog, write_catalog_csvs};

    #[test]
    fn faker_is_deterministic_per_seed() {
        let mut a = CatalogFaker::new(7);
        let mut b = CatalogFaker::new(7);
        assert_eq!(a.movie_title(), b.movie_title());
        assert_eq!(a.person_name(), b.person_name());
        assert_eq!(a.release_year(), b.release_year());
    }

    #[test]
    fn sample_catalog_is_referentially_consistent() {
        let catalog = sample_catalog();
        for movie in &catalog.movies {
            assert!(
                catalog
                    .directors
                    .iter()
                    .any(|director| director.id == movie.director_id),
                "movie {} points at a missing director",
                movie.title
            );
        }
        for (movie_id, genre_id) in &catalog.movie_genres {
            assert!(catalog.movies.iter().any(|movie| movie.movie_id == *movie_id));
            assert!(catalog.genres.iter().any(|(id, _)| id == genre_id));
        }
    }

    #[test]
    fn catalog_csvs_land_one_file_per_table() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        write_catalog_csvs(temp.path(), &sample_catalog())?;
        for table in ["movie", "actor", "director", "genre", "movie_genre", "movie_cast"] {
            assert!(temp.path().join(format!("{table}.csv")).exists());
        }
        Ok(())
    }
}
