// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::model::InputValue;

pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 5;

/// Placeholder stored when a user submits an entry without a comment.
pub const EMPTY_COMMENT_PLACEHOLDER: &str = "NA";

/// Rating and comment collected by the add/edit entry prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFormInput {
    pub rating: i64,
    pub comment: String,
}

impl EntryFormInput {
    /// Build from prompt fields in display order: rating spinner, comment box.
    pub fn from_inputs(inputs: &[InputValue]) -> Result<Self> {
        let [rating, comment] = inputs else {
            bail!(
                "entry prompt returned {} fields, expected rating and comment",
                inputs.len()
            );
        };
        let Some(rating) = rating.as_integer() else {
            bail!("rating field must be an integer input");
        };
        let Some(comment) = comment.as_str() else {
            bail!("comment field must be a text input");
        };
        Ok(Self {
            rating,
            comment: comment.to_owned(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.rating < RATING_MIN || self.rating > RATING_MAX {
            bail!(
                "rating must be between {RATING_MIN} and {RATING_MAX}, got {} -- adjust and retry",
                self.rating
            );
        }
        Ok(())
    }

    /// Stored comment: the literal placeholder when the user left it blank.
    pub fn normalized_comment(&self) -> String {
        if self.comment.trim().is_empty() {
            EMPTY_COMMENT_PLACEHOLDER.to_owned()
        } else {
            self.comment.clone()
        }
    }
}

/// Name and description collected by the new-watchlist prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistFormInput {
    pub name: String,
    pub description: String,
}

impl WatchlistFormInput {
    pub fn from_inputs(inputs: &[InputValue]) -> Result<Self> {
        let [name, description] = inputs else {
            bail!(
                "watchlist prompt returned {} fields, expected name and description",
                inputs.len()
            );
        };
        let (Some(name), Some(description)) = (name.as_str(), description.as_str()) else {
            bail!("watchlist prompt fields must be text inputs");
        };
        Ok(Self {
            name: name.to_owned(),
            description: description.to_owned(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("watchlist name is required -- enter a name and retry");
        }
        Ok(())
    }
}
