use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use time::Date;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::model::Movie;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, message = "Title should not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description should not be empty"))]
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub release_date: Date,
    #[validate(
        length(min = 1, message = "Genre should not be empty"),
        custom(function = "validate_genre_names")
    )]
    pub genres: Vec<String>,
}

/// Fields left out keep their stored value. `genres`, when present, replaces
/// the whole association set.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequest {
    #[validate(length(min = 1, message = "Title should not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description should not be empty"))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub release_date: Option<Date>,
    #[validate(
        length(min = 1, message = "Genre should not be empty"),
        custom(function = "validate_unique_genre_names")
    )]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMoviesQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
    /// Page size, defaults to 10
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieSearch {
    /// Substring of the movie title
    pub title: Option<String>,
    /// Substring of a genre name
    pub genre: Option<String>,
}

impl MovieSearch {
    /// Drops empty filters; `None` when nothing is left to filter on.
    pub fn into_filters(self) -> Option<Self> {
        let title = self.title.filter(|t| !t.is_empty());
        let genre = self.genre.filter(|g| !g.is_empty());

        if title.is_none() && genre.is_none() {
            return None;
        }
        Some(Self { title, genre })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

fn validate_genre_names(names: &[String]) -> Result<(), ValidationError> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ValidationError::new("genre_name")
            .with_message(Cow::Borrowed("Genre names should not be empty")));
    }
    Ok(())
}

fn validate_unique_genre_names(names: &[String]) -> Result<(), ValidationError> {
    validate_genre_names(names)?;

    let mut seen = HashSet::new();
    if !names.iter().all(|name| seen.insert(name)) {
        return Err(ValidationError::new("unique")
            .with_message(Cow::Borrowed("Genre should not contain duplicate values")));
    }
    Ok(())
}
