use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use utoipa::ToSchema;

use crate::modules::genre::model::Genre;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub release_date: Date,
    pub genres: Vec<Genre>,
}

/// A `movies` row, without its association set.
#[derive(Debug, FromRow, Clone)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub release_date: Date,
}

impl MovieRow {
    pub fn into_movie(self, genres: Vec<Genre>) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            description: self.description,
            release_date: self.release_date,
            genres: normalize_genres(genres),
        }
    }
}

// For query results joining genres
#[derive(Debug, FromRow, Clone)]
pub struct MovieGenreLink {
    pub movie_id: i32,
    pub genre_id: i32,
    pub genre_name: String,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub release_date: Date,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl MoviePage {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

/// Sorts by name and drops repeated ids, so a movie lists each genre once.
pub fn normalize_genres(mut genres: Vec<Genre>) -> Vec<Genre> {
    genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    genres.dedup_by_key(|g| g.id);
    genres
}
