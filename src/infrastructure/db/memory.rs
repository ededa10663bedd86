//! In-process stand-in for the Postgres catalog, used by tests.
//!
//! Mirrors the schema's foreign keys: links must point at existing rows,
//! deleting a movie drops its links, deleting a linked genre fails.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::modules::genre::model::Genre;
use crate::modules::genre::repository::GenreStore;
use crate::modules::movie::dto::MovieSearch;
use crate::modules::movie::model::{Movie, MovieRow, NewMovie};
use crate::modules::movie::repository::MovieStore;

#[derive(Default)]
struct Tables {
    last_genre_id: i32,
    last_movie_id: i32,
    genres: BTreeMap<i32, Genre>,
    movies: BTreeMap<i32, MovieRow>,
    // (movie_id, genre_id)
    links: BTreeSet<(i32, i32)>,
}

impl Tables {
    fn insert_genre(&mut self, name: &str) -> Genre {
        self.last_genre_id += 1;
        let genre = Genre {
            id: self.last_genre_id,
            name: name.to_string(),
        };
        self.genres.insert(genre.id, genre.clone());
        genre
    }

    fn genre_by_name(&self, name: &str) -> Option<Genre> {
        self.genres.values().find(|g| g.name == name).cloned()
    }

    fn delete_genre(&mut self, id: i32) -> Result<()> {
        if self.links.iter().any(|&(_, genre_id)| genre_id == id) {
            bail!("genre {} is still referenced by movie_genres", id);
        }
        self.genres.remove(&id);
        Ok(())
    }

    fn replace_links(&mut self, movie_id: i32, genres: &[Genre]) -> Result<()> {
        if let Some(missing) = genres.iter().find(|g| !self.genres.contains_key(&g.id)) {
            bail!("genre {} does not exist", missing.id);
        }
        self.links.retain(|&(m, _)| m != movie_id);
        self.links.extend(genres.iter().map(|g| (movie_id, g.id)));
        Ok(())
    }

    fn movie(&self, row: &MovieRow) -> Movie {
        let genres = self
            .links
            .range((row.id, i32::MIN)..=(row.id, i32::MAX))
            .filter_map(|(_, genre_id)| self.genres.get(genre_id).cloned())
            .collect();
        row.clone().into_movie(genres)
    }
}

#[derive(Clone, Default)]
pub struct MemoryCatalog {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("catalog lock poisoned")
    }

    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }

    pub fn links_for_genre(&self, genre_id: i32) -> usize {
        self.lock()
            .links
            .iter()
            .filter(|&&(_, g)| g == genre_id)
            .count()
    }
}

#[async_trait]
impl GenreStore for MemoryCatalog {
    async fn find_all(&self) -> Result<Vec<Genre>> {
        let mut genres: Vec<Genre> = self.lock().genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>> {
        Ok(self.lock().genre_by_name(name))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>> {
        Ok(self.lock().genres.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Genre> {
        Ok(self.lock().insert_genre(name))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.lock().delete_genre(id)
    }

    async fn remove(&self, genre: &Genre) -> Result<()> {
        self.lock().delete_genre(genre.id)
    }

    async fn find_or_create(&self, name: &str) -> Result<Genre> {
        let mut tables = self.lock();
        match tables.genre_by_name(name) {
            Some(genre) => Ok(genre),
            None => Ok(tables.insert_genre(name)),
        }
    }
}

#[async_trait]
impl MovieStore for MemoryCatalog {
    async fn find_and_count(&self, skip: i64, take: i64) -> Result<(Vec<Movie>, u64)> {
        let tables = self.lock();
        let movies = tables
            .movies
            .values()
            .skip(usize::try_from(skip)?)
            .take(usize::try_from(take)?)
            .map(|row| tables.movie(row))
            .collect();
        Ok((movies, tables.movies.len() as u64))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>> {
        let tables = self.lock();
        Ok(tables.movies.get(&id).map(|row| tables.movie(row)))
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie> {
        let mut tables = self.lock();
        let id = tables.last_movie_id + 1;
        tables.replace_links(id, &movie.genres)?;
        tables.last_movie_id = id;

        let row = MovieRow {
            id,
            title: movie.title,
            description: movie.description,
            release_date: movie.release_date,
        };
        tables.movies.insert(id, row.clone());
        Ok(tables.movie(&row))
    }

    async fn save(&self, movie: &Movie) -> Result<Movie> {
        let mut tables = self.lock();
        tables.replace_links(movie.id, &movie.genres)?;

        let row = MovieRow {
            id: movie.id,
            title: movie.title.clone(),
            description: movie.description.clone(),
            release_date: movie.release_date,
        };
        tables.movies.insert(movie.id, row.clone());
        tables.last_movie_id = tables.last_movie_id.max(movie.id);
        Ok(tables.movie(&row))
    }

    async fn remove(&self, movie: &Movie) -> Result<()> {
        let mut tables = self.lock();
        tables.movies.remove(&movie.id);
        tables.links.retain(|&(m, _)| m != movie.id);
        Ok(())
    }

    async fn query_by_search(&self, criteria: &MovieSearch) -> Result<Vec<Movie>> {
        let tables = self.lock();
        let movies = tables
            .movies
            .values()
            .map(|row| tables.movie(row))
            .filter(|movie| {
                criteria
                    .title
                    .as_deref()
                    .is_none_or(|title| movie.title.contains(title))
            })
            .filter(|movie| {
                criteria
                    .genre
                    .as_deref()
                    .is_none_or(|genre| movie.genres.iter().any(|g| g.name.contains(genre)))
            })
            .collect();
        Ok(movies)
    }

    async fn unlink_genre_from_all_movies(&self, genre: &Genre) -> Result<u64> {
        let mut tables = self.lock();
        let before = tables.links.len();
        tables.links.retain(|&(_, g)| g != genre.id);
        Ok((before - tables.links.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn links_to_missing_genres_are_rejected() {
        let catalog = MemoryCatalog::new();
        let ghost = Genre { id: 99, name: "Ghost".into() };

        let result = MovieStore::create(
            &catalog,
            NewMovie {
                title: "Casper".into(),
                description: String::new(),
                release_date: date!(1995 - 05 - 26),
                genres: vec![ghost],
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(MovieStore::find_and_count(&catalog, 0, 10).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn find_by_name_prefers_the_oldest_row() {
        let catalog = MemoryCatalog::new();
        let first = GenreStore::create(&catalog, "Drama").await.unwrap();
        GenreStore::create(&catalog, "Drama").await.unwrap();

        let found = catalog.find_by_name("Drama").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }
}
