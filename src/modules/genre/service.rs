use super::dto::CreateGenreRequest;
use super::model::Genre;
use super::repository::GenreStore;
use crate::common::error::{CatalogError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// The movie side of a genre deletion: drops every link to `genre` without
/// touching movie or genre rows.
#[async_trait]
pub trait GenreDetach: Send + Sync {
    async fn remove_genre_from_movies(&self, genre: &Genre) -> Result<()>;
}

#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn GenreStore>,
}

impl GenreService {
    pub fn new(store: Arc<dyn GenreStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Genre>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Genre> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Genre not found".to_string()))
    }

    /// Inserts a genre without looking for an existing one of the same name.
    pub async fn create(&self, req: CreateGenreRequest) -> Result<Genre> {
        let genre = self.store.create(&req.name).await?;
        info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    /// Resolves each name to its genre row, creating the missing ones.
    ///
    /// The result lines up with `names`; repeated names resolve to the same row.
    pub async fn create_multiple(&self, names: &[String]) -> Result<Vec<Genre>> {
        let mut genres = Vec::with_capacity(names.len());

        for name in names {
            let genre = self.store.find_or_create(name).await?;
            debug!("Resolved genre '{}' to {}", name, genre.id);
            genres.push(genre);
        }

        Ok(genres)
    }

    /// Deletes a genre after `movies` has unlinked it everywhere.
    pub async fn delete_genre(&self, id: i32, movies: &dyn GenreDetach) -> Result<()> {
        let genre = self.find_by_id(id).await?;

        movies.remove_genre_from_movies(&genre).await?;
        self.store.remove(&genre).await?;

        info!("Deleted genre {} ({})", genre.id, genre.name);
        Ok(())
    }
}
