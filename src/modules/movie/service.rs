use super::dto::{CreateMovieRequest, MovieSearch, UpdateMovieRequest};
use super::model::{Movie, MoviePage, NewMovie};
use super::repository::MovieStore;
use crate::common::error::{CatalogError, Result};
use crate::modules::genre::model::Genre;
use crate::modules::genre::service::{GenreDetach, GenreService};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
    genres: GenreService,
    max_page_limit: u64,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>, genres: GenreService, max_page_limit: u64) -> Self {
        Self {
            store,
            genres,
            max_page_limit: max_page_limit.max(1),
        }
    }

    /// Lists one page of movies. Pages start at 1 and `limit` is capped at
    /// the configured maximum.
    pub async fn find_all(&self, page: u64, limit: u64) -> Result<MoviePage> {
        let page = page.max(1);
        let limit = limit.min(self.max_page_limit);
        let skip = (page - 1).saturating_mul(limit);

        let (movies, total) = self
            .store
            .find_and_count(
                i64::try_from(skip).unwrap_or(i64::MAX),
                i64::try_from(limit).unwrap_or(i64::MAX),
            )
            .await?;

        Ok(MoviePage {
            movies,
            total,
            page,
            limit,
        })
    }

    pub async fn search(&self, criteria: MovieSearch) -> Result<Vec<Movie>> {
        debug!(
            "Searching movies by title {:?} and genre {:?}",
            criteria.title, criteria.genre
        );
        Ok(self.store.query_by_search(&criteria).await?)
    }

    pub async fn find_one(&self, id: i32) -> Result<Movie> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Movie not found".to_string()))
    }

    /// Creates a movie, creating any genre named in the request that does not
    /// exist yet.
    pub async fn create(&self, req: CreateMovieRequest) -> Result<Movie> {
        let genres = self.genres.create_multiple(&req.genres).await?;

        let movie = self
            .store
            .create(NewMovie {
                title: req.title,
                description: req.description,
                release_date: req.release_date,
                genres,
            })
            .await?;

        info!("Created movie {} ({})", movie.id, movie.title);
        Ok(movie)
    }

    pub async fn update(&self, id: i32, req: UpdateMovieRequest) -> Result<Movie> {
        let mut movie = self.find_one(id).await?;

        if let Some(title) = req.title {
            movie.title = title;
        }
        if let Some(description) = req.description {
            movie.description = description;
        }
        if let Some(release_date) = req.release_date {
            movie.release_date = release_date;
        }
        if let Some(names) = req.genres {
            movie.genres = self.genres.create_multiple(&names).await?;
        }

        let movie = self.store.save(&movie).await?;
        info!("Updated movie {}", movie.id);
        Ok(movie)
    }

    pub async fn remove(&self, id: i32) -> Result<()> {
        let movie = self.find_one(id).await?;
        self.store.remove(&movie).await?;

        info!("Deleted movie {} ({})", movie.id, movie.title);
        Ok(())
    }

    pub async fn remove_genre_from_movies(&self, genre: &Genre) -> Result<()> {
        let unlinked = self.store.unlink_genre_from_all_movies(genre).await?;
        debug!("Unlinked genre {} from {} movies", genre.id, unlinked);
        Ok(())
    }
}

#[async_trait]
impl GenreDetach for MovieService {
    async fn remove_genre_from_movies(&self, genre: &Genre) -> Result<()> {
        MovieService::remove_genre_from_movies(self, genre).await
    }
}
