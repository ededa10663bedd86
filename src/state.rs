use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::modules::genre::repository::GenreStore;
use crate::modules::genre::service::GenreService;
use crate::modules::movie::repository::MovieStore;
use crate::modules::movie::service::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub genres: GenreService,
    pub movies: MovieService,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        genre_store: Arc<dyn GenreStore>,
        movie_store: Arc<dyn MovieStore>,
    ) -> Self {
        let genres = GenreService::new(genre_store);
        let movies = MovieService::new(movie_store, genres.clone(), config.max_page_limit);

        Self { genres, movies }
    }
}
