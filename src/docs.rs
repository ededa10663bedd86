use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Movie Catalog API", description = "Movies, genres and the links between them"),
    paths(
        crate::modules::genre::handler::list_genres,
        crate::modules::genre::handler::create_genre,
        crate::modules::genre::handler::get_genre,
        crate::modules::genre::handler::delete_genre,
        crate::modules::movie::handler::list_movies,
        crate::modules::movie::handler::search_movies,
        crate::modules::movie::handler::get_movie,
        crate::modules::movie::handler::create_movie,
        crate::modules::movie::handler::update_movie,
        crate::modules::movie::handler::delete_movie,
    ),
    components(
        schemas(
            crate::modules::genre::model::Genre,
            crate::modules::genre::dto::CreateGenreRequest,
            crate::modules::movie::model::Movie,
            crate::modules::movie::dto::CreateMovieRequest,
            crate::modules::movie::dto::UpdateMovieRequest,
            crate::modules::movie::dto::MovieListResponse,
        )
    ),
    tags(
        (name = "Genres", description = "Genre management"),
        (name = "Movies", description = "Movie catalog")
    )
)]
pub struct ApiDoc;
