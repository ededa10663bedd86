use crate::common::error::CatalogError;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::movie::dto::*;
use crate::modules::movie::model::Movie;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/v1/movies",
    params(ListMoviesQuery),
    responses(
        (status = 200, description = "List Movies", body = ApiResponse<MovieListResponse>),
        (status = 400, description = "Invalid page or limit")
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListMoviesQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return ApiError::new(CatalogError::BadRequest(rejection.body_text()), &uri)
                .into_response();
        }
    };

    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 || limit < 1 {
        let err = CatalogError::BadRequest("page and limit must be at least 1".to_string());
        return ApiError::new(err, &uri).into_response();
    }

    match state.movies.find_all(page, limit).await {
        Ok(result) => {
            let total_pages = result.total_pages();
            let res = MovieListResponse {
                movies: result.movies,
                total: result.total,
                page: result.page,
                total_pages,
            };
            ApiSuccess(ApiResponse::success(res, "Movies retrieved successfully"), StatusCode::OK).into_response()
        }
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/movies/search",
    params(MovieSearch),
    responses(
        (status = 200, description = "Matching Movies", body = ApiResponse<Vec<Movie>>),
        (status = 400, description = "Neither title nor genre given")
    ),
    tag = "Movies"
)]
pub async fn search_movies(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<MovieSearch>, QueryRejection>,
) -> impl IntoResponse {
    let search = match query {
        Ok(Query(search)) => search,
        Err(rejection) => {
            return ApiError::new(CatalogError::BadRequest(rejection.body_text()), &uri)
                .into_response();
        }
    };

    let criteria = match search.into_filters() {
        Some(criteria) => criteria,
        None => {
            let err = CatalogError::BadRequest("Please provide title or genre".to_string());
            return ApiError::new(err, &uri).into_response();
        }
    };

    match state.movies.search(criteria).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Movies retrieved successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Get Movie", body = ApiResponse<Movie>),
        (status = 404, description = "Movie Not Found")
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.movies.find_one(id).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Movie retrieved successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie Created", body = ApiResponse<Movie>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiError::new(CatalogError::Validation(rejection.body_text()), &uri)
                .into_response();
        }
    };

    if let Err(e) = req.validate() {
        return ApiError::new(e.into(), &uri).into_response();
    }

    match state.movies.create(req).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Movie created successfully"), StatusCode::CREATED).into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = i32, Path, description = "Movie ID")
    ),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie Updated", body = ApiResponse<Movie>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Movie Not Found")
    ),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
    req: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return ApiError::new(CatalogError::Validation(rejection.body_text()), &uri)
                .into_response();
        }
    };

    if let Err(e) = req.validate() {
        return ApiError::new(e.into(), &uri).into_response();
    }

    match state.movies.update(id, req).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Movie updated successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie Deleted"),
        (status = 404, description = "Movie Not Found")
    ),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.movies.remove(id).await {
        Ok(_) => ApiSuccess(ApiResponse::success((), "Movie deleted successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}
