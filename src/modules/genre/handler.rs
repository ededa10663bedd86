use super::dto::CreateGenreRequest;
use super::model::Genre;
use crate::common::error::CatalogError;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// List all genres
#[utoipa::path(
    get,
    path = "/api/v1/genres",
    responses(
        (status = 200, description = "List of genres", body = ApiResponse<Vec<Genre>>)
    ),
    tag = "Genres"
)]
pub async fn list_genres(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    match state.genres.find_all().await {
        Ok(genres) => ApiSuccess(
            ApiResponse::success(genres, "Genres retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

/// Create a new genre
#[utoipa::path(
    post,
    path = "/api/v1/genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created", body = ApiResponse<Genre>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateGenreRequest>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return ApiError::new(CatalogError::Validation(rejection.body_text()), &uri)
                .into_response();
        }
    };

    if let Err(e) = payload.validate() {
        return ApiError::new(e.into(), &uri).into_response();
    }

    match state.genres.create(payload).await {
        Ok(genre) => ApiSuccess(
            ApiResponse::success(genre, "Genre created successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/api/v1/genres/{id}",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details", body = ApiResponse<Genre>),
        (status = 404, description = "Genre not found")
    ),
    tag = "Genres"
)]
pub async fn get_genre(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.genres.find_by_id(id).await {
        Ok(genre) => ApiSuccess(
            ApiResponse::success(genre, "Genre retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}

/// Delete genre, unlinking it from every movie first
#[utoipa::path(
    delete,
    path = "/api/v1/genres/{id}",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre deleted"),
        (status = 404, description = "Genre not found")
    ),
    tag = "Genres"
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.genres.delete_genre(id, &state.movies).await {
        Ok(_) => ApiSuccess(
            ApiResponse::success((), "Genre deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::new(e, &uri).into_response(),
    }
}
