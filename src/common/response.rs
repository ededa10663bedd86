use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::common::error::CatalogError;

#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
            timestamp: None,
            path: None,
        }
    }

    pub fn error(message: &str, path: &str) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        Self {
            status: "error".to_string(),
            message: message.to_string(),
            data: None,
            timestamp: Some(timestamp),
            path: Some(path.to_string()),
        }
    }
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<ApiResponse<T>>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (response, status) = (self.0, self.1);
        (status, Json(response)).into_response()
    }
}

pub struct ApiError {
    pub message: String,
    pub status: StatusCode,
    pub path: String,
}

impl ApiError {
    /// `uri` is reported with its query string, as the client sent it.
    pub fn new(err: CatalogError, uri: &Uri) -> Self {
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path(), |pq| pq.as_str());
        let status = err.status_code();
        let message = match &err {
            CatalogError::Storage(e) => {
                tracing::error!("{} failed: {:#}", path, e);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        Self {
            message,
            status,
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = ApiResponse::<()>::error(&self.message, &self.path);
        (self.status, Json(response)).into_response()
    }
}
