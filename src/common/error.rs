use axum::http::StatusCode;
use validator::ValidationErrors;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::BadRequest(_) | CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", err.code),
                })
            })
            .collect();
        messages.sort();
        CatalogError::Validation(messages.join(", "))
    }
}
