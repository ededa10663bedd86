use axum::{
    extract::Request,
    http::{Method, Uri},
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Renders a request as `[GET]: '/api/v1/movies' page=2 & limit=5`.
pub fn describe_request(method: &Method, uri: &Uri) -> String {
    let params = uri
        .query()
        .map(|query| {
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .unwrap_or_default();

    format!("[{}]: '{}' {}", method, uri.path(), params)
        .trim_end()
        .to_string()
}

pub async fn log_request(req: Request, next: Next) -> Response {
    info!("{}", describe_request(req.method(), req.uri()));
    next.run(req).await
}
