use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

/// `GET /`
pub async fn serve_index() -> Response {
    response_for_file("index.html").unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

/// `GET /static/{*path}`
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let requested = path.trim_start_matches('/');

    if requested.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    if requested.contains("..") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    response_for_file(requested).unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

fn response_for_file(path: &str) -> Option<Response> {
    let file = StaticAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let mut response = Response::new(Body::from(file.data.into_owned()));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref()).ok()?,
    );
    Some(response)
}
