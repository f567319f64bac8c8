//! Static hosting for the built single-page application.
//!
//! Files under the build directory are served with a one-year cache lifetime. Any other path
//! that is not under `/api/` and has no file extension gets `index.html`, so deep links into
//! client-side routes load the application.

use crate::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

pub const STATIC_CACHE_CONTROL: &str = "public, max-age=31536000";

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn names_a_file(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}

pub(crate) async fn serve_spa(State(state): State<AppState>, req: Request) -> Response {
    let path = req.uri().path().to_owned();
    if is_api_path(&path) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let response = ServeDir::new(state.site.dist_dir())
        .oneshot(req)
        .await
        .unwrap_or_else(|never| match never {});

    if response.status() != StatusCode::NOT_FOUND || names_a_file(&path) {
        let mut response = response.map(Body::new);
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(STATIC_CACHE_CONTROL));
        }
        return response;
    }

    tracing::debug!(path, "serving index.html for client-side route");
    ServeFile::new(state.site.index_html())
        .oneshot(Request::new(Body::empty()))
        .await
        .unwrap_or_else(|never| match never {})
        .map(Body::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_never_fall_back() {
        assert!(is_api_path("/api/site/doctors"));
        assert!(is_api_path("/api"));
        assert!(!is_api_path("/apis"));
        assert!(!is_api_path("/doctors/12"));
    }

    #[test]
    fn test_file_detection_uses_last_segment() {
        assert!(names_a_file("/assets/main.3f2a.js"));
        assert!(!names_a_file("/blog/dr.-mehta-interview/comments"));
        assert!(!names_a_file("/treatments/cardiac-surgery"));
    }
}
