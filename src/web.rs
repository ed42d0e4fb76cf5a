//! Embedded single-page UI.
//!
//! The browser client is compiled into the binary with `include_str!` and
//! served from `/`, so the tool runs as one self-contained executable.

use axum::Router;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;

const INDEX_HTML: &str = include_str!("web/assets/index.html");
const APP_JS: &str = include_str!("web/assets/app.js");
const STYLE_CSS: &str = include_str!("web/assets/style.css");

/// Routes for the UI shell and its static assets.
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/app.js", get(app_js))
        .route("/assets/style.css", get(style_css))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_embedded() {
        assert!(INDEX_HTML.contains("PG Studio"));
        assert!(INDEX_HTML.contains("/assets/app.js"));
        assert!(INDEX_HTML.contains("/assets/style.css"));
        assert!(APP_JS.contains("pg-studio-query-history"));
        assert!(!STYLE_CSS.is_empty());
    }

    #[test]
    fn test_router_builds() {
        let _ = router();
    }
}
