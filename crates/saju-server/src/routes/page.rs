//! Page Routes - The single-page UI

use axum::{response::Html, routing::get, Router};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Form, report renderer, history and Kakao login/share
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
