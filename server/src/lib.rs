use anyhow::Result;
use axum::{extract::{Query, State}, http::StatusCode, response::Html, routing::get, Router};
use catalog::KeywordSearch;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use std::path::Path;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const PAGE_TITLE: &str = "Smart Course Search Tool";
pub const PAGE_DESCRIPTION: &str = "Enter a keyword to find relevant free courses on Analytics Vidhya.";
pub const INPUT_LABEL: &str = "Search for Courses";

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub search: KeywordSearch,
}

pub fn build_app<P: AsRef<Path>>(data_path: P) -> Result<Router> {
    let search = KeywordSearch::new(data_path);
    // Queries re-read the file; this load only makes a missing or broken file fatal at startup.
    let courses = search.load_courses()?;
    tracing::info!(path = %search.path().display(), courses = courses.len(), "course data available");
    let app_state = AppState { search };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(page_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// Result fragment only: text in, HTML out.
pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Html<String>, (StatusCode, String)> {
    state.search.find_courses(&params.q).map(Html).map_err(internal)
}

/// The search form, with results below it once a query was submitted.
pub async fn page_handler(State(state): State<AppState>, Query(params): Query<PageParams>) -> Result<Html<String>, (StatusCode, String)> {
    let results = match &params.q {
        Some(q) => state.search.find_courses(q).map_err(internal)?,
        None => String::new(),
    };
    Ok(Html(render_page(params.q.as_deref().unwrap_or(""), &results)))
}

fn internal(err: catalog::CatalogError) -> (StatusCode, String) {
    tracing::error!(%err, "keyword search failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub fn render_page(query: &str, results: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<form method="get" action="/">
<label for="q">{label}</label>
<input id="q" name="q" type="text" value="{query}">
<button type="submit">Submit</button>
</form>
<div id="results">{results}</div>
</body>
</html>
"#,
        title = encode_text(PAGE_TITLE),
        description = encode_text(PAGE_DESCRIPTION),
        label = encode_text(INPUT_LABEL),
        query = encode_double_quoted_attribute(query),
    )
}
