use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::fs;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn write_tiny_corpus() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("courses_data.json");
    fs::write(
        &path,
        r#"[
            {"title":"Intro to Python","description":"Learn Python basics","link":"https://x/1"},
            {"title":"Advanced SQL","description":"Deep dive into SQL","link":"https://x/2"}
        ]"#,
    )
    .unwrap();
    (dir, path)
}

async fn call(app: Router, uri: &str) -> (StatusCode, String) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body: Bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn search_returns_matching_fragments() {
    let (_dir, path) = write_tiny_corpus();
    let app = server::build_app(&path).unwrap();

    let (status, body) = call(app.clone(), "/search?q=python").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h3>Intro to Python</h3><p>Learn Python basics</p><a href='https://x/1'>Link to Course</a><br>");

    let (_, body) = call(app.clone(), "/search?q=SQL").await;
    assert!(body.contains("Advanced SQL"));
    assert!(!body.contains("Intro to Python"));

    let (_, body) = call(app, "/search?q=zzz").await;
    assert_eq!(body, "<p>No courses found with that keyword.</p>");
}

#[tokio::test]
async fn page_renders_form_and_results() {
    let (_dir, path) = write_tiny_corpus();
    let app = server::build_app(&path).unwrap();

    let (status, body) = call(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(server::PAGE_TITLE));
    assert!(body.contains(server::INPUT_LABEL));
    assert!(!body.contains("<h3>"));

    let (_, body) = call(app, "/?q=deep").await;
    assert!(body.contains("<h3>Advanced SQL</h3>"));
    assert!(body.contains("value=\"deep\""));
}

#[tokio::test]
async fn missing_data_file_fails_startup() {
    let dir = tempdir().unwrap();
    assert!(server::build_app(dir.path().join("absent.json")).is_err());
}

#[tokio::test]
async fn file_removed_after_startup_is_a_server_error() {
    let (_dir, path) = write_tiny_corpus();
    let app = server::build_app(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let (status, _) = call(app, "/search?q=python").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
