// API flow tests - end-to-end requests against a file-backed store

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use zoo_api::{create_router, AppState, ResourceKind, Store};

struct TestServer {
    app: Router,
    store: Store,
    // Keeps the database directory alive for the test's duration
    _dir: TempDir,
}

impl TestServer {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data").join("lambda.sqlite3")).unwrap();
        let app = create_router(AppState::new(store.clone()));
        Self {
            app,
            store,
            _dir: dir,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

#[tokio::test]
async fn test_metro_zoo_lifecycle() {
    let server = TestServer::new();

    let (status, body) = server
        .request(Method::POST, "/api/zoos", Some(json!({"name": "Metro Zoo"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Metro Zoo"}));

    let (status, body) = server.request(Method::GET, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Metro Zoo"}));

    let (status, body) = server.request(Method::DELETE, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Zoo data successfully deleted."}));

    let (status, body) = server.request(Method::GET, "/api/zoos/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "There is no zoo with that ID."}));
}

#[tokio::test]
async fn test_created_names_read_back_exactly() {
    let server = TestServer::new();

    for name in ["Grizzly", "  spaced  ", "Ours brun 🐻", "O'Brien \"Big\" Bear"] {
        let (status, created) = server
            .request(Method::POST, "/api/bears", Some(json!({"name": name})))
            .await;
        assert_eq!(status, StatusCode::OK);

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = server
            .request(Method::GET, &format!("/api/bears/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], name);
    }
}

#[tokio::test]
async fn test_invalid_creates_never_persist() {
    let server = TestServer::new();

    for body in [json!({}), json!({"name": ""}), json!({"name": null}), json!({"title": "x"})] {
        let (status, _) = server.request(Method::POST, "/api/zoos", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = server.request(Method::GET, "/api/zoos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(server.store.count(ResourceKind::Zoos).unwrap(), 0);
}

#[tokio::test]
async fn test_update_then_read() {
    let server = TestServer::new();
    server
        .request(Method::POST, "/api/bears", Some(json!({"name": "Yogi"})))
        .await;

    let (status, body) = server
        .request(Method::PUT, "/api/bears/1", Some(json!({"name": "Boo-Boo"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Bear data successfully updated."}));

    let (_, body) = server.request(Method::GET, "/api/bears/1", None).await;
    assert_eq!(body, json!({"id": 1, "name": "Boo-Boo"}));
}

#[tokio::test]
async fn test_rejected_update_leaves_record() {
    let server = TestServer::new();
    server
        .request(Method::POST, "/api/zoos", Some(json!({"name": "City Zoo"})))
        .await;

    let (status, _) = server
        .request(Method::PUT, "/api/zoos/1", Some(json!({"name": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.request(Method::GET, "/api/zoos/1", None).await;
    assert_eq!(body, json!({"id": 1, "name": "City Zoo"}));
}

#[tokio::test]
async fn test_never_created_ids_are_404() {
    let server = TestServer::new();

    for kind in ResourceKind::ALL {
        let uri = format!("{}/404", kind.collection_path());
        let (status, body) = server.request(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": kind.not_found()}));

        let (status, _) = server.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lambda.sqlite3");

    {
        let store = Store::open(&path).unwrap();
        let app = create_router(AppState::new(store));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/zoos")
            .body(Body::from(r#"{"name":"Metro Zoo"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let store = Store::open(&path).unwrap();
    let zoo = store.get(ResourceKind::Zoos, 1).unwrap().unwrap();
    assert_eq!(zoo.name, "Metro Zoo");
}
