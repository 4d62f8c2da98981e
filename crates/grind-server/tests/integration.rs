use axum::http::StatusCode;
use grind_core::config::Config;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router wired against a mockito game API and a throwaway database.
fn build_app(api_url: &str, dir: &TempDir) -> axum::Router {
    let config = Config {
        api_url: api_url.to_string(),
        api_token: "test-token".to_string(),
        db_path: dir.path().join("grind.redb"),
        port: 0,
    };
    grind_server::build_router(&config).unwrap()
}

fn character_json(name: &str, x: i32, y: i32) -> String {
    format!(
        r#"{{"name": "{name}", "hp": 100, "max_hp": 100, "level": 2,
             "gold": 10, "x": {x}, "y": {y},
             "cooldown_expiration": "2099-01-01T00:00:00Z"}}"#
    )
}

fn envelope(inner: &str) -> String {
    format!(r#"{{"data": {inner}}}"#)
}

fn action_envelope(character: &str) -> String {
    format!(r#"{{"data": {{"cooldown": {{"total_seconds": 5}}, "character": {character}}}}}"#)
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    request(app, "GET", uri, None).await
}

// ---------------------------------------------------------------------------
// Routines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_routine_returns_404_when_absent() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = get(app, "/api/routines/Hero1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("Hero1"));
}

#[tokio::test]
async fn put_gather_routine_persists_record_and_acts_once() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/characters/Hero1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(&character_json("Hero1", 0, 0)))
        .create_async()
        .await;
    server
        .mock("GET", "/maps")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [{"x": 3, "y": 4, "content": {"type": "resource", "code": "copper_rocks"}}],
                "page": 1, "pages": 1}"#,
        )
        .create_async()
        .await;
    let move_mock = server
        .mock("POST", "/my/Hero1/action/move")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(action_envelope(&character_json("Hero1", 3, 4)))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = request(
        app.clone(),
        "PUT",
        "/api/routines/Hero1",
        Some(serde_json::json!({"type": "gather", "resource": "copper"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["routine"], "gather");
    assert_eq!(json["character"], "Hero1");
    move_mock.assert_async().await;

    let (status, json) = get(app, "/api/routines/Hero1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["request"]["resource"], "copper");
}

#[tokio::test]
async fn delete_routine_cancels_and_reports_absence() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/characters/Hero1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(&character_json("Hero1", 3, 4)))
        .create_async()
        .await;
    server
        .mock("GET", "/maps")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": [{"x": 3, "y": 4, "content": {"type": "resource", "code": "ash_tree"}}],
                "page": 1, "pages": 1}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/my/Hero1/action/gathering")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(action_envelope(&character_json("Hero1", 3, 4)))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, _) = request(
        app.clone(),
        "PUT",
        "/api/routines/Hero1",
        Some(serde_json::json!({"type": "gather", "resource": "ash_tree", "duration": 600})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = request(app.clone(), "DELETE", "/api/routines/Hero1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cancelled"], true);

    let (status, _) = get(app.clone(), "/api/routines/Hero1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = request(app, "DELETE", "/api/routines/Hero1", None).await;
    assert_eq!(json["cancelled"], false);
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_character_serves_store_after_first_fetch() {
    let mut server = mockito::Server::new_async().await;
    let fetch = server
        .mock("GET", "/characters/Bob")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(&character_json("Bob", 1, 2)))
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = get(app.clone(), "/api/characters/Bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Bob");
    assert_eq!(json["x"], 1);

    let (status, _) = get(app, "/api/characters/Bob").await;
    assert_eq!(status, StatusCode::OK);
    fetch.assert_async().await;
}

#[tokio::test]
async fn missing_character_maps_to_404() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/characters/Ghost")
        .with_status(404)
        .with_body(r#"{"error": {"message": "not found"}}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, _) = get(app, "/api/characters/Ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn manual_move_proxies_and_persists() {
    let mut server = mockito::Server::new_async().await;
    let move_mock = server
        .mock("POST", "/my/Bob/action/move")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(action_envelope(&character_json("Bob", 5, 6)))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = request(
        app.clone(),
        "POST",
        "/api/characters/Bob/move",
        Some(serde_json::json!({"x": 5, "y": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["x"], 5);
    move_mock.assert_async().await;

    // The moved state was persisted: reading it hits no remote endpoint.
    let (status, json) = get(app, "/api/characters/Bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["y"], 6);
}

#[tokio::test]
async fn manual_fight_at_full_hp_schedules_no_rest() {
    let mut server = mockito::Server::new_async().await;
    let fight_mock = server
        .mock("POST", "/my/Bob/action/fight")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(action_envelope(&character_json("Bob", 0, 0)))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = request(app, "POST", "/api/characters/Bob/fight", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hp"], 100);
    fight_mock.assert_async().await;
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn map_tile_passes_through() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/maps/3/4")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"x": 3, "y": 4, "content": {"type": "resource", "code": "copper_rocks"}}}"#,
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = build_app(&server.url(), &dir);

    let (status, json) = get(app, "/api/maps/3/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"]["code"], "copper_rocks");
}
