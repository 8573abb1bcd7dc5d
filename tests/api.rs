//! HTTP-level tests: the full router over the in-memory store.

use artecms::{app::build_app, memory::MemoryStore, state::AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(res: Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, email: &str) -> String {
    let res = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": email, "password": "long-enough-pw", "name": "Curator" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["access_token"].as_str().unwrap().to_string()
}

fn test_app() -> Router {
    build_app(AppState::fake())
}

// ---------------------------------------------------------------------------
// Films
// ---------------------------------------------------------------------------

#[tokio::test]
async fn film_lifecycle_through_the_api() {
    let app = test_app();
    let token = register(&app, "editor@arteeast.org").await;

    let res = send(
        &app,
        Method::POST,
        "/api/v1/films",
        Some(&token),
        Some(json!({
            "title": "Test",
            "description": "A sufficiently long description.",
            "status": "draft"
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    assert!(created["error"].is_null());
    assert_eq!(created["data"]["status"], "draft");
    assert_eq!(created["data"]["created_at"], created["data"]["updated_at"]);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let res = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/films/{id}"),
        Some(&token),
        Some(json!({ "status": "published" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(updated["data"]["status"], "published");
    assert_eq!(updated["data"]["title"], "Test");
    assert_eq!(updated["data"]["description"], "A sufficiently long description.");

    let res = send(&app, Method::DELETE, &format!("/api/v1/films/{id}"), Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "success": true, "error": null }));

    let res = send(&app, Method::GET, &format!("/api/v1/films/{id}"), None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert!(body["data"].is_null());
    assert_eq!(body["kind"], "not_found");

    let res = send(&app, Method::DELETE, &format!("/api/v1/films/{id}"), Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["success"], false);
}

#[tokio::test]
async fn mutations_require_a_token() {
    let app = test_app();
    let res = send(
        &app,
        Method::POST,
        "/api/v1/films",
        None,
        Some(json!({ "title": "Test", "description": "A sufficiently long description." })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(&app, Method::GET, "/api/v1/films", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "data": [], "error": null }));
}

#[tokio::test]
async fn invalid_film_form_is_rejected_with_field_messages() {
    let app = test_app();
    let token = register(&app, "editor@arteeast.org").await;

    let res = send(
        &app,
        Method::POST,
        "/api/v1/films",
        Some(&token),
        Some(json!({ "title": "ab", "description": "123456789" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["fields"]["title"], "Title must be at least 3 characters long");
    assert_eq!(
        body["fields"]["description"],
        "Description must be at least 10 characters long"
    );
}

#[tokio::test]
async fn list_supports_status_and_search_filters() {
    let app = test_app();
    let token = register(&app, "editor@arteeast.org").await;
    for (title, status) in [("Omar", "draft"), ("Caramel", "published"), ("Wadjda", "published")] {
        let res = send(
            &app,
            Method::POST,
            "/api/v1/films",
            Some(&token),
            Some(json!({ "title": title, "description": "Festival selection notes", "status": status })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = send(&app, Method::GET, "/api/v1/films?status=published", None, None).await;
    let titles: Vec<Value> = body_json(res).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Wadjda"), json!("Caramel")]);

    let res = send(&app, Method::GET, "/api/v1/films?q=OMAR", None, None).await;
    assert_eq!(body_json(res).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn patch_cannot_blank_the_title() {
    let app = test_app();
    let token = register(&app, "editor@arteeast.org").await;
    let res = send(
        &app,
        Method::POST,
        "/api/v1/films",
        Some(&token),
        Some(json!({ "title": "Omar", "description": "Festival selection notes" })),
    )
    .await;
    let id = body_json(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/films/{id}"),
        Some(&token),
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["kind"], "validation_failed");

    let res = send(&app, Method::GET, &format!("/api/v1/films/{id}"), None, None).await;
    assert_eq!(body_json(res).await["data"]["title"], "Omar");
}

// ---------------------------------------------------------------------------
// Malformed requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_uuid_film_id_renders_failure_envelope() {
    let app = test_app();
    let res = send(&app, Method::GET, "/api/v1/films/not-a-uuid", None, None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["data"].is_null());
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "bad_request");
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn malformed_json_body_renders_failure_envelope() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{email: nope"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["data"].is_null());
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn unknown_status_filter_renders_failure_envelope() {
    let app = test_app();
    let res = send(&app, Method::GET, "/api/v1/films?status=archived", None, None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["kind"], "bad_request");
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_upsert_is_idempotent() {
    let app = test_app();
    let token = register(&app, "editor@arteeast.org").await;

    for _ in 0..2 {
        let res = send(
            &app,
            Method::PUT,
            "/api/v1/content/homepage_subtitle",
            Some(&token),
            Some(json!({ "content": "Films from the region" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = send(&app, Method::GET, "/api/v1/content", None, None).await;
    let all = body_json(res).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
    assert_eq!(all["data"][0]["content"], "Films from the region");

    let res = send(&app, Method::GET, "/api/v1/homepage", None, None).await;
    let page = body_json(res).await;
    assert_eq!(page["data"]["homepage_subtitle"], "Films from the region");
    assert!(page["data"]["homepage_description"].is_string());
}

#[tokio::test]
async fn unknown_content_key_is_not_found() {
    let app = test_app();
    let res = send(&app, Method::GET, "/api/v1/content/nope", None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_content_table_is_surfaced_but_homepage_still_renders() {
    let app = build_app(AppState::fake_with(MemoryStore::without_content_table()));

    let res = send(&app, Method::GET, "/api/v1/content/homepage_subtitle", None, None).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(res).await["kind"], "schema_missing");

    let res = send(&app, Method::GET, "/api/v1/homepage", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await["data"]["homepage_subtitle"],
        "Contemporary arts from the Middle East and North Africa"
    );
}

// ---------------------------------------------------------------------------
// Auth and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_refresh_and_me() {
    let app = test_app();
    register(&app, "editor@arteeast.org").await;

    let res = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "Editor@ArteEast.org ", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "Editor@ArteEast.org ", "password": "long-enough-pw" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let session = body_json(res).await;
    assert_eq!(session["user"]["name"], "Curator");
    let refresh_token = session["refresh_token"].as_str().unwrap().to_string();

    let res = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let refreshed = body_json(res).await;

    let token = refreshed["access_token"].as_str().unwrap();
    let res = send(&app, Method::GET, "/api/v1/me", Some(token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["email"], "editor@arteeast.org");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    register(&app, "editor@arteeast.org").await;
    let res = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "editor@arteeast.org", "password": "long-enough-pw" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let app = test_app();
    let res = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "editor@arteeast.org", "password": "long-enough-pw" })),
    )
    .await;
    let refresh = body_json(res).await["refresh_token"].as_str().unwrap().to_string();

    let res = send(&app, Method::GET, "/api/v1/me", Some(&refresh), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_film_count() {
    let app = test_app();
    let res = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
}
