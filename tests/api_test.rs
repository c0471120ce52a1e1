use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

async fn spawn_provider_stub() -> String {
    let app = Router::new().route(
        "/search",
        get(|| async {
            axum::Json(json!({"data": [
                {"job_title": "Platform Engineer", "employer_name": "Acme"},
            ]}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn search_endpoint_returns_normalized_jobs_with_provenance() {
    let base_url = spawn_provider_stub().await;

    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost:5432/jobstivo_test");
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("PUBLIC_RPS", "100");
    env::set_var("RAPIDAPI_KEY", "test-key-1");
    env::set_var("RAPIDAPI_KEY_2", "test-key-2");
    env::set_var("JSEARCH_BASE_URL", &base_url);

    jobstivo_backend::config::init_config().expect("init config");

    // Lazy pool: the search path never touches the database.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/jobstivo_test")
        .expect("lazy pool");
    let app_state = jobstivo_backend::AppState::new(pool);

    let app = Router::new()
        .route(
            "/api/jobs/search",
            get(jobstivo_backend::routes::jobs::search_jobs),
        )
        .with_state(app_state);

    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs/search?q=engineer&location=Berlin")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("JSearch API"));
    assert_eq!(body["key_used"], json!(1));
    assert_eq!(body["total_keys"], json!(2));
    assert_eq!(body["jobs"].as_array().map(|j| j.len()), Some(1));
    assert_eq!(body["jobs"][0]["title"], json!("Platform Engineer"));
    assert_eq!(body["jobs"][0]["location"], json!("Remote"));

    // Blank query is rejected before any provider call.
    let req = Request::builder()
        .method("GET")
        .uri("/api/jobs/search?q=%20")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rate_limiter_rejects_requests_past_the_window() {
    let app = Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(axum::middleware::from_fn_with_state(
            jobstivo_backend::middleware::rate_limit::new_rps_state(1),
            jobstivo_backend::middleware::rate_limit::rps_middleware,
        ));

    let req = Request::builder()
        .uri("/ping")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .uri("/ping")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = Router::new().route("/health", get(jobstivo_backend::routes::health::health));
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
