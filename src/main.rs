use axum::{
    routing::{get, post},
    Router,
};
use jobstivo_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let jobs_api = Router::new()
        .route("/api/jobs/search", get(routes::jobs::search_jobs))
        .route("/api/jobs/crawl", post(routes::jobs::crawl_jobs))
        .route("/api/jobs/scraped", get(routes::jobs::list_scraped_jobs))
        .route("/api/cv/generate", post(routes::cv::generate_cv))
        .route("/api/cv/improve", post(routes::cv::improve_cv))
        .route("/api/cv/tailor", post(routes::cv::tailor_application))
        .layer(axum::middleware::from_fn_with_state(
            jobstivo_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            jobstivo_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(jobs_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
