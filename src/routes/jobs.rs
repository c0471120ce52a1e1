use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::job_dto::{
        CrawlPayload, CrawlResponse, JobSearchQuery, JobSearchResponse, ScrapedJobsQuery,
        ScrapedJobsResponse,
    },
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/search",
    params(
        ("q" = String, Query, description = "Free-text search query"),
        ("location" = Option<String>, Query, description = "Optional location filter"),
        ("page" = Option<u32>, Query, description = "Result page, defaults to 1")
    ),
    responses(
        (status = 200, description = "Normalized job postings with provenance metadata"),
        (status = 500, description = "No API keys configured"),
        (status = 502, description = "All API keys exhausted")
    )
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<impl IntoResponse> {
    if query.q.trim().is_empty() {
        return Err(Error::BadRequest("Search query must not be empty".into()));
    }
    let page = query.page.unwrap_or(1).max(1);
    let outcome = state
        .job_search_service
        .search(&query.q, query.location.as_deref(), page)
        .await?;
    Ok(Json(JobSearchResponse::from(outcome)))
}

#[utoipa::path(
    post,
    path = "/api/jobs/crawl",
    request_body = CrawlPayload,
    responses(
        (status = 200, description = "Crawl completed, postings upserted"),
        (status = 400, description = "Invalid payload"),
        (status = 502, description = "All API keys exhausted")
    )
)]
#[axum::debug_handler]
pub async fn crawl_jobs(
    State(state): State<AppState>,
    Json(payload): Json<CrawlPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let summary = state
        .crawler_service
        .fetch_and_store(&payload.query, payload.location.as_deref())
        .await?;
    Ok(Json(CrawlResponse::from(summary)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/scraped",
    params(
        ("limit" = Option<i64>, Query, description = "Number of postings to return")
    ),
    responses(
        (status = 200, description = "Stored postings, newest first")
    )
)]
#[axum::debug_handler]
pub async fn list_scraped_jobs(
    State(state): State<AppState>,
    Query(query): Query<ScrapedJobsQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let jobs = state.crawler_service.list_recent(limit).await?;
    Ok(Json(ScrapedJobsResponse {
        success: true,
        jobs,
    }))
}
