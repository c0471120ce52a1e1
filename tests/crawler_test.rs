use serde_json::json;
use sqlx::postgres::PgPoolOptions;

use jobstivo_backend::services::crawler_service::CrawlerService;
use jobstivo_backend::services::job_search_service::{normalize_job, JobSearchService};

/// Requires a live Postgres; skipped when DATABASE_URL is not set.
#[tokio::test]
async fn upsert_is_idempotent_per_apply_link() {
    dotenvy::dotenv().ok();
    let Ok(db_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let search = JobSearchService::new(
        Vec::new(),
        "http://127.0.0.1:9".to_string(),
        "jsearch.p.rapidapi.com".to_string(),
        reqwest::Client::new(),
    );
    let crawler = CrawlerService::new(pool.clone(), search);

    let apply_link = format!("https://example.com/jobs/{}", uuid::Uuid::new_v4());
    let mut job = normalize_job(&json!({
        "job_title": "Engineer",
        "employer_name": "Acme",
        "job_apply_link": apply_link,
    }));

    assert_eq!(crawler.store_postings(std::slice::from_ref(&job)).await, 1);

    // Second upsert with the same apply link must overwrite, not duplicate.
    job.title = "Senior Engineer".to_string();
    assert_eq!(crawler.store_postings(std::slice::from_ref(&job)).await, 1);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM scraped_jobs WHERE apply_link = $1")
            .bind(&apply_link)
            .fetch_one(&pool)
            .await
            .expect("count");
    assert_eq!(count, 1);

    let (title,): (String,) =
        sqlx::query_as("SELECT title FROM scraped_jobs WHERE apply_link = $1")
            .bind(&apply_link)
            .fetch_one(&pool)
            .await
            .expect("title");
    assert_eq!(title, "Senior Engineer");

    let recent = crawler.list_recent(200).await.expect("list recent");
    assert!(recent.iter().any(|j| j.apply_link == apply_link));

    sqlx::query("DELETE FROM scraped_jobs WHERE apply_link = $1")
        .bind(&apply_link)
        .execute(&pool)
        .await
        .expect("cleanup");
}
