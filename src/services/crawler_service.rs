use sqlx::PgPool;
use tracing::{error, info};

use crate::error::Result;
use crate::models::scraped_job::ScrapedJob;
use crate::services::job_search_service::{JobPosting, JobSearchService};

#[derive(Debug, Clone, serde::Serialize)]
pub struct CrawlSummary {
    pub count: usize,
    pub key_used: usize,
    pub total_keys: usize,
}

/// Background crawl path: fetch, normalize, and idempotently store postings.
/// The interactive search path bypasses this and returns records directly.
#[derive(Clone)]
pub struct CrawlerService {
    pool: PgPool,
    search: JobSearchService,
}

impl CrawlerService {
    pub fn new(pool: PgPool, search: JobSearchService) -> Self {
        Self { pool, search }
    }

    pub async fn fetch_and_store(&self, query: &str, location: Option<&str>) -> Result<CrawlSummary> {
        let outcome = self.search.search(query, location, 1).await?;
        let stored = self.store_postings(&outcome.jobs).await;

        info!(
            added = stored,
            key_used = outcome.key_used,
            "JSearch crawl completed"
        );

        Ok(CrawlSummary {
            count: stored,
            key_used: outcome.key_used,
            total_keys: outcome.total_keys,
        })
    }

    /// Upserts a batch keyed by apply link. One rejected write must not abort
    /// the batch; failures are logged per record and skipped.
    pub async fn store_postings(&self, jobs: &[JobPosting]) -> usize {
        let mut stored = 0usize;
        for job in jobs {
            match self.upsert_job(job).await {
                Ok(()) => stored += 1,
                Err(err) => error!(apply_link = %job.apply_link, error = ?err, "Error saving job"),
            }
        }
        stored
    }

    async fn upsert_job(&self, job: &JobPosting) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scraped_jobs (
                title, company, location, salary, description,
                apply_link, source, posted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (apply_link) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                salary = EXCLUDED.salary,
                description = EXCLUDED.description,
                source = EXCLUDED.source,
                posted_at = EXCLUDED.posted_at,
                updated_at = NOW()
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(&job.description)
        .bind(&job.apply_link)
        .bind(&job.source)
        .bind(job.posted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ScrapedJob>> {
        let jobs = sqlx::query_as::<_, ScrapedJob>(
            r#"
            SELECT id, title, company, location, salary, description,
                   apply_link, source, posted_at, created_at, updated_at
            FROM scraped_jobs
            ORDER BY posted_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}
