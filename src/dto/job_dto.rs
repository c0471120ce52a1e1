use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::scraped_job::ScrapedJob;
use crate::services::crawler_service::CrawlSummary;
use crate::services::job_search_service::{JobPosting, SearchSuccess, PROVIDER_NAME};

#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchQuery {
    pub q: String,
    pub location: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSearchResponse {
    pub success: bool,
    pub jobs: Vec<JobPosting>,
    pub source: String,
    pub key_used: usize,
    pub total_keys: usize,
}

impl From<SearchSuccess> for JobSearchResponse {
    fn from(outcome: SearchSuccess) -> Self {
        Self {
            success: true,
            jobs: outcome.jobs,
            source: PROVIDER_NAME.to_string(),
            key_used: outcome.key_used,
            total_keys: outcome.total_keys,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CrawlPayload {
    #[validate(length(min = 1))]
    pub query: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponse {
    pub success: bool,
    pub count: usize,
    pub source: String,
    pub key_used: usize,
    pub total_keys: usize,
}

impl From<CrawlSummary> for CrawlResponse {
    fn from(summary: CrawlSummary) -> Self {
        Self {
            success: true,
            count: summary.count,
            source: PROVIDER_NAME.to_string(),
            key_used: summary.key_used,
            total_keys: summary.total_keys,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedJobsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapedJobsResponse {
    pub success: bool,
    pub jobs: Vec<ScrapedJob>,
}
