use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A normalized posting persisted by the crawl path. `apply_link` is the
/// natural key: re-crawling the same query overwrites rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScrapedJob {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub description: String,
    pub apply_link: String,
    pub source: String,
    pub posted_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
