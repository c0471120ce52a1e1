use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

pub const PROVIDER_NAME: &str = "JSearch API";

/// Failures that cross the search component boundary. Per-credential problems
/// (quota, provider errors, transport errors) never surface individually;
/// they only feed the `last_error` carried by `Exhausted`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("No JSearch API keys available")]
    NoKeysConfigured,

    #[error("All {keys_tried} API keys failed. Last error: {last_error}")]
    Exhausted { keys_tried: usize, last_error: String },
}

/// One job opening as surfaced by the aggregation provider, normalized so
/// every display field is always renderable.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub location: String,
    pub description: String,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary: String,
    pub is_remote: bool,
    pub employment_type: String,
    pub posted_at: DateTime<Utc>,
    pub apply_link: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchSuccess {
    pub jobs: Vec<JobPosting>,
    /// 1-based index of the credential that served the request.
    pub key_used: usize,
    pub total_keys: usize,
}

#[derive(Clone)]
pub struct JobSearchService {
    client: Client,
    api_keys: Vec<String>,
    base_url: String,
    host: String,
}

impl JobSearchService {
    pub fn new(api_keys: Vec<String>, base_url: String, host: String, client: Client) -> Self {
        Self {
            client,
            api_keys,
            base_url,
            host,
        }
    }

    pub fn total_keys(&self) -> usize {
        self.api_keys.len()
    }

    /// Runs one logical search against the provider, rotating through the
    /// credential pool in fixed order. Credentials are retried immediately and
    /// in the same order on every call; there is no cooldown state between
    /// calls, bounded strictly by the pool size.
    pub async fn search(
        &self,
        query: &str,
        location: Option<&str>,
        page: u32,
    ) -> std::result::Result<SearchSuccess, SearchError> {
        if self.api_keys.is_empty() {
            error!("No JSearch API keys configured");
            return Err(SearchError::NoKeysConfigured);
        }

        let search_query = match location {
            Some(loc) if !loc.trim().is_empty() => format!("{} in {}", query, loc.trim()),
            _ => query.to_string(),
        };

        info!(
            query = %search_query,
            page,
            total_keys = self.api_keys.len(),
            "Fetching jobs via JSearch API"
        );

        let mut last_error = String::new();

        for (i, api_key) in self.api_keys.iter().enumerate() {
            let key_number = i + 1;
            info!(key = key_number, "Trying JSearch API key");

            let request = self
                .client
                .get(format!("{}/search", self.base_url))
                .query(&[
                    ("query", search_query.as_str()),
                    ("page", page.to_string().as_str()),
                    ("num_pages", "1"),
                ])
                .header("x-rapidapi-key", api_key)
                .header("x-rapidapi-host", &self.host);

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    error!(key = key_number, error = %err, "JSearch request failed");
                    last_error = err.to_string();
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    key = key_number,
                    "JSearch API key quota exceeded (429). Trying next key"
                );
                last_error = format!("API key #{} quota exceeded", key_number);
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(key = key_number, status = %status, body = %body, "JSearch API error");
                last_error = format!("API key #{} error: {}", key_number, status.as_u16());
                continue;
            }

            let payload: JsonValue = match response.json().await {
                Ok(value) => value,
                Err(err) => {
                    error!(key = key_number, error = %err, "Failed to decode JSearch response");
                    last_error = err.to_string();
                    continue;
                }
            };

            // A structurally valid response without a data array is an
            // authoritative empty result, not a reason to rotate.
            let Some(raw_jobs) = payload.get("data").and_then(JsonValue::as_array) else {
                info!(key = key_number, "No jobs found in JSearch response");
                return Ok(SearchSuccess {
                    jobs: Vec::new(),
                    key_used: key_number,
                    total_keys: self.api_keys.len(),
                });
            };

            let jobs: Vec<JobPosting> = raw_jobs.iter().map(normalize_job).collect();
            info!(
                key = key_number,
                count = jobs.len(),
                "JSearch search succeeded"
            );
            return Ok(SearchSuccess {
                jobs,
                key_used: key_number,
                total_keys: self.api_keys.len(),
            });
        }

        error!("All JSearch API keys exhausted or failed");
        Err(SearchError::Exhausted {
            keys_tried: self.api_keys.len(),
            last_error,
        })
    }
}

/// Maps one provider job object into a `JobPosting`. Total: every field has a
/// defined fallback, so a record built from `{}` is still fully renderable.
pub fn normalize_job(raw: &JsonValue) -> JobPosting {
    let title = non_empty_str(raw, "job_title")
        .unwrap_or("Untitled Position")
        .to_string();
    let company = non_empty_str(raw, "employer_name")
        .unwrap_or("Company")
        .to_string();
    let city = non_empty_str(raw, "job_city").unwrap_or("").to_string();
    let country = non_empty_str(raw, "job_country").unwrap_or("").to_string();
    let location = compose_location(&city, &country);

    let min_salary = raw.get("job_min_salary").and_then(JsonValue::as_f64);
    let max_salary = raw.get("job_max_salary").and_then(JsonValue::as_f64);
    let salary_currency = non_empty_str(raw, "job_salary_currency").map(str::to_string);
    let salary = compose_salary(min_salary, max_salary, salary_currency.as_deref());

    let description = non_empty_str(raw, "job_description")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} position at {}.", title, company));

    let apply_link = non_empty_str(raw, "job_apply_link")
        .map(str::to_string)
        .unwrap_or_else(|| fallback_apply_link(&title, &company));

    let posted_at = non_empty_str(raw, "job_posted_at_datetime_utc")
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    JobPosting {
        // Identifiers are only stable within one response batch; the apply
        // link is the durable key on the persistence side.
        job_id: non_empty_str(raw, "job_id")
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        title,
        company,
        city,
        country,
        location,
        description,
        min_salary,
        max_salary,
        salary_currency,
        salary,
        is_remote: raw
            .get("job_is_remote")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        employment_type: non_empty_str(raw, "job_employment_type")
            .unwrap_or("FULLTIME")
            .to_string(),
        posted_at,
        apply_link,
        source: PROVIDER_NAME.to_string(),
    }
}

fn compose_location(city: &str, country: &str) -> String {
    match (city.is_empty(), country.is_empty()) {
        (false, false) => format!("{}, {}", city, country),
        (false, true) => city.to_string(),
        (true, false) => country.to_string(),
        (true, true) => "Remote".to_string(),
    }
}

fn compose_salary(min: Option<f64>, max: Option<f64>, currency: Option<&str>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("${} - ${}", min, max),
        _ if currency.is_some() => "Salary: Negotiable".to_string(),
        _ => "Not specified".to_string(),
    }
}

/// Every record carries some actionable link: when the provider omits one we
/// synthesize a search-engine query from title + employer.
fn fallback_apply_link(title: &str, company: &str) -> String {
    let query = format!("{} at {}", title, company);
    match Url::parse_with_params("https://www.google.com/search", &[("q", query.as_str())]) {
        Ok(url) => url.into(),
        Err(_) => "https://www.google.com/search".to_string(),
    }
}

fn non_empty_str<'a>(raw: &'a JsonValue, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
