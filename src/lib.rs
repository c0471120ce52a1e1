pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    crawler_service::CrawlerService, cv_service::CvService, job_search_service::JobSearchService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_search_service: JobSearchService,
    pub crawler_service: CrawlerService,
    pub cv_service: CvService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        let job_search_service = JobSearchService::new(
            config.jsearch_api_keys.clone(),
            config.jsearch_base_url.clone(),
            config.jsearch_host.clone(),
            http_client.clone(),
        );
        let crawler_service = CrawlerService::new(pool.clone(), job_search_service.clone());
        let cv_service = CvService::new(config.openai_api_key.clone(), http_client);

        Self {
            pool,
            job_search_service,
            crawler_service,
            cv_service,
        }
    }
}
