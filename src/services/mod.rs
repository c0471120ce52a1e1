pub mod crawler_service;
pub mod cv_service;
pub mod job_search_service;
