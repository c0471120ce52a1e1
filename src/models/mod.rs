pub mod scraped_job;
