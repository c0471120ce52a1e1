pub mod cv_dto;
pub mod job_dto;
