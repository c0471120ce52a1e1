use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::cv_service::TailoredApplication;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateCvPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub job_title: String,
    #[validate(length(min = 1))]
    pub experience: String,
    #[validate(length(min = 1))]
    pub skills: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImproveCvPayload {
    #[validate(length(min = 1))]
    pub cv_content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TailorPayload {
    #[validate(length(min = 1))]
    pub cv_content: String,
    #[validate(length(min = 1))]
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeResponse {
    pub success: bool,
    pub resume: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TailorResponse {
    pub success: bool,
    pub tailored_cv: String,
    pub cover_letter: String,
}

impl From<TailoredApplication> for TailorResponse {
    fn from(result: TailoredApplication) -> Self {
        Self {
            success: true,
            tailored_cv: result.tailored_cv,
            cover_letter: result.cover_letter,
        }
    }
}
