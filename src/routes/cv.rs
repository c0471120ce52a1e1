use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::cv_dto::{
        GenerateCvPayload, ImproveCvPayload, ResumeResponse, TailorPayload, TailorResponse,
    },
    error::Result,
    services::cv_service::CvProfile,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/cv/generate",
    request_body = GenerateCvPayload,
    responses(
        (status = 200, description = "HTML resume generated"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn generate_cv(
    State(state): State<AppState>,
    Json(payload): Json<GenerateCvPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = CvProfile {
        name: payload.name,
        job_title: payload.job_title,
        experience: payload.experience,
        skills: payload.skills,
    };
    let resume = state.cv_service.generate_cv(&profile).await?;
    Ok(Json(ResumeResponse {
        success: true,
        resume,
    }))
}

#[utoipa::path(
    post,
    path = "/api/cv/improve",
    request_body = ImproveCvPayload,
    responses(
        (status = 200, description = "Uploaded CV text restructured as HTML"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn improve_cv(
    State(state): State<AppState>,
    Json(payload): Json<ImproveCvPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume = state.cv_service.improve_cv(&payload.cv_content).await?;
    Ok(Json(ResumeResponse {
        success: true,
        resume,
    }))
}

#[utoipa::path(
    post,
    path = "/api/cv/tailor",
    request_body = TailorPayload,
    responses(
        (status = 200, description = "Tailored CV and cover letter"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn tailor_application(
    State(state): State<AppState>,
    Json(payload): Json<TailorPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .cv_service
        .tailor_application(&payload.cv_content, &payload.job_description)
        .await?;
    Ok(Json(TailorResponse::from(result)))
}
