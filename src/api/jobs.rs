//! Job application endpoints.
//!
//! Handlers only map HTTP to [`JobService`](crate::services::JobService)
//! calls. The caller always comes from the [`CurrentUser`] extension, never
//! from the request body.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{parse_date, validate_company_name, validate_job_id, validate_page};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::JobStatus;
use crate::models::{JobApplication, JobApplicationInput};
use crate::services::JobError;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub page: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound(id) => Self::not_found("Job application", id),
            JobError::Unauthorized(id) => Self::Forbidden(format!(
                "You are not allowed to access job application {id}"
            )),
            JobError::Validation(msg) => Self::validation(msg),
            JobError::Database(msg) => Self::DatabaseError(msg),
            JobError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /jobs
pub async fn add_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<JobApplicationInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let message = state.job_service().add_job(user.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MessageResponse::new(message))),
    ))
}

/// GET /jobs/{id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<JobApplication>>, ApiError> {
    let Path(id) = id?;
    let id = validate_job_id(id)?;
    let job = state.job_service().get_job(user.id, id).await?;
    Ok(Json(ApiResponse::success(job)))
}

/// PUT /jobs/{id}
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<JobApplicationInput>, JsonRejection>,
) -> Result<Json<ApiResponse<JobApplication>>, ApiError> {
    let Path(id) = id?;
    let id = validate_job_id(id)?;
    let Json(payload) = payload?;

    let job = state.job_service().update_job(user.id, id, payload).await?;
    Ok(Json(ApiResponse::success(job)))
}

/// DELETE /jobs/{id}
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let Path(id) = id?;
    let id = validate_job_id(id)?;
    let message = state.job_service().delete_job(user.id, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(message))))
}

/// GET /jobs?page=N or GET /jobs?status=X
///
/// A `status` filter returns every matching application; otherwise one page
/// (zero-based, default 0) is returned.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<JobApplication>>>, ApiError> {
    let Query(query) = query?;

    let jobs = if let Some(status) = query.status {
        let status: JobStatus = status.parse().map_err(ApiError::validation)?;
        state.job_service().jobs_by_status(user.id, status).await?
    } else {
        let page = validate_page(query.page.unwrap_or(0))?;
        state.job_service().list_jobs(user.id, page).await?
    };

    Ok(Json(ApiResponse::success(jobs)))
}

/// GET /jobs/between?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn jobs_between_dates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<JobApplication>>>, ApiError> {
    let Query(query) = query?;

    let (Some(from), Some(to)) = (query.from, query.to) else {
        return Err(ApiError::validation(
            "Both from and to dates are required",
        ));
    };
    let from = parse_date("from", &from)?;
    let to = parse_date("to", &to)?;

    let jobs = state
        .job_service()
        .jobs_between_dates(user.id, from, to)
        .await?;
    Ok(Json(ApiResponse::success(jobs)))
}

/// GET /jobs/company/{name}
pub async fn jobs_by_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<JobApplication>>>, ApiError> {
    let Path(name) = name?;
    let name = validate_company_name(&name)?;

    let jobs = state.job_service().jobs_by_company(user.id, name).await?;
    Ok(Json(ApiResponse::success(jobs)))
}
