//! Domain service for job application tracking.
//!
//! Every operation takes the caller's [`UserId`]. Reads and mutations of a
//! single record are refused unless the caller owns it, and all list queries
//! only ever return the caller's own applications.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{JobId, JobStatus, UserId};
use crate::models::{JobApplication, JobApplicationInput};

/// Domain errors for job application operations.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job application {0} not found")]
    NotFound(JobId),

    #[error("You are not allowed to access job application {0}")]
    Unauthorized(JobId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for JobError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for JobError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for job applications.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Records a new application owned by `owner` and returns a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Validation`] if the input is incomplete or malformed.
    async fn add_job(
        &self,
        owner: UserId,
        input: JobApplicationInput,
    ) -> Result<String, JobError>;

    /// Fetches one of the caller's applications.
    ///
    /// # Errors
    ///
    /// - Returns [`JobError::NotFound`] if no such record exists
    /// - Returns [`JobError::Unauthorized`] if it belongs to someone else
    async fn get_job(&self, owner: UserId, id: JobId) -> Result<JobApplication, JobError>;

    /// Replaces company, role, comment and status of an application.
    ///
    /// # Errors
    ///
    /// - Returns [`JobError::Validation`] if the input is malformed
    /// - Returns [`JobError::NotFound`] if no such record exists (checked first)
    /// - Returns [`JobError::Unauthorized`] if it belongs to someone else
    async fn update_job(
        &self,
        owner: UserId,
        id: JobId,
        input: JobApplicationInput,
    ) -> Result<JobApplication, JobError>;

    /// Permanently removes an application.
    ///
    /// # Errors
    ///
    /// - Returns [`JobError::NotFound`] if no such record exists
    /// - Returns [`JobError::Unauthorized`] if it belongs to someone else
    async fn delete_job(&self, owner: UserId, id: JobId) -> Result<String, JobError>;

    /// Returns one zero-based page of the caller's applications.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Validation`] for a negative page or one whose row
    /// offset would not fit in SQL.
    async fn list_jobs(&self, owner: UserId, page: i64) -> Result<Vec<JobApplication>, JobError>;

    /// Applications with an applied date inside `[from, to]`.
    async fn jobs_between_dates(
        &self,
        owner: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JobApplication>, JobError>;

    async fn jobs_by_company(
        &self,
        owner: UserId,
        company_name: &str,
    ) -> Result<Vec<JobApplication>, JobError>;

    async fn jobs_by_status(
        &self,
        owner: UserId,
        status: JobStatus,
    ) -> Result<Vec<JobApplication>, JobError>;
}
