//! `SeaORM` implementation of the `JobService` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};
use validator::Validate;

use crate::constants::limits::{MAX_PAGE, PAGE_SIZE};
use crate::db::{OwnedMutation, Store};
use crate::domain::{JobId, JobStatus, UserId};
use crate::models::validation::join_messages;
use crate::models::{JobApplication, JobApplicationInput};
use crate::services::job_service::{JobError, JobService};

pub const JOB_SAVED_MESSAGE: &str = "Job Details Saved Successfully";
pub const JOB_DELETED_MESSAGE: &str = "Job details deleted successfully";

pub struct SeaOrmJobService {
    store: Store,
}

impl SeaOrmJobService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate(input: &JobApplicationInput) -> Result<(), JobError> {
    input
        .validate()
        .map_err(|e| JobError::Validation(join_messages(&e)))
}

fn missing_required() -> JobError {
    JobError::Validation("Job status and applied date are required".to_string())
}

#[async_trait]
impl JobService for SeaOrmJobService {
    async fn add_job(
        &self,
        owner: UserId,
        input: JobApplicationInput,
    ) -> Result<String, JobError> {
        let input = input.normalized();
        validate(&input)?;
        let new_job = input.into_new(owner).ok_or_else(missing_required)?;

        let job = self.store.add_job(new_job).await?;
        info!(job_id = %job.id, user_id = %owner, "Job application saved");

        Ok(JOB_SAVED_MESSAGE.to_string())
    }

    async fn get_job(&self, owner: UserId, id: JobId) -> Result<JobApplication, JobError> {
        let job = self
            .store
            .get_job(id)
            .await?
            .ok_or(JobError::NotFound(id))?;

        if job.owner != owner {
            return Err(JobError::Unauthorized(id));
        }

        Ok(job)
    }

    async fn update_job(
        &self,
        owner: UserId,
        id: JobId,
        input: JobApplicationInput,
    ) -> Result<JobApplication, JobError> {
        let input = input.normalized();
        validate(&input)?;
        let changes = input.changes().ok_or_else(missing_required)?;

        match self.store.update_job(id, owner, changes).await? {
            OwnedMutation::Applied(job) => {
                info!(job_id = %id, user_id = %owner, "Job application updated");
                Ok(job)
            }
            OwnedMutation::NotFound => Err(JobError::NotFound(id)),
            OwnedMutation::NotOwner => Err(JobError::Unauthorized(id)),
        }
    }

    async fn delete_job(&self, owner: UserId, id: JobId) -> Result<String, JobError> {
        match self.store.delete_job(id, owner).await? {
            OwnedMutation::Applied(()) => {
                info!(job_id = %id, user_id = %owner, "Job application deleted");
                Ok(JOB_DELETED_MESSAGE.to_string())
            }
            OwnedMutation::NotFound => Err(JobError::NotFound(id)),
            OwnedMutation::NotOwner => Err(JobError::Unauthorized(id)),
        }
    }

    async fn list_jobs(&self, owner: UserId, page: i64) -> Result<Vec<JobApplication>, JobError> {
        let page = u64::try_from(page)
            .map_err(|_| JobError::Validation("Page must not be negative".to_string()))?;
        if page > MAX_PAGE {
            return Err(JobError::Validation(format!(
                "Page must not exceed {MAX_PAGE}"
            )));
        }

        Ok(self.store.list_jobs(owner, page, PAGE_SIZE).await?)
    }

    async fn jobs_between_dates(
        &self,
        owner: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JobApplication>, JobError> {
        if from > to {
            debug!(%from, %to, "Empty date range");
            return Ok(Vec::new());
        }

        Ok(self.store.jobs_applied_between(owner, from, to).await?)
    }

    async fn jobs_by_company(
        &self,
        owner: UserId,
        company_name: &str,
    ) -> Result<Vec<JobApplication>, JobError> {
        Ok(self.store.jobs_by_company(owner, company_name.trim()).await?)
    }

    async fn jobs_by_status(
        &self,
        owner: UserId,
        status: JobStatus,
    ) -> Result<Vec<JobApplication>, JobError> {
        Ok(self.store.jobs_by_status(owner, status).await?)
    }
}
