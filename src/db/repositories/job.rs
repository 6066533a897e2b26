use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{JobId, JobStatus, UserId};
use crate::entities::{job_applications, prelude::*};
use crate::models::job::{JobApplication, JobChanges, NewJobApplication};

/// Result of a mutation that is only allowed for the record's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedMutation<T> {
    Applied(T),
    NotFound,
    NotOwner,
}

pub struct JobRepository {
    conn: DatabaseConnection,
}

impl JobRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, job: NewJobApplication) -> Result<JobApplication> {
        let txn = self.conn.begin().await?;

        let now = chrono::Utc::now().to_rfc3339();
        let model = job_applications::ActiveModel {
            company_name: Set(job.company_name),
            job_role: Set(job.job_role),
            comment: Set(job.comment),
            status: Set(job.status),
            resume_used: Set(job.resume_used),
            job_posting_id: Set(job.job_posting_id),
            applied_date: Set(job.applied_date),
            user_id: Set(job.owner.value()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert job application")?;

        txn.commit().await?;
        Ok(JobApplication::from(model))
    }

    pub async fn get(&self, id: JobId) -> Result<Option<JobApplication>> {
        let job = JobApplications::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query job application by ID")?;

        Ok(job.map(JobApplication::from))
    }

    /// Copies `changes` onto the record if it exists and belongs to `owner`.
    /// Existence is checked before ownership.
    pub async fn update_owned(
        &self,
        id: JobId,
        owner: UserId,
        changes: JobChanges,
    ) -> Result<OwnedMutation<JobApplication>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = JobApplications::find_by_id(id.value()).one(&txn).await? else {
            return Ok(OwnedMutation::NotFound);
        };

        if existing.user_id != owner.value() {
            return Ok(OwnedMutation::NotOwner);
        }

        let mut active: job_applications::ActiveModel = existing.into();
        active.company_name = Set(changes.company_name);
        active.job_role = Set(changes.job_role);
        active.comment = Set(changes.comment);
        active.status = Set(changes.status);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&txn)
            .await
            .context("Failed to update job application")?;

        txn.commit().await?;
        Ok(OwnedMutation::Applied(JobApplication::from(updated)))
    }

    /// Deletes the record if it exists and belongs to `owner`.
    pub async fn delete_owned(&self, id: JobId, owner: UserId) -> Result<OwnedMutation<()>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = JobApplications::find_by_id(id.value()).one(&txn).await? else {
            return Ok(OwnedMutation::NotFound);
        };

        if existing.user_id != owner.value() {
            return Ok(OwnedMutation::NotOwner);
        }

        existing
            .delete(&txn)
            .await
            .context("Failed to delete job application")?;

        txn.commit().await?;
        Ok(OwnedMutation::Applied(()))
    }

    /// One zero-based page of the owner's applications, oldest id first.
    pub async fn list_by_owner(
        &self,
        owner: UserId,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<JobApplication>> {
        let items = JobApplications::find()
            .filter(job_applications::Column::UserId.eq(owner.value()))
            .order_by_asc(job_applications::Column::Id)
            .paginate(&self.conn, page_size)
            .fetch_page(page)
            .await
            .context("Failed to page job applications")?;

        Ok(items.into_iter().map(JobApplication::from).collect())
    }

    pub async fn count_by_owner(&self, owner: UserId) -> Result<u64> {
        let count = JobApplications::find()
            .filter(job_applications::Column::UserId.eq(owner.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Applications whose applied date lies in `[from, to]`, both ends inclusive.
    pub async fn list_applied_between(
        &self,
        owner: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JobApplication>> {
        let items = JobApplications::find()
            .filter(job_applications::Column::UserId.eq(owner.value()))
            .filter(job_applications::Column::AppliedDate.between(from, to))
            .order_by_asc(job_applications::Column::AppliedDate)
            .order_by_asc(job_applications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query job applications by date range")?;

        Ok(items.into_iter().map(JobApplication::from).collect())
    }

    pub async fn list_by_company(
        &self,
        owner: UserId,
        company_name: &str,
    ) -> Result<Vec<JobApplication>> {
        let items = JobApplications::find()
            .filter(job_applications::Column::UserId.eq(owner.value()))
            .filter(job_applications::Column::CompanyName.eq(company_name))
            .order_by_asc(job_applications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query job applications by company")?;

        Ok(items.into_iter().map(JobApplication::from).collect())
    }

    pub async fn list_by_status(
        &self,
        owner: UserId,
        status: JobStatus,
    ) -> Result<Vec<JobApplication>> {
        let items = JobApplications::find()
            .filter(job_applications::Column::UserId.eq(owner.value()))
            .filter(job_applications::Column::Status.eq(status))
            .order_by_asc(job_applications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query job applications by status")?;

        Ok(items.into_iter().map(JobApplication::from).collect())
    }
}
