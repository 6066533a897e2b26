use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, not_in_future};
use crate::domain::{JobId, JobStatus, UserId};
use crate::entities::job_applications;

/// A stored job application as exposed to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobId,
    pub company_name: String,
    pub job_role: String,
    pub comment: Option<String>,
    pub status: JobStatus,
    pub resume_used: Option<String>,
    #[serde(rename = "jobId")]
    pub job_posting_id: Option<String>,
    pub applied_date: NaiveDate,
    #[serde(skip)]
    pub owner: UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl From<job_applications::Model> for JobApplication {
    fn from(model: job_applications::Model) -> Self {
        Self {
            id: JobId::new(model.id),
            company_name: model.company_name,
            job_role: model.job_role,
            comment: model.comment,
            status: model.status,
            resume_used: model.resume_used,
            job_posting_id: model.job_posting_id,
            applied_date: model.applied_date,
            owner: UserId::new(model.user_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Body of `POST /jobs` and `PUT /jobs/{id}`.
///
/// Required fields are `Option`s so a missing value surfaces as a validation
/// message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationInput {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Company name is required"),
        length(
            min = 2,
            max = 100,
            message = "Company name must be between 2 and 100 characters"
        )
    )]
    pub company_name: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Job role is required"),
        length(
            min = 2,
            max = 100,
            message = "Job role must be between 2 and 100 characters"
        )
    )]
    pub job_role: String,

    #[validate(length(max = 500, message = "Comment must not exceed 500 characters"))]
    pub comment: Option<String>,

    #[validate(required(message = "Job status is required"))]
    pub status: Option<JobStatus>,

    pub resume_used: Option<String>,

    #[serde(rename = "jobId")]
    pub job_posting_id: Option<String>,

    #[validate(
        required(message = "Applied date is required"),
        custom(
            function = "not_in_future",
            message = "Applied date cannot be in the future"
        )
    )]
    pub applied_date: Option<NaiveDate>,
}

/// The subset of fields an update is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobChanges {
    pub company_name: String,
    pub job_role: String,
    pub comment: Option<String>,
    pub status: JobStatus,
}

/// A validated application ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub company_name: String,
    pub job_role: String,
    pub comment: Option<String>,
    pub status: JobStatus,
    pub resume_used: Option<String>,
    pub job_posting_id: Option<String>,
    pub applied_date: NaiveDate,
    pub owner: UserId,
}

impl JobApplicationInput {
    /// Trims the text fields and drops blank optionals so the length rules
    /// apply to what is stored.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            job_role: self.job_role.trim().to_string(),
            comment: normalize_optional(self.comment),
            resume_used: normalize_optional(self.resume_used),
            job_posting_id: normalize_optional(self.job_posting_id),
            ..self
        }
    }

    /// Converts an already validated input into an insertable record.
    /// Returns `None` if a required field is missing.
    #[must_use]
    pub fn into_new(self, owner: UserId) -> Option<NewJobApplication> {
        Some(NewJobApplication {
            company_name: self.company_name.trim().to_string(),
            job_role: self.job_role.trim().to_string(),
            comment: normalize_optional(self.comment),
            status: self.status?,
            resume_used: normalize_optional(self.resume_used),
            job_posting_id: normalize_optional(self.job_posting_id),
            applied_date: self.applied_date?,
            owner,
        })
    }

    /// Extracts the fields an update may copy onto an existing record.
    #[must_use]
    pub fn changes(&self) -> Option<JobChanges> {
        Some(JobChanges {
            company_name: self.company_name.trim().to_string(),
            job_role: self.job_role.trim().to_string(),
            comment: normalize_optional(self.comment.clone()),
            status: self.status?,
        })
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
