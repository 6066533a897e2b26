use chrono::NaiveDate;

use super::ApiError;
use crate::constants::limits::MAX_PAGE;
use crate::domain::JobId;

pub fn validate_job_id(id: i64) -> Result<JobId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid job ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(JobId::new(id))
}

pub fn validate_page(page: i64) -> Result<i64, ApiError> {
    if !u64::try_from(page).is_ok_and(|p| p <= MAX_PAGE) {
        return Err(ApiError::validation(format!(
            "Invalid page: {}. Page must be between 0 and {}",
            page, MAX_PAGE
        )));
    }
    Ok(page)
}

pub fn validate_company_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Company name cannot be empty"));
    }
    Ok(trimmed)
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::validation(format!(
            "Invalid {field} date: {value}. Expected format YYYY-MM-DD"
        ))
    })
}
