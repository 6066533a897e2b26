//! Field rules shared by the request models, plus the conversion of a failed
//! validation into the single message returned to clients.

use chrono::{NaiveDate, Utc};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Rejects dates after today (UTC).
pub fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(ValidationError::new("past_or_present"));
    }
    Ok(())
}

/// Flattens field errors into one `", "`-joined message, ordered by field name
/// so the output is stable.
#[must_use]
pub fn join_messages(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message.as_ref().map_or_else(
                    || Cow::Owned(format!("{field} is invalid ({})", e.code)),
                    Clone::clone,
                )
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
