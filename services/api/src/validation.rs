//! Input validation utilities
//!
//! Request bodies are deserialized into loosely-typed request structs and then
//! converted into validated commands through [`Validate`]. Field checks follow
//! the same shape: they return the cleaned value or a human-readable message.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, sync::OnceLock};
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_COMMENT_LENGTH: usize = 500;
pub const MAX_SKILL_NAME_LENGTH: usize = 64;
pub const MAX_MATCH_LIMIT: i64 = 20;
pub const DEFAULT_MATCH_LIMIT: u32 = 5;

/// A single offending field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field problem found while validating one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record a missing field; passes the value through when present
    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, format!("{} is required", field));
        }
        value
    }

    /// Record a failed check; passes the cleaned value through on success
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Conversion from a raw request payload into a validated command
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

/// JSON body extractor that runs [`Validate`] before the handler sees the data
pub struct ValidatedJson<T: Validate>(pub T::Output);

#[async_trait::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(ValidatedJson(payload.validate()?))
    }
}

/// Parse an identifier field
pub fn parse_id(field: &str, value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("{} must be a valid id", field))
}

/// Require a non-blank string and return it trimmed
pub fn validate_non_empty(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(trimmed.to_string())
}

/// Validate a free-text field length
pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters long", field, max));
    }
    Ok(())
}

/// Validate academic year
pub fn validate_year(year: i64) -> Result<i16, String> {
    if !(1..=4).contains(&year) {
        return Err("Year must be between 1 and 4".to_string());
    }
    Ok(year as i16)
}

/// Validate self-reported proficiency
pub fn validate_proficiency(proficiency: i64) -> Result<i16, String> {
    if !(1..=5).contains(&proficiency) {
        return Err("Proficiency must be between 1 and 5".to_string());
    }
    Ok(proficiency as i16)
}

/// Validate one rating dimension
pub fn validate_score(field: &str, score: i64) -> Result<i16, String> {
    if !(1..=5).contains(&score) {
        return Err(format!("{} must be between 1 and 5", field));
    }
    Ok(score as i16)
}

/// Normalize and validate a skill name
///
/// Names are stored lowercase so that "Python" and "python" collide.
pub fn validate_skill_name(name: &str) -> Result<String, String> {
    let normalized = name.trim().to_lowercase();

    if normalized.is_empty() {
        return Err("Name is required".to_string());
    }

    if normalized.chars().count() > MAX_SKILL_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters long",
            MAX_SKILL_NAME_LENGTH
        ));
    }

    static SKILL_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SKILL_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} +#.\-]*$").expect("Failed to compile skill name regex")
    });

    if !regex.is_match(&normalized) {
        return Err(
            "Name can only contain letters, numbers, spaces and the characters + # . -".to_string(),
        );
    }

    Ok(normalized)
}

/// Validate the number of matches requested from the recommendation service
pub fn validate_match_limit(limit: i64) -> Result<u32, String> {
    if !(1..=MAX_MATCH_LIMIT).contains(&limit) {
        return Err(format!("limit must be between 1 and {}", MAX_MATCH_LIMIT));
    }
    Ok(limit as u32)
}

/// Validate the degree of separation reported for a match
pub fn validate_connection_degree(degree: i64) -> Result<i16, String> {
    if !(1..=3).contains(&degree) {
        return Err("connectionDegree must be between 1 and 3".to_string());
    }
    Ok(degree as i16)
}

/// Validate a match score percentage
pub fn validate_match_score(score: f64) -> Result<f64, String> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err("matchScore must be between 0 and 100".to_string());
    }
    Ok(score)
}

/// Parse an event date: RFC 3339 timestamp or a plain calendar date
pub fn parse_event_date(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| "date must be an RFC 3339 timestamp or a YYYY-MM-DD date".to_string())
}
