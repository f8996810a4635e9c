//! User and profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    models::skill::UserSkillWithSkill,
    validation::{
        MAX_BIO_LENGTH, Validate, ValidationErrors, validate_max_length, validate_non_empty,
        validate_year,
    },
};

/// User entity
///
/// `trust_score` and `total_sessions` are maintained by the rating flow and
/// never accepted from clients.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub year: Option<i16>,
    pub branch: Option<String>,
    pub bio: String,
    pub trust_score: i32,
    pub total_sessions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the one-time profile setup already happened
    pub fn has_profile(&self) -> bool {
        self.year.is_some() && self.branch.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Public identity fields embedded in match history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub year: Option<i16>,
    pub branch: Option<String>,
}

/// Profile response: the user merged with their skills
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub skills: Vec<UserSkillWithSkill>,
}

/// Request for the one-time profile setup
#[derive(Debug, Deserialize)]
pub struct SetupProfileRequest {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub branch: Option<String>,
    pub bio: Option<String>,
}

/// Validated profile setup
#[derive(Debug, Clone)]
pub struct SetupProfile {
    pub name: String,
    pub year: i16,
    pub branch: String,
    pub bio: String,
}

impl Validate for SetupProfileRequest {
    type Output = SetupProfile;

    fn validate(self) -> Result<SetupProfile, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors
            .required("name", self.name)
            .and_then(|name| errors.check("name", validate_non_empty("name", &name)));
        let year = errors
            .required("year", self.year)
            .and_then(|year| errors.check("year", validate_year(year)));
        let branch = errors
            .required("branch", self.branch)
            .and_then(|branch| errors.check("branch", validate_non_empty("branch", &branch)));

        let bio = self.bio.unwrap_or_default();
        errors.check("bio", validate_max_length("bio", &bio, MAX_BIO_LENGTH));

        match (name, year, branch) {
            (Some(name), Some(year), Some(branch)) if errors.is_empty() => Ok(SetupProfile {
                name,
                year,
                branch,
                bio,
            }),
            _ => Err(errors),
        }
    }
}

/// Request for a partial profile update
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub branch: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Validated profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub branch: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl Validate for UpdateProfileRequest {
    type Output = UpdateProfile;

    fn validate(self) -> Result<UpdateProfile, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self
            .name
            .and_then(|name| errors.check("name", validate_non_empty("name", &name)));
        let year = self
            .year
            .and_then(|year| errors.check("year", validate_year(year)));
        let branch = self
            .branch
            .and_then(|branch| errors.check("branch", validate_non_empty("branch", &branch)));
        let image = self
            .image
            .and_then(|image| errors.check("image", validate_non_empty("image", &image)));

        if let Some(bio) = &self.bio {
            errors.check("bio", validate_max_length("bio", bio, MAX_BIO_LENGTH));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateProfile {
            name,
            year,
            branch,
            bio: self.bio,
            image,
        })
    }
}
