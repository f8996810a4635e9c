//! Match-finding and match history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    models::user::UserSummary,
    validation::{
        DEFAULT_MATCH_LIMIT, Validate, ValidationErrors, parse_id, validate_connection_degree,
        validate_match_limit, validate_match_score, validate_non_empty,
    },
};

/// Recorded pairing between a seeker and a mentor
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub seeker_id: Uuid,
    pub mentor_id: Uuid,
    pub skill_id: Uuid,
    pub match_score: Option<f64>,
    pub connection_degree: Option<i16>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Whether the user is the seeker or the mentor of this match
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.seeker_id == user_id || self.mentor_id == user_id
    }
}

/// Skill fields embedded in match history
#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

/// Match joined with both participants and the skill
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHistoryEntry {
    pub id: Uuid,
    pub seeker: UserSummary,
    pub mentor: UserSummary,
    pub skill: SkillSummary,
    pub match_score: Option<f64>,
    pub connection_degree: Option<i16>,
    pub created_at: DateTime<Utc>,
}

/// Request for finding mentors for a skill
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesRequest {
    pub skill_name: Option<String>,
    pub limit: Option<i64>,
}

/// Validated match search
#[derive(Debug, Clone)]
pub struct FindMatches {
    pub skill_name: String,
    pub limit: u32,
}

impl Validate for FindMatchesRequest {
    type Output = FindMatches;

    fn validate(self) -> Result<FindMatches, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let skill_name = errors
            .required("skillName", self.skill_name)
            .and_then(|name| errors.check("skillName", validate_non_empty("skillName", &name)));
        let limit = match self.limit {
            Some(limit) => errors.check("limit", validate_match_limit(limit)),
            None => Some(DEFAULT_MATCH_LIMIT),
        };

        match (skill_name, limit) {
            (Some(skill_name), Some(limit)) if errors.is_empty() => {
                Ok(FindMatches { skill_name, limit })
            }
            _ => Err(errors),
        }
    }
}

/// Payload forwarded to the recommendation service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRequest {
    pub user_id: String,
    pub skill_name: String,
    pub limit: u32,
}

/// Request for recording a match with a chosen mentor
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatchRequest {
    pub mentor_id: Option<String>,
    pub skill_id: Option<String>,
    pub match_score: Option<f64>,
    pub connection_degree: Option<i64>,
}

/// Validated match record; the caller is always the seeker
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub mentor_id: Uuid,
    pub skill_id: Uuid,
    pub match_score: Option<f64>,
    pub connection_degree: Option<i16>,
}

impl Validate for RecordMatchRequest {
    type Output = NewMatch;

    fn validate(self) -> Result<NewMatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mentor_id = errors
            .required("mentorId", self.mentor_id)
            .and_then(|id| errors.check("mentorId", parse_id("mentorId", &id)));
        let skill_id = errors
            .required("skillId", self.skill_id)
            .and_then(|id| errors.check("skillId", parse_id("skillId", &id)));
        let match_score = self
            .match_score
            .and_then(|score| errors.check("matchScore", validate_match_score(score)));
        let connection_degree = self.connection_degree.and_then(|degree| {
            errors.check("connectionDegree", validate_connection_degree(degree))
        });

        match (mentor_id, skill_id) {
            (Some(mentor_id), Some(skill_id)) if errors.is_empty() => Ok(NewMatch {
                mentor_id,
                skill_id,
                match_score,
                connection_degree,
            }),
            _ => Err(errors),
        }
    }
}
