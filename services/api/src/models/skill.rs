//! Skill catalog and per-user skill models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{
    Validate, ValidationErrors, parse_id, validate_non_empty, validate_proficiency,
    validate_skill_name,
};

/// Catalog entry; `name` is always lowercase
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub icon: Option<String>,
}

/// A user's proficiency and intent for one skill
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSkill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub proficiency: i16,
    pub is_teaching: bool,
    pub is_learning: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User skill joined with its catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct UserSkillWithSkill {
    #[serde(flatten)]
    pub user_skill: UserSkill,
    pub skill: Skill,
}

/// Result of an upsert: the stored row and whether it was newly inserted
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub user_skill: UserSkill,
    pub created: bool,
}

/// Request for adding or updating a skill on the caller's profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserSkillRequest {
    pub skill_id: Option<String>,
    pub proficiency: Option<i64>,
    pub is_teaching: Option<bool>,
    pub is_learning: Option<bool>,
}

/// Validated user skill upsert
///
/// Omitted flags keep their stored value on update and default to `false`
/// on insert.
#[derive(Debug, Clone)]
pub struct UpsertUserSkill {
    pub skill_id: Uuid,
    pub proficiency: i16,
    pub is_teaching: Option<bool>,
    pub is_learning: Option<bool>,
}

impl Validate for UpsertUserSkillRequest {
    type Output = UpsertUserSkill;

    fn validate(self) -> Result<UpsertUserSkill, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let skill_id = errors
            .required("skillId", self.skill_id)
            .and_then(|id| errors.check("skillId", parse_id("skillId", &id)));
        let proficiency = errors
            .required("proficiency", self.proficiency)
            .and_then(|p| errors.check("proficiency", validate_proficiency(p)));

        match (skill_id, proficiency) {
            (Some(skill_id), Some(proficiency)) if errors.is_empty() => Ok(UpsertUserSkill {
                skill_id,
                proficiency,
                is_teaching: self.is_teaching,
                is_learning: self.is_learning,
            }),
            _ => Err(errors),
        }
    }
}

/// Query string for removing a skill from the caller's profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserSkillQuery {
    pub skill_id: Option<String>,
}

impl Validate for RemoveUserSkillQuery {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let skill_id = errors
            .required("skillId", self.skill_id)
            .and_then(|id| errors.check("skillId", parse_id("skillId", &id)));

        skill_id.ok_or(errors)
    }
}

/// Request for creating a catalog skill
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

/// Validated catalog skill with a normalized name
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub category: String,
    pub icon: Option<String>,
}

impl Validate for CreateSkillRequest {
    type Output = NewSkill;

    fn validate(self) -> Result<NewSkill, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors
            .required("name", self.name)
            .and_then(|name| errors.check("name", validate_skill_name(&name)));
        let category = errors
            .required("category", self.category)
            .and_then(|category| {
                errors.check("category", validate_non_empty("category", &category))
            });
        let icon = self.icon.filter(|icon| !icon.trim().is_empty());

        match (name, category) {
            (Some(name), Some(category)) if errors.is_empty() => Ok(NewSkill {
                name,
                category,
                icon,
            }),
            _ => Err(errors),
        }
    }
}

/// Query parameters for browsing the catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl SkillQuery {
    /// Blank parameters are treated as absent
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.filter(|c| !c.trim().is_empty()),
            search: self
                .search
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}
