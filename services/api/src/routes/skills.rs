//! Skill catalog and per-user skill handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult, internal},
    middleware::AuthUser,
    models::skill::{
        CreateSkillRequest, RemoveUserSkillQuery, Skill, SkillQuery, UpsertUserSkillRequest,
        UserSkillWithSkill,
    },
    state::AppState,
    validation::{Validate, ValidatedJson},
};

/// Browse the skill catalog
pub async fn list_skills(
    State(state): State<AppState>,
    Query(query): Query<SkillQuery>,
) -> ApiResult<Json<Vec<Skill>>> {
    let skills = state
        .skill_repository
        .list(&query.normalized())
        .await
        .map_err(internal("list skills"))?;

    Ok(Json(skills))
}

/// Add a skill to the catalog
pub async fn create_skill(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(skill): ValidatedJson<CreateSkillRequest>,
) -> ApiResult<impl IntoResponse> {
    let created = state
        .skill_repository
        .create(&skill)
        .await
        .map_err(internal("create skill"))?
        .ok_or_else(|| ApiError::Conflict("Skill already exists".to_string()))?;

    info!("User {} added skill {} to the catalog", user.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's skills
pub async fn list_user_skills(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserSkillWithSkill>>> {
    let skills = state
        .skill_repository
        .list_for_user(user.id)
        .await
        .map_err(internal("fetch user skills"))?;

    Ok(Json(skills))
}

/// Add a skill to the caller's profile, or update it if already present
pub async fn upsert_user_skill(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(upsert): ValidatedJson<UpsertUserSkillRequest>,
) -> ApiResult<impl IntoResponse> {
    let skill = state
        .skill_repository
        .find_by_id(upsert.skill_id)
        .await
        .map_err(internal("fetch skill"))?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;

    state
        .user_repository
        .provision(&user)
        .await
        .map_err(internal("provision user"))?;

    let outcome = state
        .skill_repository
        .upsert_for_user(user.id, &upsert)
        .await
        .map_err(internal("save user skill"))?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(UserSkillWithSkill {
            user_skill: outcome.user_skill,
            skill,
        }),
    ))
}

/// Remove a skill from the caller's profile
pub async fn remove_user_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RemoveUserSkillQuery>,
) -> ApiResult<impl IntoResponse> {
    let skill_id = query.validate()?;

    let removed = state
        .skill_repository
        .remove_for_user(user.id, skill_id)
        .await
        .map_err(internal("remove user skill"))?;

    if removed {
        Ok(Json(json!({ "message": "Skill removed successfully" })))
    } else {
        Err(ApiError::NotFound(
            "Skill not found in your profile".to_string(),
        ))
    }
}
