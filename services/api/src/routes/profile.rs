//! Profile handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::{ApiError, ApiResult, internal},
    middleware::AuthUser,
    models::user::{ProfileResponse, SetupProfileRequest, UpdateProfileRequest, User},
    state::AppState,
    validation::ValidatedJson,
};

const ALREADY_SET_UP: &str = "Profile already set up. Use PATCH to update.";

/// Get the caller's profile together with their skills
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(internal("fetch profile"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let skills = state
        .skill_repository
        .list_for_user(user.id)
        .await
        .map_err(internal("fetch profile skills"))?;

    Ok(Json(ProfileResponse {
        user: profile,
        skills,
    }))
}

/// One-time profile setup
pub async fn setup_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(profile): ValidatedJson<SetupProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(internal("fetch user"))?;

    if existing.as_ref().is_some_and(User::has_profile) {
        return Err(ApiError::Conflict(ALREADY_SET_UP.to_string()));
    }

    let created = state
        .user_repository
        .setup_profile(&user, &profile)
        .await
        .map_err(internal("set up profile"))?
        // lost a race with a concurrent setup
        .ok_or_else(|| ApiError::Conflict(ALREADY_SET_UP.to_string()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Partial profile update
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(update): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let updated = state
        .user_repository
        .update_profile(user.id, &update)
        .await
        .map_err(internal("update profile"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated))
}
