//! Match-finding proxy and match history handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult, internal},
    middleware::AuthUser,
    models::matching::{FindMatchesRequest, MatchHistoryEntry, MatchRequest, RecordMatchRequest},
    state::AppState,
    validation::ValidatedJson,
};

/// Ask the recommendation service for mentors; the answer is relayed as-is
pub async fn find_matches(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(find): ValidatedJson<FindMatchesRequest>,
) -> ApiResult<Json<Value>> {
    let request = MatchRequest {
        user_id: user.id.to_string(),
        skill_name: find.skill_name,
        limit: find.limit,
    };

    let matches = state.recommender.find_matches(&request).await?;
    Ok(Json(matches))
}

/// Matches where the caller is seeker or mentor
pub async fn match_history(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MatchHistoryEntry>>> {
    let history = state
        .match_repository
        .history_for_user(user.id)
        .await
        .map_err(internal("fetch matches"))?;

    Ok(Json(history))
}

/// Record the mentor the caller picked
pub async fn record_match(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(new_match): ValidatedJson<RecordMatchRequest>,
) -> ApiResult<impl IntoResponse> {
    if new_match.mentor_id == user.id {
        return Err(ApiError::BadRequest(
            "You cannot match with yourself".to_string(),
        ));
    }

    state
        .user_repository
        .find_by_id(new_match.mentor_id)
        .await
        .map_err(internal("fetch mentor"))?
        .ok_or_else(|| ApiError::NotFound("Mentor not found".to_string()))?;

    state
        .skill_repository
        .find_by_id(new_match.skill_id)
        .await
        .map_err(internal("fetch skill"))?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;

    state
        .user_repository
        .provision(&user)
        .await
        .map_err(internal("provision user"))?;

    let recorded = state
        .match_repository
        .create(user.id, &new_match)
        .await
        .map_err(internal("record match"))?;

    Ok((StatusCode::CREATED, Json(recorded)))
}
