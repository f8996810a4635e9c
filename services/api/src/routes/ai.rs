//! AI recommendation proxy

use axum::{Json, extract::State};
use serde_json::Value;
use tracing::info;

use crate::{
    error::{ApiResult, internal},
    middleware::AuthUser,
    models::recommend::{MAX_TOKENS, RecommendRequest, SYSTEM_INSTRUCTION, TEMPERATURE},
    state::AppState,
    upstream::Prompt,
    validation::ValidatedJson,
};

/// Generate a recommendation of the requested type
pub async fn recommend(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecommendRequest>,
) -> ApiResult<Json<Value>> {
    info!("Generating {:?} recommendation for user {}", request.kind, user.id);

    let prompt = Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user: request.kind.prompt(&request.context),
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let text = state
        .text_generator
        .complete(&prompt)
        .await
        .map_err(internal("get recommendation"))?;

    Ok(Json(request.kind.shape_response(text)))
}
