//! API service routes
//!
//! Handlers take the caller identity first and the validated body last, so an
//! unauthenticated request is rejected before its payload is looked at.

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{error::ApiResult, middleware::request_logger, state::AppState};

pub mod ai;
pub mod events;
pub mod matches;
pub mod profile;
pub mod ratings;
pub mod skills;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/skills",
            get(skills::list_skills).post(skills::create_skill),
        )
        .route(
            "/user/skills",
            get(skills::list_user_skills)
                .post(skills::upsert_user_skill)
                .delete(skills::remove_user_skill),
        )
        .route(
            "/user/profile",
            get(profile::get_profile)
                .post(profile::setup_profile)
                .patch(profile::update_profile),
        )
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/matches",
            get(matches::match_history).post(matches::find_matches),
        )
        .route("/matches/record", post(matches::record_match))
        .route(
            "/ratings",
            get(ratings::list_ratings).post(ratings::submit_rating),
        )
        .route("/ai/recommend", post(ai::recommend))
        .layer(middleware::from_fn(request_logger))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let database = common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "skillsync-api",
        "database": database,
    })))
}
