//! Event handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{ApiResult, internal},
    middleware::AuthUser,
    models::event::{CreateEventRequest, Event, EventFilter, EventQuery},
    state::AppState,
    validation::ValidatedJson,
};

/// List events; public
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = state
        .event_repository
        .list(&EventFilter::from(query))
        .await
        .map_err(internal("list events"))?;

    Ok(Json(events))
}

/// Create an event
pub async fn create_event(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(event): ValidatedJson<CreateEventRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .user_repository
        .provision(&user)
        .await
        .map_err(internal("provision user"))?;

    let created = state
        .event_repository
        .create(user.id, &event)
        .await
        .map_err(internal("create event"))?;

    Ok((StatusCode::CREATED, Json(created)))
}
