//! Peer rating handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{ApiError, ApiResult, internal},
    middleware::AuthUser,
    models::rating::{RatingOutcome, RatingsQuery, RatingsResponse, SubmitRatingRequest},
    state::AppState,
    validation::{Validate, ValidatedJson},
};

/// Rate the other participant of a match
pub async fn submit_rating(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(rating): ValidatedJson<SubmitRatingRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = state
        .match_repository
        .find_by_id(rating.match_id)
        .await
        .map_err(internal("fetch match"))?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    if !session.involves(user.id) {
        return Err(ApiError::Forbidden(
            "You are not part of this session".to_string(),
        ));
    }

    if rating.ratee_id == user.id {
        return Err(ApiError::BadRequest("You cannot rate yourself".to_string()));
    }

    if !session.involves(rating.ratee_id) {
        return Err(ApiError::BadRequest(
            "rateeId must be the other participant of this session".to_string(),
        ));
    }

    let outcome = state
        .rating_repository
        .submit(user.id, &rating)
        .await
        .map_err(internal("submit rating"))?;

    match outcome {
        RatingOutcome::Created(created) => Ok((StatusCode::CREATED, Json(created))),
        RatingOutcome::Duplicate => Err(ApiError::Conflict(
            "You have already rated this session".to_string(),
        )),
    }
}

/// Ratings received by a user with per-dimension averages; public
pub async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<RatingsQuery>,
) -> ApiResult<Json<RatingsResponse>> {
    let user_id = query.validate()?;

    let ratings = state
        .rating_repository
        .list_for_ratee(user_id)
        .await
        .map_err(internal("fetch ratings"))?;

    Ok(Json(RatingsResponse::new(ratings)))
}

#[cfg(test)]
mod tests {
    use crate::middleware::AuthUser;
    use crate::models::{matching::NewMatch, skill::NewSkill};
    use crate::repositories::{MatchRepository, SkillRepository, UserRepository};
    use crate::routes::create_router;
    use crate::test_support::{
        database_pool, database_state, default_state, request, send, test_caller, token_for,
    };
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use uuid::Uuid;

    fn body() -> Value {
        json!({
            "matchId": Uuid::new_v4(),
            "rateeId": Uuid::new_v4(),
            "teachingScore": 5,
            "patienceScore": 4,
            "clarityScore": 4,
            "punctualityScore": 3
        })
    }

    #[tokio::test]
    async fn test_submit_requires_auth() {
        let app = create_router(default_state());
        let (status, _) = send(app, request(Method::POST, "/ratings", None, Some(body()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_rejects_score_out_of_range() {
        let app = create_router(default_state());
        let token = token_for(Uuid::new_v4(), "asha_k@srmap.edu.in");
        let mut payload = body();
        payload["clarityScore"] = json!(0);

        let (status, body) = send(
            app,
            request(Method::POST, "/ratings", Some(&token), Some(payload)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "clarityScore must be between 1 and 5");
    }

    #[tokio::test]
    async fn test_submit_rejects_long_comment() {
        let app = create_router(default_state());
        let token = token_for(Uuid::new_v4(), "asha_k@srmap.edu.in");
        let mut payload = body();
        payload["comment"] = json!("great ".repeat(100));

        let (status, body) = send(
            app,
            request(Method::POST, "/ratings", Some(&token), Some(payload)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "comment");
    }

    #[tokio::test]
    async fn test_list_requires_user_id() {
        let app = create_router(default_state());
        let (status, body) = send(app, request(Method::GET, "/ratings", None, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId is required");
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_user_id() {
        let app = create_router(default_state());
        let (status, body) = send(
            app,
            request(Method::GET, "/ratings?userId=asha", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId must be a valid id");
    }

    fn rating_for(match_id: Uuid, ratee_id: Uuid) -> Value {
        json!({
            "matchId": match_id,
            "rateeId": ratee_id,
            "teachingScore": 5,
            "patienceScore": 4,
            "clarityScore": 4,
            "punctualityScore": 3
        })
    }

    fn token(user: &AuthUser) -> String {
        token_for(user.id, &user.email)
    }

    async fn ratings_on(pool: &PgPool, match_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE match_id = $1")
            .bind(match_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// Seeker and mentor joined by a recorded match, plus an outsider
    async fn recorded_match(pool: &PgPool) -> (AuthUser, AuthUser, AuthUser, Uuid) {
        let users = UserRepository::new(pool.clone());
        let (seeker, mentor, outsider) = (test_caller(), test_caller(), test_caller());
        for user in [&seeker, &mentor, &outsider] {
            users.provision(user).await.unwrap();
        }

        let skill = SkillRepository::new(pool.clone())
            .create(&NewSkill {
                name: format!("go-{}", Uuid::new_v4()),
                category: "Programming".to_string(),
                icon: None,
            })
            .await
            .unwrap()
            .unwrap();
        let recorded = MatchRepository::new(pool.clone())
            .create(
                seeker.id,
                &NewMatch {
                    mentor_id: mentor.id,
                    skill_id: skill.id,
                    match_score: None,
                    connection_degree: None,
                },
            )
            .await
            .unwrap();

        (seeker, mentor, outsider, recorded.id)
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_outsider_is_forbidden_and_nothing_is_stored() {
        let pool = database_pool().await;
        let (_, mentor, outsider, match_id) = recorded_match(&pool).await;
        let app = create_router(database_state(pool.clone()));

        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/ratings",
                Some(&token(&outsider)),
                Some(rating_for(match_id, mentor.id)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "You are not part of this session");
        assert_eq!(ratings_on(&pool, match_id).await, 0);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_unknown_match_is_not_found() {
        let pool = database_pool().await;
        let (seeker, mentor, _, _) = recorded_match(&pool).await;
        let app = create_router(database_state(pool));

        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/ratings",
                Some(&token(&seeker)),
                Some(rating_for(Uuid::new_v4(), mentor.id)),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Match not found");
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_ratee_must_be_the_other_participant() {
        let pool = database_pool().await;
        let (seeker, _, outsider, match_id) = recorded_match(&pool).await;
        let app = create_router(database_state(pool.clone()));

        let (status, body) = send(
            app.clone(),
            request(
                Method::POST,
                "/ratings",
                Some(&token(&seeker)),
                Some(rating_for(match_id, seeker.id)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You cannot rate yourself");

        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/ratings",
                Some(&token(&seeker)),
                Some(rating_for(match_id, outsider.id)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "rateeId must be the other participant of this session"
        );
        assert_eq!(ratings_on(&pool, match_id).await, 0);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_second_rating_conflicts_and_trust_score_updates_once() {
        let pool = database_pool().await;
        let (seeker, mentor, _, match_id) = recorded_match(&pool).await;
        let app = create_router(database_state(pool.clone()));
        let submit = || {
            request(
                Method::POST,
                "/ratings",
                Some(&token(&seeker)),
                Some(rating_for(match_id, mentor.id)),
            )
        };

        let (status, body) = send(app.clone(), submit()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rateeId"], json!(mentor.id));

        let (status, body) = send(app, submit()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "You have already rated this session");

        assert_eq!(ratings_on(&pool, match_id).await, 1);
        let stored = UserRepository::new(pool)
            .find_by_id(mentor.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.trust_score, 80);
        assert_eq!(stored.total_sessions, 1);
    }
}
