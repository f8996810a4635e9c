//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    middleware::JwtVerifier,
    repositories::{
        EventRepository, MatchRepository, RatingRepository, SkillRepository, UserRepository,
    },
    upstream::{Recommender, TextGenerator},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub skill_repository: SkillRepository,
    pub event_repository: EventRepository,
    pub match_repository: MatchRepository,
    pub rating_repository: RatingRepository,
    pub recommender: Arc<dyn Recommender>,
    pub text_generator: Arc<dyn TextGenerator>,
    pub jwt_verifier: JwtVerifier,
}

impl AppState {
    /// Build the state around one pool shared by every repository
    pub fn new(
        db_pool: PgPool,
        recommender: Arc<dyn Recommender>,
        text_generator: Arc<dyn TextGenerator>,
        jwt_verifier: JwtVerifier,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            skill_repository: SkillRepository::new(db_pool.clone()),
            event_repository: EventRepository::new(db_pool.clone()),
            match_repository: MatchRepository::new(db_pool.clone()),
            rating_repository: RatingRepository::new(db_pool.clone()),
            db_pool,
            recommender,
            text_generator,
            jwt_verifier,
        }
    }
}
