//! User repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::AuthUser,
    models::user::{SetupProfile, UpdateProfile, User},
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, image, year, branch, bio, trust_score, total_sessions,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Make sure a row exists for an authenticated caller
    ///
    /// The auth provider owns identity; rows are created here the first time
    /// a caller writes something that references them.
    pub async fn provision(&self, caller: &AuthUser) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(caller.id)
        .bind(&caller.email)
        .bind(caller.display_name())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Provisioned user {}", caller.id);
        }

        Ok(())
    }

    /// Run the one-time profile setup
    ///
    /// Returns `None` when the user already has both year and branch set.
    /// The check and the write are one statement, so two concurrent setups
    /// cannot both succeed.
    pub async fn setup_profile(
        &self,
        caller: &AuthUser,
        profile: &SetupProfile,
    ) -> Result<Option<User>> {
        info!("Setting up profile for user {}", caller.id);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, year, branch, bio)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                year = EXCLUDED.year,
                branch = EXCLUDED.branch,
                bio = EXCLUDED.bio,
                updated_at = NOW()
            WHERE users.year IS NULL OR users.branch IS NULL OR users.branch = ''
            RETURNING id, email, name, image, year, branch, bio, trust_score, total_sessions,
                      created_at, updated_at
            "#,
        )
        .bind(caller.id)
        .bind(&caller.email)
        .bind(&profile.name)
        .bind(profile.year)
        .bind(&profile.branch)
        .bind(&profile.bio)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Apply a partial profile update; `None` when the user does not exist
    pub async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                branch = COALESCE($4, branch),
                bio = COALESCE($5, bio),
                image = COALESCE($6, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, image, year, branch, bio, trust_score, total_sessions,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.year)
        .bind(&update.branch)
        .bind(&update.bio)
        .bind(&update.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
