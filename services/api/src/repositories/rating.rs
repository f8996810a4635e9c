//! Rating repository: peer ratings and trust score bookkeeping

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::rating::{
    NewRating, RaterSummary, Rating, RatingOutcome, RatingWithRater, trust_score,
};

/// Rating repository
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Create a new rating repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a rating and fold it into the ratee's trust score
    ///
    /// The insert, the running totals and the recomputed score are written in
    /// one transaction. Concurrent ratings for the same ratee serialize on the
    /// user row lock.
    pub async fn submit(&self, rater_id: Uuid, rating: &NewRating) -> Result<RatingOutcome> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (id, match_id, rater_id, ratee_id, teaching_score,
                                 patience_score, clarity_score, punctuality_score, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (match_id, rater_id) DO NOTHING
            RETURNING id, match_id, rater_id, ratee_id, teaching_score, patience_score,
                      clarity_score, punctuality_score, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(rating.match_id)
        .bind(rater_id)
        .bind(rating.ratee_id)
        .bind(rating.scores.teaching)
        .bind(rating.scores.patience)
        .bind(rating.scores.clarity)
        .bind(rating.scores.punctuality)
        .bind(&rating.comment)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(created) = created else {
            tx.rollback().await?;
            return Ok(RatingOutcome::Duplicate);
        };

        let totals = sqlx::query(
            r#"
            UPDATE users
            SET rating_points = rating_points + $2,
                rating_count = rating_count + 1,
                total_sessions = total_sessions + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING rating_points, rating_count
            "#,
        )
        .bind(rating.ratee_id)
        .bind(rating.scores.total())
        .fetch_one(&mut *tx)
        .await?;

        let score = trust_score(totals.get("rating_points"), totals.get("rating_count"));

        sqlx::query("UPDATE users SET trust_score = $2 WHERE id = $1")
            .bind(rating.ratee_id)
            .bind(score)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Rating {} stored; trust score of {} is now {}",
            created.id, rating.ratee_id, score
        );

        Ok(RatingOutcome::Created(created))
    }

    /// Ratings received by a user, newest first, with the rater's identity
    pub async fn list_for_ratee(&self, user_id: Uuid) -> Result<Vec<RatingWithRater>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.match_id, r.rater_id, r.ratee_id, r.teaching_score, r.patience_score,
                   r.clarity_score, r.punctuality_score, r.comment, r.created_at,
                   u.name AS rater_name, u.image AS rater_image
            FROM ratings r
            JOIN users u ON u.id = r.rater_id
            WHERE r.ratee_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let ratings = rows
            .into_iter()
            .map(|row| RatingWithRater {
                rater: RaterSummary {
                    id: row.get("rater_id"),
                    name: row.get("rater_name"),
                    image: row.get("rater_image"),
                },
                rating: Rating {
                    id: row.get("id"),
                    match_id: row.get("match_id"),
                    rater_id: row.get("rater_id"),
                    ratee_id: row.get("ratee_id"),
                    teaching_score: row.get("teaching_score"),
                    patience_score: row.get("patience_score"),
                    clarity_score: row.get("clarity_score"),
                    punctuality_score: row.get("punctuality_score"),
                    comment: row.get("comment"),
                    created_at: row.get("created_at"),
                },
            })
            .collect();

        Ok(ratings)
    }
}
