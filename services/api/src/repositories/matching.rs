//! Match history repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    matching::{Match, MatchHistoryEntry, NewMatch, SkillSummary},
    user::UserSummary,
};

fn user_summary(row: &PgRow, prefix: &str) -> UserSummary {
    let column = |name: &str| format!("{}_{}", prefix, name);

    UserSummary {
        id: row.get(column("id").as_str()),
        name: row.get(column("name").as_str()),
        email: row.get(column("email").as_str()),
        image: row.get(column("image").as_str()),
        year: row.get(column("year").as_str()),
        branch: row.get(column("branch").as_str()),
    }
}

/// Match repository
#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Create a new match repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a match by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Match>> {
        let found = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, seeker_id, mentor_id, skill_id, match_score, connection_degree, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    /// Record a match with `seeker_id` as the seeker
    pub async fn create(&self, seeker_id: Uuid, new_match: &NewMatch) -> Result<Match> {
        info!(
            "Recording match: seeker {} mentor {} skill {}",
            seeker_id, new_match.mentor_id, new_match.skill_id
        );

        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, seeker_id, mentor_id, skill_id, match_score, connection_degree)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, seeker_id, mentor_id, skill_id, match_score, connection_degree, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seeker_id)
        .bind(new_match.mentor_id)
        .bind(new_match.skill_id)
        .bind(new_match.match_score)
        .bind(new_match.connection_degree)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Matches where the user is seeker or mentor, newest first
    pub async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<MatchHistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.match_score, m.connection_degree, m.created_at,
                   s.id AS seeker_id, s.name AS seeker_name, s.email AS seeker_email,
                   s.image AS seeker_image, s.year AS seeker_year, s.branch AS seeker_branch,
                   t.id AS mentor_id, t.name AS mentor_name, t.email AS mentor_email,
                   t.image AS mentor_image, t.year AS mentor_year, t.branch AS mentor_branch,
                   k.id AS skill_id, k.name AS skill_name, k.category AS skill_category
            FROM matches m
            JOIN users s ON s.id = m.seeker_id
            JOIN users t ON t.id = m.mentor_id
            JOIN skills k ON k.id = m.skill_id
            WHERE m.seeker_id = $1 OR m.mentor_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let history = rows
            .into_iter()
            .map(|row| MatchHistoryEntry {
                id: row.get("id"),
                seeker: user_summary(&row, "seeker"),
                mentor: user_summary(&row, "mentor"),
                skill: SkillSummary {
                    id: row.get("skill_id"),
                    name: row.get("skill_name"),
                    category: row.get("skill_category"),
                },
                match_score: row.get("match_score"),
                connection_degree: row.get("connection_degree"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::skill::NewSkill,
        repositories::{SkillRepository, UserRepository},
        test_support::{database_pool, test_caller},
    };

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_history_is_visible_to_both_participants() {
        let pool = database_pool().await;
        let users = UserRepository::new(pool.clone());
        let skills = SkillRepository::new(pool.clone());
        let repo = MatchRepository::new(pool);

        let seeker = test_caller();
        let mentor = test_caller();
        users.provision(&seeker).await.unwrap();
        users.provision(&mentor).await.unwrap();
        let skill = skills
            .create(&NewSkill {
                name: format!("react-{}", Uuid::new_v4()),
                category: "Web".to_string(),
                icon: None,
            })
            .await
            .unwrap()
            .unwrap();

        let recorded = repo
            .create(
                seeker.id,
                &NewMatch {
                    mentor_id: mentor.id,
                    skill_id: skill.id,
                    match_score: Some(87.5),
                    connection_degree: Some(2),
                },
            )
            .await
            .unwrap();
        assert!(recorded.involves(mentor.id));

        for user in [&seeker, &mentor] {
            let history = repo.history_for_user(user.id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].seeker.id, seeker.id);
            assert_eq!(history[0].mentor.email, mentor.email);
            assert_eq!(history[0].skill.name, skill.name);
        }

        let found = repo.find_by_id(recorded.id).await.unwrap().unwrap();
        assert_eq!(found.connection_degree, Some(2));
    }
}
