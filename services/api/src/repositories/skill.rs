//! Skill catalog and user skill repository

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::skill::{
    NewSkill, Skill, SkillQuery, UpsertOutcome, UpsertUserSkill, UserSkill, UserSkillWithSkill,
};

/// Escape `LIKE` wildcards so user input only matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Catalog listing query for the given filters
pub fn list_query(query: &SkillQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, name, category, icon FROM skills WHERE TRUE");

    if let Some(category) = &query.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }

    if let Some(search) = &query.search {
        builder
            .push(" AND name LIKE ")
            .push_bind(format!("%{}%", escape_like(search)))
            .push(r" ESCAPE '\'");
    }

    builder.push(" ORDER BY name ASC");
    builder
}

/// Skill repository
#[derive(Clone)]
pub struct SkillRepository {
    pool: PgPool,
}

impl SkillRepository {
    /// Create a new skill repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Browse the catalog
    pub async fn list(&self, query: &SkillQuery) -> Result<Vec<Skill>> {
        let mut builder = list_query(query);
        let skills = builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await?;

        Ok(skills)
    }

    /// Find a catalog skill by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category, icon
            FROM skills
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(skill)
    }

    /// Add a skill to the catalog
    ///
    /// Returns `None` if a skill with the same normalized name exists.
    pub async fn create(&self, skill: &NewSkill) -> Result<Option<Skill>> {
        info!("Creating skill: {}", skill.name);

        let created = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (id, name, category, icon)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, category, icon
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&skill.name)
        .bind(&skill.category)
        .bind(&skill.icon)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    /// All skills on a user's profile, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserSkillWithSkill>> {
        let rows = sqlx::query(
            r#"
            SELECT us.id, us.user_id, us.skill_id, us.proficiency, us.is_teaching,
                   us.is_learning, us.created_at, us.updated_at,
                   s.name AS skill_name, s.category AS skill_category, s.icon AS skill_icon
            FROM user_skills us
            JOIN skills s ON s.id = us.skill_id
            WHERE us.user_id = $1
            ORDER BY us.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let skills = rows
            .into_iter()
            .map(|row| UserSkillWithSkill {
                user_skill: UserSkill {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    skill_id: row.get("skill_id"),
                    proficiency: row.get("proficiency"),
                    is_teaching: row.get("is_teaching"),
                    is_learning: row.get("is_learning"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                },
                skill: Skill {
                    id: row.get("skill_id"),
                    name: row.get("skill_name"),
                    category: row.get("skill_category"),
                    icon: row.get("skill_icon"),
                },
            })
            .collect();

        Ok(skills)
    }

    /// Insert or update the (user, skill) pair in one statement
    ///
    /// Omitted flags default to `false` on insert and keep their stored value
    /// on update.
    pub async fn upsert_for_user(
        &self,
        user_id: Uuid,
        upsert: &UpsertUserSkill,
    ) -> Result<UpsertOutcome> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_skills (id, user_id, skill_id, proficiency, is_teaching, is_learning)
            VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), COALESCE($6, FALSE))
            ON CONFLICT (user_id, skill_id) DO UPDATE
            SET proficiency = EXCLUDED.proficiency,
                is_teaching = COALESCE($5, user_skills.is_teaching),
                is_learning = COALESCE($6, user_skills.is_learning),
                updated_at = NOW()
            RETURNING id, user_id, skill_id, proficiency, is_teaching, is_learning,
                      created_at, updated_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(upsert.skill_id)
        .bind(upsert.proficiency)
        .bind(upsert.is_teaching)
        .bind(upsert.is_learning)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpsertOutcome {
            user_skill: UserSkill {
                id: row.get("id"),
                user_id: row.get("user_id"),
                skill_id: row.get("skill_id"),
                proficiency: row.get("proficiency"),
                is_teaching: row.get("is_teaching"),
                is_learning: row.get("is_learning"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            },
            created: row.get("inserted"),
        })
    }

    /// Remove a skill from a user's profile; `false` if it was not there
    pub async fn remove_for_user(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_skills
            WHERE user_id = $1 AND skill_id = $2
            "#,
        )
        .bind(user_id)
        .bind(skill_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::UserRepository,
        test_support::{database_pool, test_caller},
    };

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("c++"), "c++");
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
    }

    #[test]
    fn test_list_query_without_filters() {
        let builder = list_query(&SkillQuery::default());
        assert_eq!(
            builder.sql(),
            "SELECT id, name, category, icon FROM skills WHERE TRUE ORDER BY name ASC"
        );
    }

    #[test]
    fn test_list_query_with_filters() {
        let builder = list_query(&SkillQuery {
            category: Some("Programming".to_string()),
            search: Some("py".to_string()),
        });
        assert_eq!(
            builder.sql(),
            "SELECT id, name, category, icon FROM skills WHERE TRUE AND category = $1 \
             AND name LIKE $2 ESCAPE '\\' ORDER BY name ASC"
        );
    }

    async fn new_skill(repo: &SkillRepository) -> Skill {
        repo.create(&NewSkill {
            name: format!("skill-{}", Uuid::new_v4()),
            category: "Testing".to_string(),
            icon: None,
        })
        .await
        .unwrap()
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_create_rejects_duplicate_name() {
        let repo = SkillRepository::new(database_pool().await);
        let name = format!("python-{}", Uuid::new_v4());
        let skill = NewSkill {
            name,
            category: "Programming".to_string(),
            icon: None,
        };

        assert!(repo.create(&skill).await.unwrap().is_some());
        assert!(repo.create(&skill).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_upsert_twice_keeps_one_row() {
        let pool = database_pool().await;
        let users = UserRepository::new(pool.clone());
        let repo = SkillRepository::new(pool);
        let caller = test_caller();
        users.provision(&caller).await.unwrap();
        let skill = new_skill(&repo).await;

        let first = repo
            .upsert_for_user(
                caller.id,
                &UpsertUserSkill {
                    skill_id: skill.id,
                    proficiency: 4,
                    is_teaching: Some(true),
                    is_learning: None,
                },
            )
            .await
            .unwrap();
        assert!(first.created);
        assert!(first.user_skill.is_teaching);
        assert!(!first.user_skill.is_learning);

        let second = repo
            .upsert_for_user(
                caller.id,
                &UpsertUserSkill {
                    skill_id: skill.id,
                    proficiency: 2,
                    is_teaching: None,
                    is_learning: Some(true),
                },
            )
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.user_skill.id, first.user_skill.id);
        assert_eq!(second.user_skill.proficiency, 2);
        assert!(second.user_skill.is_teaching);
        assert!(second.user_skill.is_learning);

        let listed = repo.list_for_user(caller.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].skill.name, skill.name);

        assert!(repo.remove_for_user(caller.id, skill.id).await.unwrap());
        assert!(!repo.remove_for_user(caller.id, skill.id).await.unwrap());
    }
}
