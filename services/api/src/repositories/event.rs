//! Event repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::event::{Event, EventFilter, NewEvent};

/// Maximum number of events returned by a listing
pub const EVENT_LIST_LIMIT: i64 = 20;

/// Listing query: filters are ANDed, tags match if any overlaps
pub fn list_query(filter: &EventFilter, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, title, description, category, tags, date, location, is_online, link, \
         organizer, image_url, created_at FROM events WHERE TRUE",
    );

    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }

    if !filter.tags.is_empty() {
        builder.push(" AND tags && ").push_bind(filter.tags.clone());
    }

    if filter.upcoming_only {
        builder.push(" AND date >= ").push_bind(now);
    }

    builder
        .push(" ORDER BY date ASC LIMIT ")
        .push_bind(EVENT_LIST_LIMIT);
    builder
}

/// Event repository
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List events matching the filter, soonest first
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut builder = list_query(filter, Utc::now());
        let events = builder
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Create an event on behalf of `created_by`
    pub async fn create(&self, created_by: Uuid, event: &NewEvent) -> Result<Event> {
        info!("Creating event: {}", event.title);

        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, description, category, tags, date, location,
                                is_online, link, organizer, image_url, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, description, category, tags, date, location, is_online, link,
                      organizer, image_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.tags)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.is_online)
        .bind(&event.link)
        .bind(&event.organizer)
        .bind(&event.image_url)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
