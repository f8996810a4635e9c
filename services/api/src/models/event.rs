//! Community event models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, parse_event_date, validate_non_empty};

/// Event entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub is_online: bool,
    pub link: Option<String>,
    pub organizer: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    pub category: Option<String>,
    /// Comma-separated tag list; an event matches if it has any of them
    pub tags: Option<String>,
    /// Only `"true"` enables the upcoming filter
    pub upcoming: Option<String>,
}

/// Parsed event filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub upcoming_only: bool,
}

impl From<EventQuery> for EventFilter {
    fn from(query: EventQuery) -> Self {
        let tags = query
            .tags
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            category: query.category.filter(|c| !c.is_empty()),
            tags,
            upcoming_only: query.upcoming.as_deref() == Some("true"),
        }
    }
}

/// Request for creating an event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub is_online: Option<bool>,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

/// Validated event creation
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub is_online: bool,
    pub link: Option<String>,
    pub image_url: Option<String>,
}

impl Validate for CreateEventRequest {
    type Output = NewEvent;

    fn validate(self) -> Result<NewEvent, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mut text = |field: &'static str, value: Option<String>| {
            errors
                .required(field, value)
                .and_then(|value| errors.check(field, validate_non_empty(field, &value)))
        };

        let title = text("title", self.title);
        let description = text("description", self.description);
        let category = text("category", self.category);
        let organizer = text("organizer", self.organizer);
        let date = errors
            .required("date", self.date)
            .and_then(|date| errors.check("date", parse_event_date(&date)));

        let mut tags: Vec<String> = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        match (title, description, category, organizer, date) {
            (Some(title), Some(description), Some(category), Some(organizer), Some(date))
                if errors.is_empty() =>
            {
                Ok(NewEvent {
                    title,
                    description,
                    category,
                    date,
                    organizer,
                    tags,
                    location: self.location,
                    is_online: self.is_online.unwrap_or(false),
                    link: self.link,
                    image_url: self.image_url,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            title: Some("Rust Meetup".to_string()),
            description: Some("Ownership without tears".to_string()),
            category: Some("workshop".to_string()),
            date: Some("2026-11-20".to_string()),
            organizer: Some("Coding Club".to_string()),
            tags: None,
            location: None,
            is_online: None,
            link: None,
            image_url: None,
        }
    }

    #[test]
    fn test_filter_parses_tags_and_upcoming() {
        let filter = EventFilter::from(EventQuery {
            category: Some("hackathon".to_string()),
            tags: Some("rust, web,,ai ".to_string()),
            upcoming: Some("true".to_string()),
        });

        assert_eq!(filter.category.as_deref(), Some("hackathon"));
        assert_eq!(filter.tags, vec!["rust", "web", "ai"]);
        assert!(filter.upcoming_only);
    }

    #[test]
    fn test_filter_upcoming_only_for_literal_true() {
        let filter = EventFilter::from(EventQuery {
            upcoming: Some("1".to_string()),
            ..Default::default()
        });
        assert!(!filter.upcoming_only);
        assert!(filter.tags.is_empty());
    }

    #[test]
    fn test_create_defaults() {
        let event = request().validate().unwrap();
        assert!(event.tags.is_empty());
        assert!(!event.is_online);
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = CreateEventRequest {
            title: None,
            description: None,
            category: None,
            date: None,
            organizer: None,
            ..request()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            errors.fields(),
            vec!["title", "description", "category", "organizer", "date"]
        );
    }

    #[test]
    fn test_create_rejects_unparseable_date() {
        let errors = CreateEventRequest {
            date: Some("soon".to_string()),
            ..request()
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.fields(), vec!["date"]);
    }
}
