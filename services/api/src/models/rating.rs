//! Peer rating and trust score models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{
    MAX_COMMENT_LENGTH, Validate, ValidationErrors, parse_id, validate_max_length, validate_score,
};

/// Rating entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub match_id: Uuid,
    pub rater_id: Uuid,
    pub ratee_id: Uuid,
    pub teaching_score: i16,
    pub patience_score: i16,
    pub clarity_score: i16,
    pub punctuality_score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn scores(&self) -> RatingScores {
        RatingScores {
            teaching: self.teaching_score,
            patience: self.patience_score,
            clarity: self.clarity_score,
            punctuality: self.punctuality_score,
        }
    }
}

/// The four rated dimensions, each 1-5
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScores {
    pub teaching: i16,
    pub patience: i16,
    pub clarity: i16,
    pub punctuality: i16,
}

impl RatingScores {
    /// Sum of the four dimensions (4-20)
    pub fn total(&self) -> i64 {
        i64::from(self.teaching)
            + i64::from(self.patience)
            + i64::from(self.clarity)
            + i64::from(self.punctuality)
    }
}

/// Trust score from the running rating totals
///
/// `points` is the sum of every rating's four-score total. The result equals
/// `round(20 * mean of per-rating averages)`, so it stays within 0-100.
pub fn trust_score(points: i64, count: i64) -> i32 {
    if count <= 0 {
        return 0;
    }
    (5.0 * points as f64 / count as f64).round() as i32
}

/// Rater identity embedded in rating listings
#[derive(Debug, Clone, Serialize)]
pub struct RaterSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

/// Rating joined with the rater
#[derive(Debug, Clone, Serialize)]
pub struct RatingWithRater {
    #[serde(flatten)]
    pub rating: Rating,
    pub rater: RaterSummary,
}

/// Per-dimension averages over a user's ratings; all zero when unrated
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingAverages {
    pub teaching: f64,
    pub patience: f64,
    pub clarity: f64,
    pub punctuality: f64,
    pub overall: f64,
}

impl RatingAverages {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = RatingScores>,
    {
        let mut count = 0u32;
        let mut totals = [0i64; 4];

        for s in scores {
            count += 1;
            totals[0] += i64::from(s.teaching);
            totals[1] += i64::from(s.patience);
            totals[2] += i64::from(s.clarity);
            totals[3] += i64::from(s.punctuality);
        }

        if count == 0 {
            return Self::default();
        }

        let n = f64::from(count);
        let teaching = totals[0] as f64 / n;
        let patience = totals[1] as f64 / n;
        let clarity = totals[2] as f64 / n;
        let punctuality = totals[3] as f64 / n;

        Self {
            teaching,
            patience,
            clarity,
            punctuality,
            overall: (teaching + patience + clarity + punctuality) / 4.0,
        }
    }
}

/// Response for a user's ratings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsResponse {
    pub ratings: Vec<RatingWithRater>,
    pub averages: RatingAverages,
    pub total_ratings: usize,
}

impl RatingsResponse {
    pub fn new(ratings: Vec<RatingWithRater>) -> Self {
        let averages = RatingAverages::from_scores(ratings.iter().map(|r| r.rating.scores()));
        let total_ratings = ratings.len();

        Self {
            ratings,
            averages,
            total_ratings,
        }
    }
}

/// Outcome of storing a rating
#[derive(Debug)]
pub enum RatingOutcome {
    Created(Rating),
    /// The rater already rated this match
    Duplicate,
}

/// Request for rating a session
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub match_id: Option<String>,
    pub ratee_id: Option<String>,
    pub teaching_score: Option<i64>,
    pub patience_score: Option<i64>,
    pub clarity_score: Option<i64>,
    pub punctuality_score: Option<i64>,
    pub comment: Option<String>,
}

/// Validated rating submission
#[derive(Debug, Clone)]
pub struct NewRating {
    pub match_id: Uuid,
    pub ratee_id: Uuid,
    pub scores: RatingScores,
    pub comment: Option<String>,
}

impl Validate for SubmitRatingRequest {
    type Output = NewRating;

    fn validate(self) -> Result<NewRating, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let match_id = errors
            .required("matchId", self.match_id)
            .and_then(|id| errors.check("matchId", parse_id("matchId", &id)));
        let ratee_id = errors
            .required("rateeId", self.ratee_id)
            .and_then(|id| errors.check("rateeId", parse_id("rateeId", &id)));

        let mut score = |field: &'static str, value: Option<i64>| {
            errors
                .required(field, value)
                .and_then(|value| errors.check(field, validate_score(field, value)))
        };

        let teaching = score("teachingScore", self.teaching_score);
        let patience = score("patienceScore", self.patience_score);
        let clarity = score("clarityScore", self.clarity_score);
        let punctuality = score("punctualityScore", self.punctuality_score);

        let comment = self.comment.filter(|c| !c.trim().is_empty());
        if let Some(comment) = &comment {
            errors.check(
                "comment",
                validate_max_length("comment", comment, MAX_COMMENT_LENGTH),
            );
        }

        match (match_id, ratee_id, teaching, patience, clarity, punctuality) {
            (
                Some(match_id),
                Some(ratee_id),
                Some(teaching),
                Some(patience),
                Some(clarity),
                Some(punctuality),
            ) if errors.is_empty() => Ok(NewRating {
                match_id,
                ratee_id,
                scores: RatingScores {
                    teaching,
                    patience,
                    clarity,
                    punctuality,
                },
                comment,
            }),
            _ => Err(errors),
        }
    }
}

/// Query string for listing a user's ratings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsQuery {
    pub user_id: Option<String>,
}

impl Validate for RatingsQuery {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let user_id = errors
            .required("userId", self.user_id)
            .and_then(|id| errors.check("userId", parse_id("userId", &id)));

        user_id.ok_or(errors)
    }
}
