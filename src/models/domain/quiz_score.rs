use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only quiz summary row, written alongside a response when the
/// owning form is a quiz with a positive total score. Never updated;
/// removed only by the cascade delete of its response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizScore {
    pub id: String,
    pub response_id: String,
    pub form_id: String,
    pub score: i32,
    pub total_score: i32,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

impl QuizScore {
    /// Callers only construct this when `total_score > 0`.
    pub fn new(response_id: &str, form_id: &str, score: i32, total_score: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            response_id: response_id.to_string(),
            form_id: form_id.to_string(),
            score,
            total_score,
            percentage: f64::from(score) / f64::from(total_score) * 100.0,
            created_at: Utc::now(),
        }
    }
}
