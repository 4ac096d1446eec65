use std::collections::HashMap;

use crate::models::{domain::Form, dto::request::AnswerInput};

/// Result of grading one submission against a quiz form.
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub score: i32,
    pub total_score: i32,
    /// Per-answer correctness keyed by field id. Answers referencing
    /// unknown fields are absent (skipped, not errors).
    pub correctness: HashMap<String, bool>,
}

impl ScoringOutcome {
    pub fn percentage(&self) -> Option<f64> {
        (self.total_score > 0)
            .then(|| f64::from(self.score) / f64::from(self.total_score) * 100.0)
    }
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Grades submitted answers. Comparison against `correct_answer`
    /// is exact string equality with no case or whitespace
    /// normalization; a field with no `score` set still participates
    /// and contributes 0 to both totals.
    pub fn score(form: &Form, answers: &[AnswerInput]) -> ScoringOutcome {
        let mut score = 0;
        let mut total_score = 0;
        let mut correctness = HashMap::new();

        for answer in answers {
            let Some(field) = form.field_by_id(&answer.field_id) else {
                continue;
            };
            if field.field_type.is_structural() {
                continue;
            }

            let points = field.score.unwrap_or(0);
            total_score += points;

            let is_correct = field
                .correct_answer
                .as_deref()
                .is_some_and(|correct| correct == answer.value);
            if is_correct {
                score += points;
            }
            correctness.insert(answer.field_id.clone(), is_correct);
        }

        ScoringOutcome {
            score,
            total_score,
            correctness,
        }
    }
}
