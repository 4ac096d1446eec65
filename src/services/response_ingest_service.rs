use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    crypto::FieldCodec,
    errors::{AppError, AppResult},
    models::{
        domain::{Form, FormResponse, QuizScore, ResponseAnswer},
        dto::{
            request::{AnswerInput, SubmitResponseRequest},
            response::{QuizReviewItem, SubmissionResult},
        },
    },
    repositories::{FormRepository, QuizScoreRepository, ResponseRepository},
    services::{IdentityMatcher, ScoringEngine},
};

/// Orchestrates the submission pipeline: gate checks, scoring, PII
/// encryption, and atomic persistence of the response unit.
///
/// Each gate is terminal on failure; there are no internal retries.
pub struct ResponseIngestService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
    quiz_scores: Arc<dyn QuizScoreRepository>,
    matcher: IdentityMatcher,
    codec: Arc<FieldCodec>,
}

impl ResponseIngestService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        responses: Arc<dyn ResponseRepository>,
        quiz_scores: Arc<dyn QuizScoreRepository>,
        codec: Arc<FieldCodec>,
    ) -> Self {
        let matcher = IdentityMatcher::new(responses.clone());
        Self {
            forms,
            responses,
            quiz_scores,
            matcher,
            codec,
        }
    }

    pub async fn submit(
        &self,
        form_id: &str,
        request: SubmitResponseRequest,
        client_ip: Option<&str>,
    ) -> AppResult<SubmissionResult> {
        request.validate()?;

        let form = self
            .forms
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", form_id)))?;

        if !form.is_published() {
            return Err(AppError::Forbidden(format!(
                "Form '{}' is not accepting responses",
                form.id
            )));
        }

        if form.is_quiz {
            check_quiz_window(&form, Utc::now())?;
        }

        let identity = request.identity();
        if self.matcher.has_prior_submission(&form, &identity).await? {
            return Err(AppError::Forbidden(format!(
                "A response to form '{}' has already been submitted",
                form.id
            )));
        }

        let scoring = form
            .is_quiz
            .then(|| ScoringEngine::score(&form, &request.answers));
        let correctness = scoring
            .as_ref()
            .map(|s| s.correctness.clone())
            .unwrap_or_default();

        let answers = self.encode_answers(&form, &request.answers, &correctness)?;

        let ip_hash = client_ip.map(|ip| self.codec.hash_ip(ip));
        let dedup_key = if form.settings.allow_multiple_submissions {
            None
        } else {
            identity
                .dedup_component()
                .map(|component| format!("{}:{}", form.id, component))
        };

        let response = FormResponse::new(
            &form.id,
            &identity,
            ip_hash,
            dedup_key,
            answers,
            scoring.as_ref().map(|s| s.score),
            scoring.as_ref().map(|s| s.total_score),
        );

        let response = match self.responses.create(response).await {
            Ok(response) => response,
            // The unique dedup index rejected a concurrent duplicate;
            // an expected outcome, not logged as an error.
            Err(err @ AppError::Forbidden(_)) => return Err(err),
            Err(err) => {
                log::error!("failed to persist response for form '{}': {}", form.id, err);
                return Err(err);
            }
        };

        if let Some(scoring) = &scoring {
            if scoring.total_score > 0 {
                let row = QuizScore::new(
                    &response.id,
                    &form.id,
                    scoring.score,
                    scoring.total_score,
                );
                if let Err(err) = self.quiz_scores.create(row).await {
                    log::error!(
                        "failed to persist quiz score for response '{}': {}",
                        response.id,
                        err
                    );
                    // Roll back the response insert so the submission
                    // persists as one unit or not at all. Leaving it
                    // behind would strand its dedup key, and the retry
                    // of the whole submission would be rejected as a
                    // duplicate.
                    if let Err(rollback_err) = self.responses.delete(&response.id).await {
                        log::error!(
                            "failed to roll back response '{}' after quiz score failure: {}",
                            response.id,
                            rollback_err
                        );
                    }
                    return Err(err);
                }
            }
        }

        Ok(assemble_result(&form, response, &request.answers, &correctness))
    }

    /// Cascade removal of a response and its quiz score row.
    pub async fn delete(&self, response_id: &str) -> AppResult<()> {
        let response = self
            .responses
            .find_by_id(response_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Response with id '{}' not found", response_id))
            })?;

        self.quiz_scores
            .delete_by_response_id(&response.id)
            .await?;
        self.responses.delete(&response.id).await?;

        Ok(())
    }

    /// The stored value is ciphertext iff the field is PII at
    /// submission time; that decision is baked in here and never
    /// revisited by later field edits. Empty values stay empty.
    fn encode_answers(
        &self,
        form: &Form,
        inputs: &[AnswerInput],
        correctness: &HashMap<String, bool>,
    ) -> AppResult<Vec<ResponseAnswer>> {
        let mut answers = Vec::with_capacity(inputs.len());

        for input in inputs {
            let field = form.field_by_id(&input.field_id);
            let is_pii = field.map(|f| f.is_pii).unwrap_or(false);

            let value = if is_pii && !input.value.is_empty() {
                self.codec.encrypt(&input.value)?
            } else {
                input.value.clone()
            };

            answers.push(ResponseAnswer {
                field_id: input.field_id.clone(),
                value,
                is_correct: correctness.get(&input.field_id).copied(),
            });
        }

        Ok(answers)
    }
}

/// Quiz window gate: the Forbidden message names the boundary that was
/// violated and its timestamp.
fn check_quiz_window(form: &Form, now: DateTime<Utc>) -> AppResult<()> {
    let Some(settings) = &form.quiz_settings else {
        return Ok(());
    };

    if let Some(start) = settings.start_time {
        if now < start {
            return Err(AppError::Forbidden(format!(
                "Quiz has not started yet; submissions open at {}",
                start.to_rfc3339()
            )));
        }
    }

    if let Some(end) = settings.end_time {
        if now > end {
            return Err(AppError::Forbidden(format!(
                "Quiz has ended; submissions closed at {}",
                end.to_rfc3339()
            )));
        }
    }

    Ok(())
}

/// Builds the caller-facing result. Quiz review visibility is decided
/// by the form's display flags alone: `show_answer` gates the correct
/// answers, `show_score` gates the top-level totals.
fn assemble_result(
    form: &Form,
    response: FormResponse,
    inputs: &[AnswerInput],
    correctness: &HashMap<String, bool>,
) -> SubmissionResult {
    if !form.is_quiz {
        return SubmissionResult {
            response,
            score: None,
            total_score: None,
            review: None,
        };
    }

    let show_answer = form
        .quiz_settings
        .as_ref()
        .map(|q| q.show_answer)
        .unwrap_or(false);
    let show_score = form
        .quiz_settings
        .as_ref()
        .map(|q| q.show_score)
        .unwrap_or(false);

    let review = inputs
        .iter()
        .filter_map(|input| {
            let field = form.field_by_id(&input.field_id)?;
            if field.field_type.is_structural() {
                return None;
            }
            Some(QuizReviewItem {
                field_id: field.id.clone(),
                field_label: field.label.clone(),
                user_answer: input.value.clone(),
                correct_answer: if show_answer {
                    field.correct_answer.clone()
                } else {
                    None
                },
                is_correct: correctness.get(&input.field_id).copied(),
                score: field.score.unwrap_or(0),
            })
        })
        .collect();

    SubmissionResult {
        score: if show_score { response.score } else { None },
        total_score: if show_score { response.total_score } else { None },
        response,
        review: Some(review),
    }
}
