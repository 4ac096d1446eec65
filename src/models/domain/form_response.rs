use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One respondent's accepted submission. Created exactly once during
/// ingestion, never mutated afterwards except by cascade deletion.
/// Answers are embedded so the response and its answers persist as a
/// single atomic document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Truncated keyed hash of the client IP; the raw address is never
    /// stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_hash: Option<String>,
    /// Uniqueness key `{form_id}:{identity}` populated only when the
    /// form disallows multiple submissions; a sparse unique index on it
    /// turns the duplicate check into insert-or-reject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_key: Option<String>,
    pub answers: Vec<ResponseAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

/// A single stored answer. `value` is opaque ciphertext iff the field
/// was flagged PII at submission time; later field edits do not
/// retroactively re-encrypt or decrypt stored values.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseAnswer {
    pub field_id: String,
    pub value: String,
    /// Per-answer correctness for quiz forms; `None` otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// The identity signals a submission may carry for de-duplication.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionIdentity {
    pub user_id: Option<String>,
    pub respondent_email: Option<String>,
    pub fingerprint: Option<String>,
}

impl SubmissionIdentity {
    /// True when none of the three signals were supplied. An anonymous,
    /// untrackable submitter can always submit.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.respondent_email.is_none() && self.fingerprint.is_none()
    }

    /// The strongest available signal, used as the storage-level
    /// uniqueness key component.
    pub fn dedup_component(&self) -> Option<String> {
        if let Some(user_id) = &self.user_id {
            return Some(format!("user:{}", user_id));
        }
        if let Some(email) = &self.respondent_email {
            return Some(format!("email:{}", email));
        }
        self.fingerprint.as_ref().map(|fp| format!("fp:{}", fp))
    }
}

impl FormResponse {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        form_id: &str,
        identity: &SubmissionIdentity,
        ip_hash: Option<String>,
        dedup_key: Option<String>,
        answers: Vec<ResponseAnswer>,
        score: Option<i32>,
        total_score: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            user_id: identity.user_id.clone(),
            respondent_email: identity.respondent_email.clone(),
            fingerprint: identity.fingerprint.clone(),
            ip_hash,
            dedup_key,
            answers,
            score,
            total_score,
            submitted_at: Utc::now(),
        }
    }

    pub fn answer_for(&self, field_id: &str) -> Option<&ResponseAnswer> {
        self.answers.iter().find(|a| a.field_id == field_id)
    }
}
