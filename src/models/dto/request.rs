use serde::Deserialize;
use validator::Validate;

use crate::models::domain::SubmissionIdentity;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitResponseRequest {
    pub user_id: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub respondent_email: Option<String>,

    pub fingerprint: Option<String>,

    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1, message = "field_id must not be empty"))]
    pub field_id: String,

    pub value: String,
}

impl SubmitResponseRequest {
    pub fn identity(&self) -> SubmissionIdentity {
        SubmissionIdentity {
            user_id: self.user_id.clone(),
            respondent_email: self.respondent_email.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListResponsesParams {
    #[validate(range(min = 1))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<i64>,

    /// "asc" or "desc" by submission time; newest first by default.
    pub sort: Option<String>,
}

impl Default for ListResponsesParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(20),
            sort: None,
        }
    }
}

impl ListResponsesParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    pub fn descending(&self) -> bool {
        !matches!(self.sort.as_deref(), Some("asc"))
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}
