use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{Form, SubmissionIdentity},
    repositories::ResponseRepository,
};

/// Decides whether an incoming submission's identity has already
/// submitted to a form. This is the friendly pre-check; the storage
/// layer's unique dedup index is the authoritative, race-free
/// enforcement.
pub struct IdentityMatcher {
    responses: Arc<dyn ResponseRepository>,
}

impl IdentityMatcher {
    pub fn new(responses: Arc<dyn ResponseRepository>) -> Self {
        Self { responses }
    }

    pub async fn has_prior_submission(
        &self,
        form: &Form,
        identity: &SubmissionIdentity,
    ) -> AppResult<bool> {
        if form.settings.allow_multiple_submissions {
            return Ok(false);
        }

        // A submitter with no identity signals at all is untrackable
        // and can always submit.
        if identity.is_anonymous() {
            return Ok(false);
        }

        self.responses.exists_prior(&form.id, identity).await
    }
}
