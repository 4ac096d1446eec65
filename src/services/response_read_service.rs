use std::sync::Arc;

use crate::{
    crypto::FieldCodec,
    errors::{AppError, AppResult},
    models::{
        domain::{Form, FormResponse},
        dto::{request::ListResponsesParams, response::ResponsePage},
    },
    repositories::{FormRepository, ResponseRepository},
    services::form_service::ensure_form_visible,
};

/// Read path for stored responses. Reverses PII encryption per answer;
/// a value that fails to decrypt degrades to the sentinel so a page is
/// always returned in full.
pub struct ResponseReadService {
    forms: Arc<dyn FormRepository>,
    responses: Arc<dyn ResponseRepository>,
    codec: Arc<FieldCodec>,
}

impl ResponseReadService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        responses: Arc<dyn ResponseRepository>,
        codec: Arc<FieldCodec>,
    ) -> Self {
        Self {
            forms,
            responses,
            codec,
        }
    }

    pub async fn list(
        &self,
        form_id: &str,
        params: &ListResponsesParams,
        caller_user_id: Option<&str>,
    ) -> AppResult<ResponsePage> {
        let form = self
            .forms
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", form_id)))?;

        ensure_form_visible(&form, caller_user_id)?;

        let (mut responses, total) = self
            .responses
            .list_for_form(
                &form.id,
                params.offset(),
                params.page_size(),
                params.descending(),
            )
            .await?;

        for response in &mut responses {
            self.decrypt_in_place(&form, response);
        }

        Ok(ResponsePage {
            responses,
            total,
            page: params.page(),
            page_size: params.page_size(),
        })
    }

    pub async fn get(
        &self,
        response_id: &str,
        caller_user_id: Option<&str>,
    ) -> AppResult<FormResponse> {
        let mut response = self
            .responses
            .find_by_id(response_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Response with id '{}' not found", response_id))
            })?;

        let form = self
            .forms
            .find_by_id(&response.form_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Form with id '{}' not found", response.form_id))
            })?;

        ensure_form_visible(&form, caller_user_id)?;

        self.decrypt_in_place(&form, &mut response);

        Ok(response)
    }

    /// Decrypts answers whose field is currently flagged PII. Legacy
    /// plaintext under a PII field passes through unchanged; an
    /// undecryptable token becomes the sentinel, never an error.
    fn decrypt_in_place(&self, form: &Form, response: &mut FormResponse) {
        for answer in &mut response.answers {
            let is_pii = form
                .field_by_id(&answer.field_id)
                .map(|f| f.is_pii)
                .unwrap_or(false);
            if is_pii {
                answer.value = self.codec.decrypt_or_sentinel(&answer.value);
            }
        }
    }
}
