use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Form,
    repositories::FormRepository,
};

pub struct FormService {
    repository: Arc<dyn FormRepository>,
}

impl FormService {
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_form(&self, id: &str, caller_user_id: Option<&str>) -> AppResult<Form> {
        let form = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Form with id '{}' not found", id)))?;

        ensure_form_visible(&form, caller_user_id)?;

        Ok(form)
    }
}

/// Published-or-owner rule, mirrored from ingestion as a
/// defense-in-depth check on every read path. Authorization proper is
/// an external concern; this only guards against unpublished forms
/// leaking to anonymous callers.
pub fn ensure_form_visible(form: &Form, caller_user_id: Option<&str>) -> AppResult<()> {
    if form.is_published() {
        return Ok(());
    }
    if caller_user_id == Some(form.created_by_user_id.as_str()) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "Form '{}' is not published",
        form.id
    )))
}
