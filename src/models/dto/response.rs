use serde::Serialize;

use crate::models::domain::{
    FieldOption, FieldType, Form, FormResponse, FormSettings, QuizSettings,
};

/// Returned to the caller after an accepted submission. Quiz review
/// visibility is decided entirely by form-level display flags, never
/// by anything the caller supplies.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub response: FormResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<QuizReviewItem>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizReviewItem {
    pub field_id: String,
    pub field_label: String,
    pub user_answer: String,
    /// Populated only when the form's quiz settings show answers.
    pub correct_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponsePage {
    pub responses: Vec<FormResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Respondent-facing projection of a form. Grading data
/// (`correct_answer`, per-field scores) and the PII flag never leave
/// the server through this view.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub id: String,
    pub title: String,
    pub is_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_settings: Option<QuizSettings>,
    pub settings: FormSettings,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub order: i16,
}

impl From<&Form> for FormView {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id.clone(),
            title: form.title.clone(),
            is_quiz: form.is_quiz,
            quiz_settings: form.quiz_settings.clone(),
            settings: form.settings.clone(),
            fields: form
                .fields
                .iter()
                .map(|field| FieldView {
                    id: field.id.clone(),
                    field_type: field.field_type,
                    label: field.label.clone(),
                    required: field.required,
                    options: field.options.clone(),
                    order: field.order,
                })
                .collect(),
        }
    }
}
