use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::form_field::FormField;

/// Design-time form entity. Owned and mutated by the form builder
/// (out of scope here); read-only to the response pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    pub status: FormStatus,
    pub is_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_settings: Option<QuizSettings>,
    pub settings: FormSettings,
    pub fields: Vec<FormField>,
    pub created_by_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum FormStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSettings {
    pub allow_multiple_submissions: bool,
    pub collect_email: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            allow_multiple_submissions: false,
            collect_email: false,
        }
    }
}

/// Typed quiz settings. Stored as a structured document, not an open
/// JSON blob, so invalid shapes fail at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Design-time declared total; the pipeline scores against the
    /// totals it computes from the submitted answers.
    pub total_score: i32,
    pub show_answer: bool,
    pub show_score: bool,
}

impl Form {
    pub fn is_published(&self) -> bool {
        self.status == FormStatus::Published
    }

    /// Fields that can carry answers, in display order.
    pub fn answerable_fields(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter().filter(|f| f.answerable())
    }

    pub fn field_by_id(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::form_field::FieldType;

    fn field(id: &str, field_type: FieldType) -> FormField {
        FormField {
            id: id.to_string(),
            field_type,
            label: id.to_string(),
            is_pii: false,
            required: false,
            options: vec![],
            correct_answer: None,
            score: None,
            order: 0,
        }
    }

    #[test]
    fn form_status_round_trip_serialization() {
        for status in [FormStatus::Draft, FormStatus::Published, FormStatus::Archived] {
            let json = serde_json::to_string(&status).expect("status should serialize");
            let parsed: FormStatus =
                serde_json::from_str(&json).expect("status should deserialize");
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn answerable_fields_skip_structural_markers() {
        let form = Form {
            id: "form-1".to_string(),
            title: "Test".to_string(),
            status: FormStatus::Published,
            is_quiz: false,
            quiz_settings: None,
            settings: FormSettings::default(),
            fields: vec![
                field("header", FieldType::Header),
                field("name", FieldType::ShortText),
                field("break", FieldType::PageBreak),
                field("email", FieldType::Email),
                field("submit", FieldType::Submit),
            ],
            created_by_user_id: "user-1".to_string(),
            created_at: None,
            modified_at: None,
        };

        let ids: Vec<&str> = form.answerable_fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "email"]);
    }

    #[test]
    fn field_lookup_by_id() {
        let form = Form {
            id: "form-1".to_string(),
            title: "Test".to_string(),
            status: FormStatus::Draft,
            is_quiz: false,
            quiz_settings: None,
            settings: FormSettings::default(),
            fields: vec![field("a", FieldType::ShortText)],
            created_by_user_id: "user-1".to_string(),
            created_at: None,
            modified_at: None,
        };

        assert!(form.field_by_id("a").is_some());
        assert!(form.field_by_id("missing").is_none());
        assert!(!form.is_published());
    }
}
