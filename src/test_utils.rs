use crate::models::domain::{
    FieldType, Form, FormField, FormSettings, FormStatus, QuizSettings,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn text_field(id: &str, label: &str) -> FormField {
        FormField {
            id: id.to_string(),
            field_type: FieldType::ShortText,
            label: label.to_string(),
            is_pii: false,
            required: false,
            options: vec![],
            correct_answer: None,
            score: None,
            order: 0,
        }
    }

    pub fn pii_field(id: &str, label: &str) -> FormField {
        FormField {
            is_pii: true,
            field_type: FieldType::Email,
            ..text_field(id, label)
        }
    }

    pub fn quiz_field(id: &str, correct: &str, score: i32) -> FormField {
        FormField {
            field_type: FieldType::MultipleChoice,
            correct_answer: Some(correct.to_string()),
            score: Some(score),
            ..text_field(id, id)
        }
    }

    pub fn published_form(id: &str, fields: Vec<FormField>) -> Form {
        Form {
            id: id.to_string(),
            title: "Test Form".to_string(),
            status: FormStatus::Published,
            is_quiz: false,
            quiz_settings: None,
            settings: FormSettings::default(),
            fields,
            created_by_user_id: "owner-1".to_string(),
            created_at: None,
            modified_at: None,
        }
    }

    pub fn published_quiz(id: &str, fields: Vec<FormField>) -> Form {
        Form {
            is_quiz: true,
            quiz_settings: Some(QuizSettings {
                start_time: None,
                end_time: None,
                total_score: fields.iter().filter_map(|f| f.score).sum(),
                show_answer: true,
                show_score: true,
            }),
            ..published_form(id, fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::FormStatus;

    #[test]
    fn test_fixture_published_form() {
        let form = published_form("form-1", vec![text_field("f1", "Name")]);
        assert_eq!(form.status, FormStatus::Published);
        assert!(!form.is_quiz);
        assert_eq!(form.fields.len(), 1);
    }

    #[test]
    fn test_fixture_quiz_totals() {
        let quiz = published_quiz(
            "quiz-1",
            vec![quiz_field("q1", "A", 5), quiz_field("q2", "B", 10)],
        );
        assert!(quiz.is_quiz);
        assert_eq!(quiz.quiz_settings.unwrap().total_score, 15);
    }

    #[test]
    fn test_fixture_pii_field() {
        let field = pii_field("email", "Your email");
        assert!(field.is_pii);
    }
}
