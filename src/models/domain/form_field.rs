use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FormField {
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub is_pii: bool,
    pub required: bool,
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    pub order: i16,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldOption {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum FieldType {
    ShortText,
    LongText,
    Email,
    Number,
    Phone,
    MultipleChoice,
    Checkbox,
    Dropdown,
    Date,
    Time,
    Rating,
    Header,
    Paragraph,
    Divider,
    PageBreak,
    Submit,
}

impl FieldType {
    /// Structural markers never produce answers; they are excluded
    /// from export columns and scoring.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FieldType::Header
                | FieldType::Paragraph
                | FieldType::Divider
                | FieldType::PageBreak
                | FieldType::Submit
        )
    }
}

impl FormField {
    pub fn answerable(&self) -> bool {
        !self.field_type.is_structural()
    }
}
