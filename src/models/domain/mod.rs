pub mod form;
pub mod form_field;
pub mod form_response;
pub mod quiz_score;

pub use form::{Form, FormSettings, FormStatus, QuizSettings};
pub use form_field::{FieldOption, FieldType, FormField};
pub use form_response::{FormResponse, ResponseAnswer, SubmissionIdentity};
pub use quiz_score::QuizScore;
