pub mod request;
pub mod response;

pub use request::{AnswerInput, ListResponsesParams, SubmitResponseRequest};
pub use response::{FieldView, FormView, QuizReviewItem, ResponsePage, SubmissionResult};
