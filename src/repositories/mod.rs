pub mod form_repository;
pub mod quiz_score_repository;
pub mod response_repository;

pub use form_repository::{FormRepository, MongoFormRepository};
pub use quiz_score_repository::{MongoQuizScoreRepository, QuizScoreRepository};
pub use response_repository::{ExportCursor, MongoResponseRepository, ResponseRepository};
