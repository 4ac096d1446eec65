use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizScore};

#[async_trait]
pub trait QuizScoreRepository: Send + Sync {
    async fn create(&self, score: QuizScore) -> AppResult<QuizScore>;
    async fn find_by_response_id(&self, response_id: &str) -> AppResult<Option<QuizScore>>;
    /// Cascade hook: removes the score row belonging to a deleted
    /// response.
    async fn delete_by_response_id(&self, response_id: &str) -> AppResult<bool>;
}

pub struct MongoQuizScoreRepository {
    collection: Collection<QuizScore>,
}

impl MongoQuizScoreRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_scores");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_scores collection");

        let response_index = IndexModel::builder()
            .keys(doc! { "response_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("response_id_unique".to_string())
                    .build(),
            )
            .build();

        let form_index = IndexModel::builder()
            .keys(doc! { "form_id": 1 })
            .options(IndexOptions::builder().name("form_id".to_string()).build())
            .build();

        self.collection.create_index(response_index).await?;
        self.collection.create_index(form_index).await?;

        log::info!("Successfully created indexes for quiz_scores collection");
        Ok(())
    }
}

#[async_trait]
impl QuizScoreRepository for MongoQuizScoreRepository {
    async fn create(&self, score: QuizScore) -> AppResult<QuizScore> {
        self.collection.insert_one(&score).await?;
        Ok(score)
    }

    async fn find_by_response_id(&self, response_id: &str) -> AppResult<Option<QuizScore>> {
        let score = self
            .collection
            .find_one(doc! { "response_id": response_id })
            .await?;
        Ok(score)
    }

    async fn delete_by_response_id(&self, response_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "response_id": response_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
