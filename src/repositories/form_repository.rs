use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Form};

/// Read-only access to form definitions. Form authoring lives in the
/// form-builder service; this pipeline only ever loads them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Form>>;
}

pub struct MongoFormRepository {
    collection: Collection<Form>,
}

impl MongoFormRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("forms");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for forms collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for forms collection");
        Ok(())
    }
}

#[async_trait]
impl FormRepository for MongoFormRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Form>> {
        let form = self.collection.find_one(doc! { "id": id }).await?;
        Ok(form)
    }
}
