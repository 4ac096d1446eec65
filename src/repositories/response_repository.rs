use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{FormResponse, SubmissionIdentity},
};

/// Keyset cursor for the export batch loop: the last-seen row's
/// `(submitted_at, id)`, both immutable after creation.
#[derive(Clone, Debug)]
pub struct ExportCursor {
    pub submitted_at: DateTime<Utc>,
    pub id: String,
}

impl ExportCursor {
    pub fn from_response(response: &FormResponse) -> Self {
        Self {
            submitted_at: response.submitted_at,
            id: response.id.clone(),
        }
    }
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Inserts a new response. A storage-level uniqueness violation on
    /// the dedup key surfaces as `AppError::Forbidden`, collapsing the
    /// duplicate check into insert-or-reject.
    async fn create(&self, response: FormResponse) -> AppResult<FormResponse>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<FormResponse>>;

    /// Disjunctive identity probe: true when any prior response to the
    /// form shares any of the supplied identity signals. Unsupplied
    /// signals are not matched against.
    async fn exists_prior(
        &self,
        form_id: &str,
        identity: &SubmissionIdentity,
    ) -> AppResult<bool>;

    async fn list_for_form(
        &self,
        form_id: &str,
        offset: i64,
        limit: i64,
        descending: bool,
    ) -> AppResult<(Vec<FormResponse>, i64)>;

    /// Fetches the next export batch, ordered by submission time then
    /// id, both descending, strictly after `cursor`.
    async fn find_batch_after(
        &self,
        form_id: &str,
        cursor: Option<&ExportCursor>,
        batch_size: usize,
    ) -> AppResult<Vec<FormResponse>>;

    async fn delete(&self, id: &str) -> AppResult<bool>;

    async fn count_for_form(&self, form_id: &str) -> AppResult<i64>;
}

pub struct MongoResponseRepository {
    collection: Collection<FormResponse>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("form_responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for form_responses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let export_cursor_index = IndexModel::builder()
            .keys(doc! { "form_id": 1, "submitted_at": -1, "id": -1 })
            .options(
                IndexOptions::builder()
                    .name("form_submitted_id".to_string())
                    .build(),
            )
            .build();

        // Sparse: only responses to single-submission forms carry a
        // dedup key, so multi-submission forms are unaffected.
        let dedup_index = IndexModel::builder()
            .keys(doc! { "dedup_key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("dedup_key_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(export_cursor_index).await?;
        self.collection.create_index(dedup_index).await?;

        log::info!("Successfully created indexes for form_responses collection");
        Ok(())
    }
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn create(&self, response: FormResponse) -> AppResult<FormResponse> {
        match self.collection.insert_one(&response).await {
            Ok(_) => Ok(response),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::Forbidden(format!(
                "A response to form '{}' has already been submitted",
                response.form_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<FormResponse>> {
        let response = self.collection.find_one(doc! { "id": id }).await?;
        Ok(response)
    }

    async fn exists_prior(
        &self,
        form_id: &str,
        identity: &SubmissionIdentity,
    ) -> AppResult<bool> {
        let mut identity_clauses = Vec::new();
        if let Some(user_id) = &identity.user_id {
            identity_clauses.push(doc! { "user_id": user_id });
        }
        if let Some(email) = &identity.respondent_email {
            identity_clauses.push(doc! { "respondent_email": email });
        }
        if let Some(fingerprint) = &identity.fingerprint {
            identity_clauses.push(doc! { "fingerprint": fingerprint });
        }

        if identity_clauses.is_empty() {
            return Ok(false);
        }

        let prior = self
            .collection
            .find_one(doc! { "form_id": form_id, "$or": identity_clauses })
            .await?;
        Ok(prior.is_some())
    }

    async fn list_for_form(
        &self,
        form_id: &str,
        offset: i64,
        limit: i64,
        descending: bool,
    ) -> AppResult<(Vec<FormResponse>, i64)> {
        let filter = doc! { "form_id": form_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let direction = if descending { -1 } else { 1 };
        let responses = self
            .collection
            .find(filter)
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "submitted_at": direction, "id": direction })
            .await?
            .try_collect()
            .await?;

        Ok((responses, total as i64))
    }

    async fn find_batch_after(
        &self,
        form_id: &str,
        cursor: Option<&ExportCursor>,
        batch_size: usize,
    ) -> AppResult<Vec<FormResponse>> {
        let mut filter = doc! { "form_id": form_id };

        if let Some(cursor) = cursor {
            let submitted_at = to_bson(&cursor.submitted_at)?;
            filter.insert(
                "$or",
                vec![
                    doc! { "submitted_at": { "$lt": submitted_at.clone() } },
                    doc! { "submitted_at": submitted_at, "id": { "$lt": &cursor.id } },
                ],
            );
        }

        let batch = self
            .collection
            .find(filter)
            .sort(doc! { "submitted_at": -1, "id": -1 })
            .limit(batch_size as i64)
            .await?
            .try_collect()
            .await?;

        Ok(batch)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_for_form(&self, form_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "form_id": form_id })
            .await?;
        Ok(count as i64)
    }
}
