use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::ResultRecord,
    repositories::{is_duplicate_key, newest_first},
};

/// Append-only store: records are inserted and read, never updated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the idempotency key is taken.
    async fn create(&self, record: ResultRecord) -> AppResult<ResultRecord>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ResultRecord>>;
    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<ResultRecord>>;
    /// Newest first.
    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ResultRecord>, i64)>;
}

pub struct MongoResultRepository {
    collection: Collection<ResultRecord>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::RESULTS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let idempotency_index = IndexModel::builder()
            .keys(doc! { "idempotency_key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idempotency_key_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "id": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(idempotency_index).await?;
        self.collection.create_index(user_index).await?;

        log::info!("Successfully created indexes for results collection");
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create(&self, record: ResultRecord) -> AppResult<ResultRecord> {
        match self.collection.insert_one(&record).await {
            Ok(_) => Ok(record),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Result with idempotency key '{}' already exists",
                record.idempotency_key
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<ResultRecord>> {
        let record = self.collection.find_one(doc! { "id": id }).await?;
        Ok(record)
    }

    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<ResultRecord>> {
        let record = self
            .collection
            .find_one(doc! { "idempotency_key": key })
            .await?;
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ResultRecord>, i64)> {
        let filter = doc! { "user_id": user_id };
        let total = self.collection.count_documents(filter.clone()).await?;

        let records = self
            .collection
            .find(filter)
            .sort(newest_first())
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((records, total as i64))
    }
}
