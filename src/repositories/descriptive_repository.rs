use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::DescriptiveAttempt,
    repositories::newest_first,
};

#[async_trait]
pub trait DescriptiveRepository: Send + Sync {
    async fn create(&self, attempt: DescriptiveAttempt) -> AppResult<DescriptiveAttempt>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<DescriptiveAttempt>>;
    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool>;
}

pub struct MongoDescriptiveRepository {
    collection: Collection<DescriptiveAttempt>,
}

impl MongoDescriptiveRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::DESCRIPTIVE_ATTEMPTS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
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
        self.collection.create_index(user_index).await?;

        log::info!("Successfully created indexes for descriptive_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl DescriptiveRepository for MongoDescriptiveRepository {
    async fn create(&self, attempt: DescriptiveAttempt) -> AppResult<DescriptiveAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<DescriptiveAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(newest_first())
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
