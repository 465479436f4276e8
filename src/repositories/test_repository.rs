use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{Question, TestDefinition},
    repositories::newest_first,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>>;
    /// Newest first.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestDefinition>, i64)>;
    async fn replace_questions(&self, id: &str, questions: Vec<Question>) -> AppResult<()>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoTestRepository {
    collection: Collection<TestDefinition>,
}

impl MongoTestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::TESTS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for tests collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "id": -1 })
            .options(
                IndexOptions::builder()
                    .name("owner_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(owner_index).await?;

        log::info!("Successfully created indexes for tests collection");
        Ok(())
    }
}

#[async_trait]
impl TestRepository for MongoTestRepository {
    async fn create(&self, test: TestDefinition) -> AppResult<TestDefinition> {
        self.collection.insert_one(&test).await?;
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestDefinition>> {
        let test = self.collection.find_one(doc! { "id": id }).await?;
        Ok(test)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<TestDefinition>, i64)> {
        let filter = doc! { "owner_id": owner_id };
        let total = self.collection.count_documents(filter.clone()).await?;

        let tests = self
            .collection
            .find(filter)
            .sort(newest_first())
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((tests, total as i64))
    }

    async fn replace_questions(&self, id: &str, questions: Vec<Question>) -> AppResult<()> {
        let now = to_bson(&chrono::Utc::now())?;
        let result = self
            .collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "questions": to_bson(&questions)?, "updated_at": now } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Test with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
