use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::PdfDocument,
    repositories::{newest_first, oldest_first},
};

#[async_trait]
pub trait PdfRepository: Send + Sync {
    async fn create(&self, pdf: PdfDocument) -> AppResult<PdfDocument>;
    /// Only documents owned by `user_id` are returned.
    async fn find_many_for_user(&self, user_id: &str, ids: &[String]) -> AppResult<Vec<PdfDocument>>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PdfDocument>>;
    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool>;
}

pub struct MongoPdfRepository {
    collection: Collection<PdfDocument>,
}

impl MongoPdfRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::PDFS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for pdfs collection");

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

        log::info!("Successfully created indexes for pdfs collection");
        Ok(())
    }
}

#[async_trait]
impl PdfRepository for MongoPdfRepository {
    async fn create(&self, pdf: PdfDocument) -> AppResult<PdfDocument> {
        self.collection.insert_one(&pdf).await?;
        Ok(pdf)
    }

    async fn find_many_for_user(&self, user_id: &str, ids: &[String]) -> AppResult<Vec<PdfDocument>> {
        let pdfs = self
            .collection
            .find(doc! { "user_id": user_id, "id": { "$in": ids.to_vec() } })
            .sort(oldest_first())
            .await?
            .try_collect()
            .await?;
        Ok(pdfs)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<PdfDocument>> {
        let pdfs = self
            .collection
            .find(doc! { "user_id": user_id })
            .projection(doc! { "content": 0 })
            .sort(newest_first())
            .await?
            .try_collect()
            .await?;
        Ok(pdfs)
    }

    async fn delete_for_user(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
