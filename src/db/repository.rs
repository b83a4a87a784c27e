use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;

use crate::db::models::Project;
use crate::error::AppError;

/// Repository trait for project records.
///
/// Filters and projections are raw BSON documents; the store's own query
/// semantics apply. This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project.
    async fn create(&self, project: Project) -> Result<(), AppError>;

    /// All projects matching `filter`, newest `created_at` first.
    async fn read_all(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Vec<Project>, AppError>;

    /// The first project matching `filter`.
    async fn read_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Project>, AppError>;

    /// Atomically `$set` the given fields on the first match and return the
    /// updated document, or `None` when nothing matched.
    async fn update(&self, filter: Document, set: Document) -> Result<Option<Project>, AppError>;

    /// Soft delete: flip `is_deleted` and return the updated document.
    async fn delete(&self, id: ObjectId) -> Result<Option<Project>, AppError>;

    /// Remove the document for good. Fails with `NotFound` when absent.
    async fn delete_permanent(&self, id: ObjectId) -> Result<(), AppError>;
}

/// MongoDB implementation of the ProjectRepository.
pub struct MongoProjectRepository {
    collection: mongodb::Collection<Project>,
}

impl MongoProjectRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("projects"),
        }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn create(&self, project: Project) -> Result<(), AppError> {
        self.collection.insert_one(&project).await?;
        Ok(())
    }

    async fn read_all(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Vec<Project>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .projection(projection)
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn read_one(
        &self,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Project>, AppError> {
        use mongodb::options::FindOneOptions;

        let options = FindOneOptions::builder().projection(projection).build();
        Ok(self
            .collection
            .find_one(filter)
            .with_options(options)
            .await?)
    }

    async fn update(&self, filter: Document, set: Document) -> Result<Option<Project>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .with_options(options)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Project>, AppError> {
        use mongodb::bson::doc;

        self.update(doc! { "_id": id }, doc! { "is_deleted": true })
            .await
    }

    async fn delete_permanent(&self, id: ObjectId) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Project {id} not found")));
        }
        Ok(())
    }
}
