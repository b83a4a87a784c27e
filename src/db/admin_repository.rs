use async_trait::async_trait;

use crate::db::models::Admin;
use crate::error::AppError;

/// Repository trait for administrator records.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert a new admin.
    async fn create(&self, admin: Admin) -> Result<(), AppError>;

    /// Find the admin matching both the email and the Google account id.
    async fn get(&self, email: &str, google_id: &str) -> Result<Option<Admin>, AppError>;
}

/// MongoDB implementation of the AdminRepository.
pub struct MongoAdminRepository {
    collection: mongodb::Collection<Admin>,
}

impl MongoAdminRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("admins"),
        }
    }
}

#[async_trait]
impl AdminRepository for MongoAdminRepository {
    async fn create(&self, admin: Admin) -> Result<(), AppError> {
        tracing::info!("Creating admin record for {}", admin.email);
        self.collection.insert_one(&admin).await?;
        Ok(())
    }

    async fn get(&self, email: &str, google_id: &str) -> Result<Option<Admin>, AppError> {
        use mongodb::bson::doc;

        Ok(self
            .collection
            .find_one(doc! { "email": email, "googleid": google_id })
            .await?)
    }
}
