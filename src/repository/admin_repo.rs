use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{options::IndexOptions, IndexModel};
use tracing::{error, info};

use crate::model::admin::Admin;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn insert(&self, admin: Admin) -> RepositoryResult<Admin>;
    async fn find_by_user_id(&self, user_id: &ObjectId) -> RepositoryResult<Option<Admin>>;
}

pub struct AdminRepositoryImpl {
    collection: mongodb::Collection<Admin>,
}

impl AdminRepositoryImpl {
    pub async fn new(db: &mongodb::Database) -> Result<Self, mongodb::error::Error> {
        let collection = db.collection::<Admin>("admins");

        // At most one Admin record per User
        collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "userId": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                None,
            )
            .await?;

        Ok(AdminRepositoryImpl { collection })
    }
}

#[async_trait]
impl AdminRepository for AdminRepositoryImpl {
    async fn insert(&self, mut admin: Admin) -> RepositoryResult<Admin> {
        admin.id = Some(ObjectId::new());
        match self.collection.insert_one(admin.clone(), None).await {
            Ok(_) => {
                info!("Admin record created for user {}", admin.user_id);
                Ok(admin)
            }
            Err(e) => {
                error!("Failed to insert admin record: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_user_id(&self, user_id: &ObjectId) -> RepositoryResult<Option<Admin>> {
        let filter = doc! { "userId": user_id };
        let admin = self.collection.find_one(filter, None).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find admin by user id: {}", e))
        })?;
        Ok(admin)
    }
}
