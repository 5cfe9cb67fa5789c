use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::model::admin::{AdminPermissions, AdminRole, AdminStatus};
use crate::repository::admin_repo::{AdminRepository, AdminRepositoryImpl};
use crate::util::error::ServiceError;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileResponse {
    pub id: String,
    pub user_id: String,
    pub role: AdminRole,
    pub permissions: AdminPermissions,
    pub admin_info: AdminInfoDto,
    pub status: AdminStatus,
    pub last_activity: String,
    pub is_super_admin: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfoDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub admin_since: String,
}

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn get_admin_profile(&self, user_id: &str) -> Result<AdminProfileResponse, ServiceError>;
}

pub struct AdminServiceImpl {
    pub admin_repo: Arc<AdminRepositoryImpl>,
}

impl AdminServiceImpl {
    pub fn new(admin_repo: Arc<AdminRepositoryImpl>) -> Self {
        Self { admin_repo }
    }
}

#[async_trait]
impl AdminService for AdminServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_admin_profile(&self, user_id: &str) -> Result<AdminProfileResponse, ServiceError> {
        let id = ObjectId::parse_str(user_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid user id".to_string()))?;
        let admin = self
            .admin_repo
            .find_by_user_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Admin record not found".to_string()))?;

        Ok(AdminProfileResponse {
            id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: admin.user_id.to_hex(),
            role: admin.role,
            permissions: admin.permissions.clone(),
            admin_info: AdminInfoDto {
                position: admin.admin_info.position.clone(),
                department: admin.admin_info.department.clone(),
                admin_since: admin.admin_info.admin_since.to_rfc3339(),
            },
            status: admin.status,
            last_activity: admin.last_activity.to_rfc3339(),
            is_super_admin: admin.is_super_admin(),
            is_active: admin.is_active(),
        })
    }
}
