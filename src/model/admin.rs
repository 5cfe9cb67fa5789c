use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin record, one-to-one with a User. Role and permissions are plain
/// data; authorization over them is a read, never a dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub role: AdminRole,
    #[serde(default)]
    pub permissions: AdminPermissions,
    #[serde(default)]
    pub admin_info: AdminInfo,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_activity: DateTime<Utc>,
    pub status: AdminStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Superadmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPermissions {
    #[serde(default)]
    pub manage_users: bool,
    #[serde(default = "default_true")]
    pub manage_projects: bool,
    #[serde(default)]
    pub manage_categories: bool,
    #[serde(default)]
    pub manage_settings: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AdminPermissions {
    fn default() -> Self {
        AdminPermissions {
            manage_users: false,
            manage_projects: true,
            manage_categories: false,
            manage_settings: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime", default = "Utc::now")]
    pub admin_since: DateTime<Utc>,
}

impl Admin {
    pub fn new(user_id: ObjectId) -> Self {
        let now = Utc::now();
        Admin {
            id: None,
            user_id,
            role: AdminRole::Admin,
            permissions: AdminPermissions::default(),
            admin_info: AdminInfo {
                position: None,
                department: None,
                admin_since: now,
            },
            last_activity: now,
            status: AdminStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check a single named permission flag.
    pub fn has_permission(&self, permission: &str) -> bool {
        match permission {
            "manageUsers" => self.permissions.manage_users,
            "manageProjects" => self.permissions.manage_projects,
            "manageCategories" => self.permissions.manage_categories,
            "manageSettings" => self.permissions.manage_settings,
            _ => false,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::Superadmin
    }

    pub fn is_active(&self) -> bool {
        self.status == AdminStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_admin_defaults() {
        let admin = Admin::new(ObjectId::new());
        assert_eq!(admin.role, AdminRole::Admin);
        assert_eq!(admin.status, AdminStatus::Active);
        assert!(admin.permissions.manage_projects);
        assert!(!admin.permissions.manage_users);
        assert!(!admin.permissions.manage_categories);
        assert!(!admin.permissions.manage_settings);
    }

    #[test]
    fn test_has_permission() {
        let admin = Admin::new(ObjectId::new());
        assert!(admin.has_permission("manageProjects"));
        assert!(!admin.has_permission("manageUsers"));
        assert!(!admin.has_permission("manageSomethingElse"));
    }

    #[test]
    fn test_is_super_admin() {
        let mut admin = Admin::new(ObjectId::new());
        assert!(!admin.is_super_admin());
        admin.role = AdminRole::Superadmin;
        assert!(admin.is_super_admin());
    }

    #[test]
    fn test_is_active() {
        let mut admin = Admin::new(ObjectId::new());
        assert!(admin.is_active());
        admin.status = AdminStatus::Inactive;
        assert!(!admin.is_active());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_value(AdminRole::Superadmin).unwrap(),
            "superadmin"
        );
        assert_eq!(serde_json::to_value(AdminStatus::Active).unwrap(), "active");
    }
}
