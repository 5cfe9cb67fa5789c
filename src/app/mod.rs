pub mod app;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::service::admin_service::AdminServiceImpl;
use crate::service::project_service::ProjectServiceImpl;
use crate::service::user_service::UserServiceImpl;

/// Everything request handlers need, constructed once at startup and
/// passed in explicitly instead of living in module-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<ProjectServiceImpl>,
    pub user_service: Arc<UserServiceImpl>,
    pub admin_service: Arc<AdminServiceImpl>,
    pub config: AppConfig,
}
