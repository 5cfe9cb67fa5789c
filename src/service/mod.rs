pub mod admin_service;
pub mod project_service;
pub mod user_service;
