pub mod admin_router;
pub mod project_router;
pub mod system_router;
pub mod user_router;
