pub mod admin_handler;
pub mod project_handler;
pub mod system_handler;
pub mod user_handler;
