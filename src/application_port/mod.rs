mod auth_service;
mod project_service;
mod session_service;

pub use auth_service::*;
pub use project_service::*;
pub use session_service::*;
