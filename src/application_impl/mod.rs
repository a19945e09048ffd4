mod auth_service_impl;
mod project_service_impl;
mod session_service_impl;

pub use auth_service_impl::*;
pub use project_service_impl::*;
pub use session_service_impl::*;
