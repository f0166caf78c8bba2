mod identity_provider;
mod session_service;
mod user_service;

pub use identity_provider::*;
pub use session_service::*;
pub use user_service::*;
