mod authn;
mod cookies;
mod error;
mod handler;
mod router;

pub use authn::{require_identity, with_identity};
pub use cookies::CookieConfig;
pub use error::recover_error;
pub use router::routes;
