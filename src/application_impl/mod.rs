mod identity_provider_fake;
mod identity_provider_google;
mod session_service_impl;
mod token_codec_jwt;
mod user_service_impl;

pub use identity_provider_fake::*;
pub use identity_provider_google::*;
pub use session_service_impl::*;
pub use token_codec_jwt::*;
pub use user_service_impl::*;
