use crate::settings::Auth;
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use std::time::Duration;

/// Renders the transport carriers: Set-Cookie values for the access and
/// refresh tokens, and their cleared counterparts for logout.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub access_name: String,
    pub refresh_name: String,
    domain: Option<String>,
    secure: bool,
    same_site: SameSite,
    access_path: String,
    refresh_path: String,
}

impl CookieConfig {
    pub fn from_settings(auth: &Auth) -> Self {
        let same_site = match auth.cookie_same_site.as_str() {
            "Strict" => SameSite::Strict,
            "None" => SameSite::None,
            _ => SameSite::Lax,
        };
        CookieConfig {
            access_name: auth.access_cookie_name.clone(),
            refresh_name: auth.refresh_cookie_name.clone(),
            domain: auth.cookie_domain.clone().filter(|d| !d.is_empty()),
            secure: auth.cookie_secure,
            same_site,
            access_path: auth.access_cookie_path.clone(),
            refresh_path: auth.refresh_cookie_path.clone(),
        }
    }

    pub fn access_cookie(&self, token: &str, ttl: Duration) -> String {
        self.build(&self.access_name, token, &self.access_path, ttl)
    }

    pub fn refresh_cookie(&self, token: &str, ttl: Duration) -> String {
        self.build(&self.refresh_name, token, &self.refresh_path, ttl)
    }

    pub fn clear_access_cookie(&self) -> String {
        self.build(&self.access_name, "", &self.access_path, Duration::ZERO)
    }

    pub fn clear_refresh_cookie(&self) -> String {
        self.build(&self.refresh_name, "", &self.refresh_path, Duration::ZERO)
    }

    fn build(&self, name: &str, value: &str, path: &str, ttl: Duration) -> String {
        let mut builder = Cookie::build((name.to_string(), value.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path(path.to_string())
            .max_age(CookieDuration::seconds(ttl.as_secs() as i64));

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build().to_string()
    }
}
