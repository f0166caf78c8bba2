use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    #[serde(default)]
    pub google: Option<Google>,
    pub http: Http,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub redis: Redis,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Base64 or raw UTF-8; at least 32 bytes once decoded. The
    /// `JWT_SIGNING_KEY` environment variable takes precedence.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
    #[serde(default = "default_access_cookie_name")]
    pub access_cookie_name: String,
    #[serde(default = "default_refresh_cookie_name")]
    pub refresh_cookie_name: String,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_same_site")]
    pub cookie_same_site: String, // "Lax", "Strict" or "None"
    #[serde(default = "default_access_cookie_path")]
    pub access_cookie_path: String,
    #[serde(default = "default_refresh_cookie_path")]
    pub refresh_cookie_path: String,
    #[serde(default = "default_login_redirect")]
    pub login_redirect: String,
    pub store_backend: String,    // "memory" or "redis"
    pub provider_backend: String, // "fake" or "google"
}

#[derive(Debug, Deserialize)]
pub struct Google {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_google_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_google_token_url")]
    pub token_url: String,
    #[serde(default = "default_google_userinfo_url")]
    pub userinfo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    #[serde(default)]
    pub tls: Option<Tls>,
}

#[derive(Debug, Deserialize)]
pub struct Tls {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Redis {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_prefix")]
    pub key_prefix: String,
}

impl Default for Redis {
    fn default() -> Self {
        Redis {
            url: default_redis_url(),
            key_prefix: default_redis_prefix(),
        }
    }
}

fn default_issuer() -> String {
    "anteroom".to_string()
}

fn default_access_ttl_secs() -> u64 {
    15 * 60
}

fn default_refresh_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_access_cookie_name() -> String {
    "access_token".to_string()
}

fn default_refresh_cookie_name() -> String {
    "refresh_token".to_string()
}

fn default_same_site() -> String {
    "Lax".to_string()
}

fn default_access_cookie_path() -> String {
    "/".to_string()
}

fn default_refresh_cookie_path() -> String {
    "/api/v1/auth/refresh".to_string()
}

fn default_login_redirect() -> String {
    "/".to_string()
}

fn default_google_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_google_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_google_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_prefix() -> String {
    "sess:refresh".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
