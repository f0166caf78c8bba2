use super::error::*;
use crate::domain_model::AuthenticatedUser;
use crate::server::Server;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use warp::http::{Uri, header};
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn parse_uri(raw: &str) -> Result<Uri, warp::Rejection> {
    raw.parse::<Uri>()
        .map_err(|e| reject::custom(ApiErrorCode::internal(e)))
}

/// Entry point of the login flow: bounce the browser to the provider.
pub async fn google_login(server: Arc<Server>) -> Result<impl warp::Reply, warp::Rejection> {
    let uri = parse_uri(&server.identity_provider.authorize_url())?;
    Ok(warp::redirect::found(uri))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Login completion: the provider has verified the user; resolve the local
/// record, mint a session, hand both carriers to the browser and send it on.
pub async fn login_callback(
    query: CallbackQuery,
    server: Arc<Server>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity = server
        .identity_provider
        .exchange_code(&query.code)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    if identity.subject.trim().is_empty() || identity.email.trim().is_empty() {
        warn!("login callback with incomplete provider profile");
        return Err(reject::custom(ApiErrorCode::Unauthorized));
    }

    let user = server
        .user_service
        .upsert_external_user(
            &identity.subject,
            &identity.email,
            identity.display_name.as_deref(),
        )
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let tokens = server
        .session_service
        .issue(&user)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let redirect = warp::redirect::found(parse_uri(&server.login_redirect)?);
    let reply = warp::reply::with_header(
        redirect,
        header::SET_COOKIE,
        server
            .cookies
            .access_cookie(&tokens.access_token.0, server.session_service.access_ttl()),
    );
    let reply = warp::reply::with_header(
        reply,
        header::SET_COOKIE,
        server
            .cookies
            .refresh_cookie(&tokens.refresh_token.0, server.session_service.refresh_ttl()),
    );
    Ok(reply)
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

pub async fn refresh(
    refresh_cookie: Option<String>,
    server: Arc<Server>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let token = refresh_cookie.ok_or_else(|| reject::custom(ApiErrorCode::Unauthorized))?;

    let tokens = server
        .session_service
        .rotate(&token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let json = warp::reply::json(&ApiResponse::ok(RefreshResponse {
        access_expires_at: tokens.access_expires_at,
        refresh_expires_at: tokens.refresh_expires_at,
    }));
    let reply = warp::reply::with_header(
        json,
        header::SET_COOKIE,
        server
            .cookies
            .access_cookie(&tokens.access_token.0, server.session_service.access_ttl()),
    );
    let reply = warp::reply::with_header(
        reply,
        header::SET_COOKIE,
        server
            .cookies
            .refresh_cookie(&tokens.refresh_token.0, server.session_service.refresh_ttl()),
    );
    Ok(reply)
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

/// Always succeeds, always clears both carriers. An unusable refresh token
/// must never keep a user from signing out.
pub async fn logout(
    refresh_cookie: Option<String>,
    server: Arc<Server>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(e) = server
        .session_service
        .revoke(refresh_cookie.as_deref())
        .await
    {
        warn!("logout revoke failed: {}", e);
    }

    let json = warp::reply::json(&ApiResponse::ok(LogoutResponse));
    let reply = warp::reply::with_header(
        json,
        header::SET_COOKIE,
        server.cookies.clear_access_cookie(),
    );
    let reply = warp::reply::with_header(
        reply,
        header::SET_COOKIE,
        server.cookies.clear_refresh_cookie(),
    );
    Ok(reply)
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

pub async fn me(
    identity: AuthenticatedUser,
    server: Arc<Server>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = server
        .user_service
        .find_by_id(identity.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?
        .ok_or_else(|| reject::custom(ApiErrorCode::NotFound))?;

    let response = MeResponse {
        id: user.user_id.to_string(),
        email: user.email,
        display_name: user.display_name,
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}
