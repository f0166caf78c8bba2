use super::error::ApiErrorCode;
use crate::application_port::TokenCodec;
use crate::domain_model::{AuthenticatedUser, TokenKind};
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

/// Per-request authenticator. Reads the access cookie and attaches the
/// verified identity to the request; on any failure it degrades to
/// anonymous instead of rejecting. A corrupted cookie looks exactly like a
/// missing one — route protection is a separate, downstream concern.
pub fn with_identity(
    token_codec: Arc<dyn TokenCodec>,
    access_cookie_name: &'static str,
) -> impl Filter<Extract = (Option<AuthenticatedUser>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(access_cookie_name).then(move |token: Option<String>| {
        let token_codec = token_codec.clone();
        async move {
            let token = token?;
            match token_codec.verify(&token).await {
                Ok(claims) if claims.kind == TokenKind::Access => Some(AuthenticatedUser {
                    user_id: claims.user_id,
                    email: claims.email,
                }),
                // Wrong kind or failed verification: proceed unauthenticated.
                _ => None,
            }
        }
    })
}

/// Route protection on top of `with_identity`: anonymous requests are
/// rejected with 401.
pub fn require_identity(
    token_codec: Arc<dyn TokenCodec>,
    access_cookie_name: &'static str,
) -> impl Filter<Extract = (AuthenticatedUser,), Error = warp::Rejection> + Clone {
    with_identity(token_codec, access_cookie_name).and_then(
        |identity: Option<AuthenticatedUser>| async move {
            identity.ok_or_else(|| reject::custom(ApiErrorCode::Unauthorized))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::JwtHs256Codec;
    use crate::domain_model::UserId;
    use std::time::Duration;

    const COOKIE: &str = "access_token";

    fn codec() -> Arc<dyn TokenCodec> {
        Arc::new(JwtHs256Codec::from_secret("anteroom-test", "filter-test-secret-filter-test-32").unwrap())
    }

    async fn issue(codec: &Arc<dyn TokenCodec>, kind: TokenKind) -> String {
        let (token, _) = codec
            .issue(
                UserId(uuid::Uuid::new_v4()),
                "a@example.com",
                kind,
                "jti-f",
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        token
    }

    #[tokio::test]
    async fn valid_access_cookie_attaches_identity() {
        let codec = codec();
        let token = issue(&codec, TokenKind::Access).await;
        let filter = with_identity(codec, COOKIE);

        let identity = warp::test::request()
            .header("cookie", format!("{}={}", COOKIE, token))
            .filter(&filter)
            .await
            .unwrap();
        assert!(identity.is_some());
        assert_eq!(identity.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn missing_cookie_is_anonymous() {
        let filter = with_identity(codec(), COOKIE);
        let identity = warp::test::request().filter(&filter).await.unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn corrupted_cookie_is_anonymous_not_an_error() {
        let filter = with_identity(codec(), COOKIE);
        let identity = warp::test::request()
            .header("cookie", format!("{}=gar.bage.cookie", COOKIE))
            .filter(&filter)
            .await
            .unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn refresh_token_in_access_position_is_anonymous() {
        let codec = codec();
        let token = issue(&codec, TokenKind::Refresh).await;
        let filter = with_identity(codec, COOKIE);

        let identity = warp::test::request()
            .header("cookie", format!("{}={}", COOKIE, token))
            .filter(&filter)
            .await
            .unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn require_identity_rejects_anonymous_requests() {
        let filter = require_identity(codec(), COOKIE);
        let result = warp::test::request().filter(&filter).await;
        assert!(result.is_err());
    }
}
