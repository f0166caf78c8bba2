//! Full login -> authenticated request -> refresh -> logout flow over the
//! HTTP surface, using the offline identity provider and the in-memory
//! refresh-token store.

use anteroom::api;
use anteroom::server::Server;
use anteroom::settings::{Auth, Http, Settings};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

fn test_settings() -> Settings {
    Settings {
        auth: Auth {
            issuer: "anteroom-e2e".to_string(),
            jwt_secret: Some("e2e-test-signing-key-e2e-test-32b".to_string()),
            access_ttl_secs: 900,
            refresh_ttl_secs: 3600,
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_same_site: "Lax".to_string(),
            access_cookie_path: "/".to_string(),
            refresh_cookie_path: "/api/v1/auth/refresh".to_string(),
            login_redirect: "/".to_string(),
            store_backend: "memory".to_string(),
            provider_backend: "fake".to_string(),
        },
        google: None,
        http: Http {
            address: "127.0.0.1:0".to_string(),
            tls: None,
        },
        log: Default::default(),
        redis: Default::default(),
    }
}

async fn test_routes()
-> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    let server = Arc::new(Server::try_new(&test_settings()).await.unwrap());
    warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server))
        .recover(api::v1::recover_error)
}

/// Set-Cookie values for the named cookie, bare `name=value` part only.
fn cookies_named(response: &warp::http::Response<bytes::Bytes>, name: &str) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&format!("{}=", name)))
        .map(|v| v.split(';').next().unwrap().to_string())
        .collect()
}

async fn login(
    routes: &(impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible>
    + Clone
    + 'static),
    code: &str,
) -> warp::http::Response<bytes::Bytes> {
    warp::test::request()
        .method("GET")
        .path(&format!("/api/v1/auth/google/callback?code={}", code))
        .reply(routes)
        .await
}

#[tokio::test]
async fn login_sets_both_carriers_and_redirects() {
    let routes = test_routes().await;
    let response = login(&routes, "fake:sub-1:alice@example.com:Alice").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(cookies_named(&response, "access_token").len(), 1);
    assert_eq!(cookies_named(&response, "refresh_token").len(), 1);
}

#[tokio::test]
async fn login_with_incomplete_profile_is_unauthorized() {
    let routes = test_routes().await;

    // Blank email from the provider: no session is minted.
    let response = login(&routes, "fake:sub-2:").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(cookies_named(&response, "access_token").is_empty());
}

#[tokio::test]
async fn me_requires_authentication() {
    let routes = test_routes().await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_cookie_authenticates_me() {
    let routes = test_routes().await;
    let response = login(&routes, "fake:sub-3:carol@example.com:Carol").await;
    let access = cookies_named(&response, "access_token").remove(0);

    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("cookie", &access)
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "carol@example.com");
    assert_eq!(body["data"]["display_name"], "Carol");
}

#[tokio::test]
async fn corrupted_access_cookie_reads_as_anonymous() {
    let routes = test_routes().await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("cookie", "access_token=not.a.token")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_and_old_token_dies() {
    let routes = test_routes().await;
    let response = login(&routes, "fake:sub-4:dave@example.com").await;
    let old_refresh = cookies_named(&response, "refresh_token").remove(0);

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .header("cookie", &old_refresh)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let new_refresh = cookies_named(&response, "refresh_token").remove(0);
    assert_ne!(old_refresh, new_refresh);
    assert_eq!(cookies_named(&response, "access_token").len(), 1);

    // Replaying the consumed token is refused.
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .header("cookie", &old_refresh)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated token still works.
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .header("cookie", &new_refresh)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let routes = test_routes().await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let routes = test_routes().await;
    let response = login(&routes, "fake:sub-5:erin@example.com").await;
    let access = cookies_named(&response, "access_token").remove(0);
    let token = access.strip_prefix("access_token=").unwrap().to_string();

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .header("cookie", format!("refresh_token={}", token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_and_clears_carriers() {
    let routes = test_routes().await;
    let response = login(&routes, "fake:sub-6:frank@example.com").await;
    let refresh = cookies_named(&response, "refresh_token").remove(0);

    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/logout")
        .header("cookie", &refresh)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cleared: Vec<String> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));

    // The revoked token can no longer rotate.
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .header("cookie", &refresh)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_is_forgiving_about_the_carrier() {
    let routes = test_routes().await;

    // No cookie at all.
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/logout")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Malformed cookie.
    let response = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/logout")
        .header("cookie", "refresh_token=gar.bage")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_entry_redirects_to_the_provider() {
    let routes = test_routes().await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/v1/auth/google/login")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().contains_key("location"));
}
