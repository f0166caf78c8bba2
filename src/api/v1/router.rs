use super::authn::require_identity;
use super::handler;
use super::handler::CallbackQuery;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // warp's cookie filters want 'static names; the configured names live
    // for the whole process anyway.
    let access_cookie: &'static str = Box::leak(server.cookies.access_name.clone().into_boxed_str());
    let refresh_cookie: &'static str =
        Box::leak(server.cookies.refresh_name.clone().into_boxed_str());

    let google_login = warp::get()
        .and(warp::path("auth"))
        .and(warp::path("google"))
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(with(server.clone()))
        .and_then(handler::google_login);

    let google_callback = warp::get()
        .and(warp::path("auth"))
        .and(warp::path("google"))
        .and(warp::path("callback"))
        .and(warp::path::end())
        .and(warp::query::<CallbackQuery>())
        .and(with(server.clone()))
        .and_then(handler::login_callback);

    let refresh = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(warp::cookie::optional::<String>(refresh_cookie))
        .and(with(server.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path("auth"))
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(warp::cookie::optional::<String>(refresh_cookie))
        .and(with(server.clone()))
        .and_then(handler::logout);

    let me = warp::get()
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(require_identity(server.token_codec.clone(), access_cookie))
        .and(with(server.clone()))
        .and_then(handler::me);

    google_login
        .or(google_callback)
        .or(refresh)
        .or(logout)
        .or(me)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
