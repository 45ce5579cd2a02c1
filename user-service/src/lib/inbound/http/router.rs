use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::update_role::update_role;
use super::handlers::update_user::update_user;
use super::handlers::upload_image::get_avatar;
use super::handlers::upload_image::upload_avatar;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub upload_dir: PathBuf,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
    upload_dir: PathBuf,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
        upload_dir,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(authenticate))
        .route("/api/users", post(create_user).get(list_users))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/uploads/avatars/:name", get(get_avatar));

    let protected_routes = Router::new()
        .route("/api/users/:user_id", patch(update_user).delete(delete_user))
        .route("/api/users/:user_id/role", patch(update_role))
        .route("/api/uploads/avatar", post(upload_avatar))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str)
                .unwrap_or("unmatched");

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                route = %route,
                path = %request.uri().path(),
            )
        })
        .on_request(|_request: &Request<Body>, _span: &Span| {
            tracing::debug!("Request received");
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                let status = response.status();
                if status.is_server_error() {
                    tracing::error!(
                        status = status.as_u16(),
                        latency_ms = latency.as_millis(),
                        "Request failed"
                    );
                } else {
                    tracing::info!(
                        status = status.as_u16(),
                        latency_ms = latency.as_millis(),
                        "Request completed"
                    );
                }
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
