//! # hearth_api
//!
//! HTTP API library for Hearth.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use hearth_core::auth::token::TokenCodec;
use hearth_core::store::{IdentityStore, ResetNotifier};

use crate::config::ApiConfig;
use crate::handlers::{auth, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity store adapter.
    pub store: Arc<dyn IdentityStore>,
    /// Reset-request notification collaborator.
    pub notifier: Arc<dyn ResetNotifier>,
    /// Token codec, built once from the configured secret.
    pub codec: Arc<TokenCodec>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        notifier: Arc<dyn ResetNotifier>,
        config: ApiConfig,
    ) -> Self {
        let codec = Arc::new(config.token_codec());
        Self {
            store,
            notifier,
            codec,
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/auth/token", post(auth::login_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/forgot-password", post(auth::forgot_password_handler))
        .route("/api/users/agents", get(users::list_agents_handler))
        .route(
            "/api/users/{id}/public",
            get(users::get_public_profile_handler),
        );

    // Protected routes (require a resolvable bearer token)
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/auth/change-password",
            post(auth::change_password_handler),
        )
        .route(
            "/api/auth/refresh-token",
            post(auth::refresh_token_handler),
        )
        .route("/api/users", get(users::list_users_handler))
        .route("/api/users/{id}", get(users::get_user_handler))
        .route("/api/users/me", put(users::update_me_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
