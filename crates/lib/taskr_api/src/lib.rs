//! # taskr_api
//!
//! HTTP API library for taskr: auth endpoints and per-user task CRUD.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use taskr_core::auth::jwt::TokenIssuer;
use taskr_core::auth::refresh::{InMemoryRefreshTokenStore, RefreshTokenStore};
use taskr_core::store::UserStore;
use taskr_core::store::memory::MemoryStore;
use taskr_core::tasks::TaskStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{auth, tasks};
use crate::services::auth::AuthService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Register/login/refresh and identity resolution.
    pub auth: Arc<AuthService>,
    /// Task persistence.
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    /// Wire the auth service and stores together.
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self, AppError> {
        let issuer = TokenIssuer::new(config.jwt_secret.as_bytes(), config.jwt_algorithm)?;
        let auth = AuthService::new(users, refresh_tokens, issuer, config.access_token_ttl());
        Ok(Self {
            config,
            auth: Arc::new(auth),
            tasks,
        })
    }

    /// State backed entirely by process memory.
    pub fn in_memory(config: ApiConfig) -> Result<Self, AppError> {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            config,
            store.clone(),
            Arc::new(InMemoryRefreshTokenStore::new()),
            store,
        )
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
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_REFRESH, post(auth::refresh_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::POST_AUTH_LOGOUT, post(auth::logout_handler))
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .route(
            routes::TASKS,
            post(tasks::create_task_handler).get(tasks::list_tasks_handler),
        )
        .route(
            routes::TASKS_ID,
            get(tasks::get_task_handler)
                .put(tasks::update_task_handler)
                .delete(tasks::delete_task_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
