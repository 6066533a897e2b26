use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::config::{Config, ServerConfig};
use crate::constants::session::COOKIE_NAME;
use crate::state::SharedState;

pub mod auth;
mod error;
pub mod jobs;
mod observability;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub session_store: SqliteStore,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn job_service(&self) -> &Arc<dyn crate::services::JobService> {
        &self.shared.job_service
    }
}

/// Prepares the session table next to the application tables and drops
/// sessions that expired while the server was down.
pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let session_store = SqliteStore::new(shared.store.conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;
    session_store
        .delete_expired()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge expired sessions: {e}"))?;
    info!("Session store ready");

    Ok(Arc::new(AppState {
        shared,
        session_store,
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config().server.clone();

    let protected_routes = create_protected_router(state.clone());

    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name(COOKIE_NAME)
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    Router::new()
        .merge(protected_routes)
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/metrics", get(observability::get_metrics))
        .fallback(not_found)
        .layer(session_layer)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(cors_layer(&server))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(auth::get_current_user))
        .route("/jobs", get(jobs::list_jobs).post(jobs::add_job))
        .route("/jobs/between", get(jobs::jobs_between_dates))
        .route("/jobs/company/{name}", get(jobs::jobs_by_company))
        .route(
            "/jobs/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// Browsers refuse credentialed responses with a wildcard origin, so cookies
/// are only allowed when the origins are listed explicitly.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
