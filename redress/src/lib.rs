//! # redress: Complaint and Feedback Management Backend
//!
//! `redress` is a self-hostable backend for collecting and resolving customer complaints.
//! It exposes a RESTful API for user registration and profiles, complaint submission and
//! triage, admin responses, and general product feedback.
//!
//! ## Overview
//!
//! Clients register an account, submit complaints, and follow them through a status
//! lifecycle (`NEW`, `IN_REVIEW`, `IN_PROGRESS`, and terminal `RESOLVED`, `REJECTED`, or
//! `CLOSED`). Administrators triage the
//! queue: they update statuses and post responses, and every state change is recorded in
//! an append-only per-complaint history. A separate feedback channel collects free-text
//! ratings that don't need a resolution workflow.
//!
//! Access is ownership-scoped: clients only ever see their own complaints and feedback,
//! while admins see everything. Requests from a non-owner to someone else's complaint
//! return 404 rather than 403 so that complaint IDs are not enumerable.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP
//! layer and uses PostgreSQL for all persistence. Authentication is stateless: a signed
//! JWT carried either in an HTTP-only session cookie (browser clients) or an
//! `Authorization: Bearer` header (API clients). Uploaded avatars are stored on the local
//! filesystem under `media_root` and served back at `/media/*`.
//!
//! The **API layer** ([`api`]) exposes the management surface at `/api/v1/*` using
//! RESTful conventions, with wire models kept separate from storage models. The
//! **authentication layer** ([`auth`]) issues and verifies session tokens and hashes
//! passwords with Argon2id. The **database layer** ([`db`]) uses the repository pattern:
//! each entity has a repository over a `PgConnection`, so multi-step operations (such as
//! a status change plus its history entry) compose inside a single transaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use redress::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = redress::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     redress::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod avatars;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

use crate::{
    api::models::users::Role,
    auth::password,
    avatars::AvatarStore,
    config::CorsOrigin,
    db::handlers::{Repository, Users},
    db::models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    openapi::ApiDoc,
};
use axum::{
    Router,
    http::{self, HeaderValue},
    routing::{get, patch, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{AdminResponseId, ComplaintId, FeedbackId, HistoryEntryId, UserId};

/// Application state shared across all request handlers.
///
/// Contains the shared resources needed by the API handlers: the database pool,
/// the loaded configuration, and the avatar store rooted at `media_root`.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config.clone())
///     .avatars(AvatarStore::new(&config.media_root))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub avatars: AvatarStore,
}

/// Get the redress database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// This function is idempotent: it creates the admin user on first startup, or updates
/// the password if the user already exists and a password is configured. The admin email
/// doubles as the username.
///
/// Returns the user ID of the created or existing admin user.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(email: &str, password: Option<&str>, db: &PgPool) -> anyhow::Result<UserId> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_string(pwd).map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?),
        None => None,
    };

    // Use a transaction to ensure atomicity
    let mut tx = db.begin().await?;
    let mut user_repo = Users::new(&mut tx);

    if let Some(existing_user) = user_repo.get_user_by_email(email).await? {
        // User exists - refresh the password if one is configured
        if password_hash.is_some() {
            user_repo
                .update(
                    existing_user.id,
                    &UserUpdateDBRequest {
                        password_hash,
                        ..Default::default()
                    },
                )
                .await?;
        }
        tx.commit().await?;
        return Ok(existing_user.id);
    }

    let user_create = UserCreateDBRequest {
        username: email.to_string(),
        email: email.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        role: Role::Admin,
        is_superuser: true,
        is_staff: true,
        password_hash,
    };

    let created_user = user_repo.create(&user_create).await?;

    tx.commit().await?;
    info!(admin_email = %email, "Created initial admin user");
    Ok(created_user.id)
}

/// Connect to the database, run migrations, and bootstrap the admin user
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool_settings = &config.database.pool;
    let mut options = sqlx::postgres::PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(pool_settings.acquire_timeout_secs));

    if pool_settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(std::time::Duration::from_secs(pool_settings.idle_timeout_secs));
    }
    if pool_settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(std::time::Duration::from_secs(pool_settings.max_lifetime_secs));
    }

    let pool = options.connect(&config.database.url).await?;
    migrator().run(&pool).await?;

    create_initial_admin_user(&config.admin_email, config.admin_password.as_deref(), &pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create initial admin user: {}", e))?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PATCH, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Authentication and profile routes
/// - Complaint, admin response, and feedback routes
/// - Media file serving for uploaded avatars
/// - Interactive API documentation at `/docs`
/// - CORS configuration
/// - Tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Authentication and profile
        .route("/auth/register", post(api::handlers::auth::register))
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route("/auth/me", get(api::handlers::auth::me).patch(api::handlers::auth::update_me))
        .route("/auth/me/avatar", post(api::handlers::auth::upload_avatar))
        // Complaints
        .route(
            "/complaints",
            post(api::handlers::complaints::create_complaint).get(api::handlers::complaints::list_complaints),
        )
        .route("/complaints/{complaint_id}", get(api::handlers::complaints::get_complaint))
        .route(
            "/complaints/{complaint_id}/status",
            patch(api::handlers::complaints::update_complaint_status),
        )
        .route(
            "/complaints/{complaint_id}/history",
            get(api::handlers::complaints::list_complaint_history),
        )
        .route(
            "/complaints/{complaint_id}/responses",
            post(api::handlers::complaints::create_admin_response).get(api::handlers::complaints::list_admin_responses),
        )
        // Feedback
        .route(
            "/feedback",
            post(api::handlers::feedback::create_feedback).get(api::handlers::feedback::list_feedback),
        );

    let media_service = ServeDir::new(&state.config.media_root);

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .nest_service("/media", media_service)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations, and
///    bootstraps the initial admin user
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, in-flight requests drain and
///    database connections are closed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting redress with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .avatars(AvatarStore::new(&config.media_root))
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "redress listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_router_builds_with_default_state() {
        // Router assembly should not require a live database connection
        let config = Config {
            secret_key: Some("test-secret".to_string()),
            ..Config::default()
        };
        let pool = PgPool::connect_lazy(&config.database.url).expect("lazy pool");
        let state = AppState::builder()
            .db(pool)
            .config(config.clone())
            .avatars(AvatarStore::new(&config.media_root))
            .build();

        assert!(build_router(state).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_nothing_valid() {
        let config = Config::default();
        assert!(create_cors_layer(&config).is_ok());
    }
}
