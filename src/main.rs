//! Community CMS Backend
//!
//! A production-grade REST backend for a community organization's website:
//! public content endpoints plus a PSK-protected admin back-office, with
//! SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod paging;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Community CMS Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.admin_psk.is_none() {
        tracing::warn!("No admin PSK configured (CMS_ADMIN_PSK). The admin API is unprotected!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.admin_psk.clone();

    // Public site routes (read-only)
    let public_routes = Router::new()
        .route("/projects", get(api::list_projects))
        .route("/projects/{slug}", get(api::get_project_by_slug))
        .route("/members", get(api::list_members))
        .route("/categories", get(api::list_categories))
        .route("/galleries", get(api::list_galleries))
        .route("/galleries/{id}", get(api::get_gallery))
        .route("/articles", get(api::list_articles))
        .route("/articles/{slug}", get(api::get_article_by_slug));

    // Admin back-office routes
    let admin_routes = Router::new()
        // Projects
        .route("/projects", get(api::list_projects))
        .route("/projects", post(api::create_project))
        .route("/projects/{id}", get(api::get_project))
        .route("/projects/{id}", put(api::update_project))
        .route("/projects/{id}", delete(api::delete_project))
        .route("/projects/{id}/team", put(api::reconcile_team))
        .route(
            "/projects/{id}/team/{member_id}/role",
            put(api::set_team_role),
        )
        .route("/projects/{id}/media", post(api::attach_media))
        .route("/media/{id}", delete(api::delete_media))
        // Members
        .route("/members", get(api::list_members_admin))
        .route("/members", post(api::create_member))
        .route("/members/{id}", get(api::get_member))
        .route("/members/{id}", put(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        // Categories
        .route("/categories", post(api::create_category))
        .route("/categories/{id}", put(api::update_category))
        .route("/categories/{id}", delete(api::delete_category))
        // Galleries
        .route("/galleries", get(api::list_galleries_admin))
        .route("/galleries", post(api::create_gallery))
        .route("/galleries/{id}", get(api::get_gallery_admin))
        .route("/galleries/{id}", put(api::update_gallery))
        .route("/galleries/{id}", delete(api::delete_gallery))
        .route("/galleries/{id}/items", post(api::add_gallery_item))
        .route("/gallery-items/{id}", delete(api::delete_gallery_item))
        // Articles
        .route("/articles", get(api::list_articles_admin))
        .route("/articles", post(api::create_article))
        .route("/articles/{id}", get(api::get_article))
        .route("/articles/{id}", put(api::update_article))
        .route("/articles/{id}", delete(api::delete_article))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    let api_routes = public_routes.nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
