mod auth;
mod authlog;
mod config;
mod handlers;
mod middleware;
mod models;
mod session;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coco_auth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load application configuration
    let app_config = match config::load_config_with_fallback() {
        Ok(config) => {
            tracing::info!("✓ Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match app_config.server.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(
                "Invalid bind address '{}': {}",
                app_config.server.bind_addr,
                e
            );
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(Arc::clone(&app_config));

    // Retention sweep for the auth log, when configured
    if let Some(days) = app_config.auth_logs.retention_days {
        let storage = app_state.auth_logs.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                let cutoff = chrono::Utc::now() - chrono::Duration::days(days as i64);
                match storage.cleanup_old_entries(cutoff).await {
                    Ok(removed) if removed > 0 => {
                        tracing::info!("Retention sweep removed {} auth log entries", removed)
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Retention sweep failed: {}", e),
                }
            }
        });
    }

    // Admin endpoints sit behind both the bearer check and the admin gate
    let admin_routes = Router::new()
        .route("/api/admin/auth-logs", get(handlers::admin::list_auth_logs))
        .route(
            "/api/admin/auth-logs/sessions",
            get(handlers::admin::list_sessions),
        )
        .route(
            "/api/admin/auth-logs/report",
            get(handlers::admin::session_report),
        )
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn(middleware::auth::auth_middleware));

    let app = Router::new()
        // Health check routes
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        // Auth routes
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/logout",
            post(handlers::auth::logout)
                .layer(axum::middleware::from_fn(middleware::auth::auth_middleware)),
        )
        .merge(admin_routes)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("🚀 Starting CocoConnect auth-log API server on {}", addr);
    tracing::info!("📖 Auth routes: /api/auth/*");
    tracing::info!("📖 Admin routes: /api/admin/auth-logs[/sessions|/report]");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
