//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors. Request-level errors are
//! `access::AccessError`, rendered through `kernel::error::AppError`.

use access::application::observer::TracingObserver;
use access::{
    AccessConfig, PgProfileStore, PushIdentityProvider, RetryingProfileStore, SessionContext,
    access_router, guarded_router, identity_callback_router,
};
use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,access=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Access configuration
    let config = Arc::new(access_config_from_env());
    tracing::info!(
        login_route = %config.routes.unauthenticated_entry,
        denied_route = %config.routes.permission_denied,
        resolve_wait_ms = config.resolve_wait_ms(),
        store_retries = config.store_retry.max_retries,
        "Access configuration loaded"
    );

    // Identity pipeline
    let store = RetryingProfileStore::new(PgProfileStore::new(pool), config.store_retry.clone());
    let provider = PushIdentityProvider::new();
    let gateway_secret = gateway_secret_from_env()?;
    let session = Arc::new(SessionContext::start(
        Arc::new(provider.clone()),
        Arc::new(store),
        Arc::new(TracingObserver),
        config.clone(),
    ));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(access_router(session.clone(), config.clone()))
        .merge(identity_callback_router(provider, gateway_secret))
        .merge(guarded_router(session.clone(), &config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("API_ADDR")
        .ok()
        .and_then(|addr| addr.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 31113)));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // No session writes after this point
    session.shutdown().await;
    tracing::info!("Server shut down");

    Ok(())
}

/// Defaults per build profile, then `ACCESS_*` overrides
fn access_config_from_env() -> AccessConfig {
    let mut config = if cfg!(debug_assertions) {
        AccessConfig::development()
    } else {
        AccessConfig::default()
    };

    if let Ok(route) = env::var("ACCESS_LOGIN_ROUTE") {
        config.routes.unauthenticated_entry = route;
    }
    if let Ok(route) = env::var("ACCESS_DENIED_ROUTE") {
        config.routes.permission_denied = route;
    }
    if let Some(ms) = env_parse::<u64>("ACCESS_RESOLVE_WAIT_MS") {
        config.resolve_wait = Duration::from_millis(ms);
    }
    if let Some(retries) = env_parse::<u32>("ACCESS_STORE_RETRIES") {
        config.store_retry.max_retries = retries;
    }

    config
}

/// Base64 HMAC key shared with the identity gateway
///
/// Debug builds fall back to a fixed key so local setups work without one.
fn gateway_secret_from_env() -> anyhow::Result<Vec<u8>> {
    match env::var("IDENTITY_GATEWAY_SECRET") {
        Ok(raw) => {
            let secret = platform::crypto::from_base64(raw.trim())
                .context("IDENTITY_GATEWAY_SECRET must be base64")?;
            anyhow::ensure!(!secret.is_empty(), "IDENTITY_GATEWAY_SECRET is empty");
            Ok(secret)
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("IDENTITY_GATEWAY_SECRET not set, using the development key");
            Ok(b"development-gateway-secret".to_vec())
        }
        Err(_) => anyhow::bail!("IDENTITY_GATEWAY_SECRET must be set"),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => tracing::info!("Received Ctrl+C"),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received Ctrl+C");
    }
}
