//! Rewards catalog API server.
//!
//! Wires the database pool, the authentication core, and the account and
//! catalog managers into an Axum HTTP API.

mod api;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::Error;
use rewards_catalog::{
    account::AccountManager,
    auth::{AuthManager, PasswordHasher},
    catalog::CatalogManager,
    db::{CredentialStore, Database, PgAccountRepository},
    notify::{Notifier, spawn_mailer},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    logging::init();

    let config = config::ServerConfig::from_env()?;
    config.validate()?;

    tracing::info!(bind = %config.bind, "starting rewards catalog server");

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    tracing::info!("database connected");

    let pool = Arc::new(db.pool().clone());

    let notifier = match config.mail.clone() {
        Some(mail) => {
            tracing::info!(host = %mail.smtp_host, "mail notifications enabled");
            spawn_mailer(mail)
        }
        None => {
            tracing::info!("mail notifications disabled (no MAIL_HOST configured)");
            Notifier::disabled()
        }
    };

    let store: Arc<dyn CredentialStore> = Arc::new(PgAccountRepository::new(pool.as_ref().clone()));
    let hasher = PasswordHasher::new(config.security.password_pepper.clone());

    let auth = Arc::new(AuthManager::new(
        store,
        config.security.auth_config(),
        notifier.clone(),
    ));
    let accounts = Arc::new(AccountManager::new(pool.clone(), hasher, notifier));
    let catalog = Arc::new(CatalogManager::new(pool.clone()));

    let state = api::AppState {
        auth,
        accounts,
        catalog,
        pool,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    tracing::info!("server is running at http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("shutting down server");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
