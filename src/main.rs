//! Company Accounts - company sign up and bank account management API
//!
//! Companies register with an email, a password and a UK bank account.
//! Bank details are modulus checked before they are stored encrypted.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use company_accounts::api::{self, AppState};
use company_accounts::db;
use company_accounts::handlers::AccountService;
use company_accounts::modulus::ModulusChecker;
use company_accounts::notifier::{LogNotifier, NotificationQueue, Notifier, SendGridNotifier};
use company_accounts::security::BankDetailsCipher;
use company_accounts::store::PgAccountStore;
use company_accounts::Config;

/// How long pending notifications may take to flush on shutdown
const NOTIFIER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Initialize tracing/logging; JSON lines in production
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "company_accounts=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Pick the mail transport from configuration
fn build_notifier(config: &Config) -> anyhow::Result<Arc<dyn Notifier>> {
    match (&config.sendgrid_api_key, &config.mail_from) {
        (Some(api_key), Some(from)) => Ok(Arc::new(SendGridNotifier::new(
            api_key.clone(),
            from.clone(),
        )?)),
        _ => {
            tracing::warn!("SENDGRID_API_KEY not set; notifications will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = %config.environment, "Starting company accounts server");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(config.database.clone())
        .await?;
    db::verify_connection(&pool).await?;

    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");

    let validator = ModulusChecker::load(
        config.modulus_weights_path.as_deref(),
        config.modulus_substitutions_path.as_deref(),
    )?;
    let cipher = BankDetailsCipher::from_secret(&config.bank_details_key)?;
    let (notifications, notifier_worker) = NotificationQueue::start(build_notifier(&config)?);

    let service = AccountService::new(
        Arc::new(PgAccountStore::new(pool.clone())),
        Arc::new(validator),
        cipher,
        notifications,
    );
    let app = api::build_router(AppState::new(service));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    if tokio::time::timeout(NOTIFIER_DRAIN_TIMEOUT, notifier_worker)
        .await
        .is_err()
    {
        tracing::warn!("Notification queue did not drain before timeout");
    }
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
