use std::sync::Arc;

use account_service::account::models::EmailAddress;
use account_service::config::Config;
use account_service::domain::account::service::AccountService;
use account_service::domain::email::service::EmailService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresAccountStore;
use account_service::outbound::repositories::PostgresEmailHistoryStore;
use account_service::outbound::smtp::SmtpMailRelay;
use auth::Authenticator;
use auth::ResetTokenManager;
use auth::SystemClock;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        smtp_from = %config.smtp.from_address,
        session_ttl_minutes = config.auth.session_ttl_minutes,
        reset_ttl_hours = config.auth.reset_ttl_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let clock = SystemClock::shared();
    let secret = config.auth.secret.as_bytes();

    let authenticator = Arc::new(
        Authenticator::new(secret, Arc::clone(&clock))
            .with_session_ttl(Duration::minutes(config.auth.session_ttl_minutes)),
    );
    let reset_tokens = ResetTokenManager::new(secret, Arc::clone(&clock))
        .with_ttl(Duration::hours(config.auth.reset_ttl_hours));

    let sender = EmailAddress::new(config.smtp.from_address.clone())?;
    let mail_relay = Arc::new(SmtpMailRelay::new(&config.smtp)?);
    let email_history = Arc::new(PostgresEmailHistoryStore::new(pg_pool.clone()));
    let account_store = Arc::new(PostgresAccountStore::new(pg_pool));

    let email_service = Arc::new(EmailService::new(
        mail_relay,
        email_history,
        sender,
        Arc::clone(&clock),
    ));

    let account_service = Arc::new(AccountService::new(
        account_store,
        Arc::clone(&email_service),
        Arc::clone(&authenticator),
        reset_tokens,
        clock,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(account_service, email_service, authenticator);

    axum::serve(listener, application).await?;

    Ok(())
}
