use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::domain::session::service::SessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryCredentialStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let token_settings = config.token_settings()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_token_ttl_hours = config.jwt.access_token_ttl_hours,
        refresh_token_ttl_hours = config.jwt.refresh_token_ttl_hours,
        "Configuration loaded"
    );

    let authenticator = Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.password.salt.as_bytes(),
        token_settings,
    );

    let credential_store = Arc::new(InMemoryCredentialStore::new());
    tracing::info!(store = "in-memory", "Credential store ready");

    let session_service = Arc::new(SessionService::new(credential_store, authenticator));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, create_router(session_service)).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
