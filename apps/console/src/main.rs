use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use shared_config::AppConfig;
use shared_gateway::BackendClient;
use shared_models::SessionContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting abrigo admin console");

    // Load configuration and wire the shared session + gateway
    let config = AppConfig::from_env();
    let session = SessionContext::new();
    let client =
        BackendClient::new(&config, session).context("failed to build the backend client")?;

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Remote failures become operator notifications, never a crash.
    if let Err(err) = commands::dispatch(&config, &client, &args).await {
        eprintln!("Erro: {}", err.user_message());
        std::process::exit(1);
    }

    Ok(())
}
