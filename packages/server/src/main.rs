use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::advisor::{HttpAdvisor, SuggestionAdvisor};
use server::config::AppConfig;
use server::database::init_db;
use server::notify::{ChannelNotifier, Notifier};
use server::state::AppState;
use server::store::SeaOrmStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected and schema synced");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let notifier = ChannelNotifier::from_config(&config.notify, client.clone());
    info!(
        sms = notifier.sms_enabled(),
        email = notifier.email_enabled(),
        "Notification channels"
    );

    let advisor = HttpAdvisor::from_config(&config.ai, client)
        .map(|advisor| Arc::new(advisor) as Arc<dyn SuggestionAdvisor>);
    if advisor.is_none() {
        info!("No AI API key configured, suggestions use heuristics only");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(SeaOrmStore::new(db)),
        notifier: Arc::new(notifier),
        advisor,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
