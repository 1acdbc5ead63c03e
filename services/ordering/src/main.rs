use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use common::ClientError;
use ordering::{BackendClient, BackendConfig, models::MenuQuery};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting food ordering client");

    let config = BackendConfig::from_env()?;
    info!(
        "Using backend {} for project {}",
        config.endpoint, config.project_id
    );

    let client = BackendClient::connect(config)?;

    match client.get_current_user().await {
        Ok(user) => info!("Signed in as {} <{}>", user.name, user.email),
        Err(ClientError::NotFound) => info!("No signed-in user"),
        Err(e) => warn!("Failed to load current user: {}", e),
    }

    let categories = client.get_categories().await?;
    info!("Loaded {} menu categories", categories.len());

    let menu = client.get_menu(&MenuQuery::default()).await?;
    info!("Loaded {} menu items", menu.len());

    Ok(())
}
