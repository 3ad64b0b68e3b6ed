use tokio::net::TcpListener;

use parley::api::{self, AppState};
use parley::config::Config;
use parley::discovery::DiscoveryClient;
use parley::generative::GenerativeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let config = Config::from_env()?;

    let discovery = DiscoveryClient::from_config(&config)?;
    let generative = match &config.generative_model {
        Some(model) => Some(GenerativeClient::new(
            config.project_id.clone(),
            config.location.clone(),
            model.clone(),
        )?),
        None => None,
    };

    let port = config.port;
    let state = AppState::new(config, discovery, generative);
    let router = api::create_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("listening on 0.0.0.0:{port}");
    axum::serve(listener, router).await?;

    Ok(())
}
