use anyhow::Context;
use clap::Parser;
use log::info;
use taskboard_server::{AppState, Config, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let state = AppState::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open task database {}", config.database_url))?;

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("taskboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
