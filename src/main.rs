use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

mod components;
mod config;
mod controllers;
mod errors;
mod htmx;
mod middleware;
mod models;
mod query;
mod routes;
mod store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let config = config::Config::from_env()?;
    let store: Arc<dyn store::Store> = match &config.api_url {
        Some(url) => {
            log::info!("persisting notes through {url}");
            Arc::new(store::RemoteStore::new(url))
        }
        None => {
            log::info!("NOTES_API_URL is not set; notes live in memory");
            Arc::new(store::MemoryStore::new())
        }
    };
    let app = routes::app(models::AppState { store });

    log::info!("listening on {}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
