use clap::Parser;
use contact_intake::config::Config;
use contact_intake::server::{self, assets, logging};
use contact_intake::storage::{MemStorage, Storage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_subscriber();

    tracing::info!("Starting in {:?} mode", config.environment);

    // 1. Storage layer:
    let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

    // 2. HTTP Router (API first, assets take everything else):
    let assets = assets::router(&config.asset_mode())?;
    let app = server::build_router(storage, assets);

    // 3. Start HTTP server:
    server::serve(config.bind_addr(), app).await
}
