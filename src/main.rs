use anyhow::Result;
use spotdash::config::Config;
use spotdash::service::PriceService;
use spotdash::store::{JsonFileStore, MemoryStore, PriceStore};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

    spotdash::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Spotdash {} starting up", env!("APP_VERSION"));

    let store: Box<dyn PriceStore> = if config.cache.file.is_empty() {
        info!("No cache file configured, using in-memory store");
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&config.cache.file))
    };

    let host = config.web.host.clone();
    let port = config.web.port;
    let service = Arc::new(
        PriceService::new(config, store)
            .map_err(|e| anyhow::anyhow!("Failed to create service: {}", e))?,
    );

    // Spawn web server
    let web_service = service.clone();
    let web_task = tokio::spawn(async move {
        if let Err(e) = spotdash::web::serve(web_service, &host, port).await {
            error!("Web server error: {}", e);
        }
    });

    // Run the background staleness loop in the current task
    match service.run().await {
        Ok(()) => {
            info!("Shutdown complete");
            web_task.abort();
            Ok(())
        }
        Err(e) => {
            error!("Background loop failed: {}", e);
            web_task.abort();
            Err(anyhow::anyhow!("Service error: {}", e))
        }
    }
}
