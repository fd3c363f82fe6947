use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use order_sync::config::Settings;
use order_sync::provider::{ProviderApi, ProviderClient};
use order_sync::sync::{
    sync_queue, ConfigurationValidator, FetchProcessor, LoggingOrderProcessor, SyncOrchestrator,
    SyncWorkers,
};
use order_sync::Marketplace;

#[derive(Debug, Parser)]
#[command(name = "marketplace-order-sync", about = "Fetch and process recent orders for one marketplace")]
struct Cli {
    /// ALLEGRO, AMAZON or PERSONAL (case-insensitive)
    marketplace: Marketplace,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let s = Settings::from_env()?;

    let sources = Arc::new(s.source_mapping());
    let provider: Arc<dyn ProviderApi> = Arc::new(ProviderClient::new(
        s.provider_api_url.clone(),
        s.provider_api_key.clone(),
        Duration::from_secs(s.http_timeout_sec),
    )?);

    let processor = FetchProcessor::new(
        provider.clone(),
        sources.clone(),
        Arc::new(LoggingOrderProcessor::new()),
    )
    .with_max_pages(s.max_pages);

    let (queue, receiver) = sync_queue(s.sync_queue_capacity);
    let workers = SyncWorkers::spawn(s.sync_workers, receiver, processor);

    let orchestrator = SyncOrchestrator::new(
        ConfigurationValidator::new(sources, provider),
        Arc::new(queue),
    );
    let dispatched = orchestrator.validate_and_dispatch(cli.marketplace).await;

    // dropping the last queue handle lets the workers drain and stop
    drop(orchestrator);
    let stats = workers.join().await;

    match dispatched {
        Ok(()) => {
            println!("Successfully dispatched sync for {}", cli.marketplace);
            if stats.failed > 0 {
                tracing::error!(failed = stats.failed, "sync finished with failed tasks");
                return Ok(ExitCode::FAILURE);
            }
            tracing::info!(succeeded = stats.succeeded, "sync finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_not_configured() => {
            tracing::warn!(
                marketplace = %cli.marketplace,
                reason = %e,
                "marketplace configuration validation failed"
            );
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
