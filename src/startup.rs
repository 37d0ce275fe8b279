use crate::components::sync::run_sync;
use crate::config::Config;
use crate::error::other_error;
use crate::shutdown::wait_for_signal;
use tokio::time::{sleep, Duration};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the configuration before any network call
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run a single sync pass, or keep syncing on the configured interval
pub async fn start_sync(config: Config) -> miette::Result<()> {
    let Some(interval_secs) = config.sync_interval_secs else {
        run_sync(&config).await?;
        return Ok(());
    };

    info!("Syncing every {} seconds", interval_secs);
    let interval = Duration::from_secs(interval_secs);
    let shutdown = wait_for_signal();
    tokio::pin!(shutdown);

    loop {
        // Each run completes before the next one is scheduled
        if let Err(e) = run_sync(&config).await {
            error!("Error syncing GroupMe calendar: {}", e);
        }

        tokio::select! {
            _ = sleep(interval) => {}
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signals: {}", e);
                }
                info!("Received shutdown signal, stopping sync loop");
                return Ok(());
            }
        }
    }
}
