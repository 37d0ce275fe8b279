use groupme_calendar_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting GroupMe calendar sync");

    // Load configuration, failing before any network call
    let config = startup::load_config()?;

    startup::start_sync(config).await
}
