use crate::{args::Cli, error::CliError, shutdown::ShutdownCoordinator};
use clap::Parser;
use connectors::sql::mysql::source::MySqlRowSource;
use engine_core::sink::StdoutSink;
use engine_processing::poller::Poller;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;
mod error;
mod shutdown;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr; stdout carries row content only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Validate everything before touching the network.
    let settings = cli.poll_settings()?;
    let table = cli.table_ref()?;
    let config = cli.mysql_config();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();
    let cancel = shutdown.cancel_token();

    let source = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Shutdown requested before the connection was established");
            return Ok(());
        }
        source = MySqlRowSource::connect(&config, table) => source?,
    };

    info!(
        table = %source.table().table,
        interval_secs = settings.interval.as_secs(),
        limit = settings.limit,
        skip_exists = settings.skip_exists,
        retry_enabled = settings.retry.is_enabled(),
        max_attempts = settings.retry.max_attempts,
        "Polling for new rows"
    );

    let mut poller = Poller::new(source, StdoutSink::stdout(), settings, cancel);
    let summary = poller.run().await?;

    if shutdown.is_shutdown_requested() {
        info!(
            rows = summary.rows_emitted,
            watermark = summary.watermark,
            "Shut down on signal"
        );
    }

    Ok(())
}
