use clan_lookup::api;
use clan_lookup::client::ClanApi;
use clan_lookup::config::{Config, MetricsConfig};
use clap::Parser;
use metrics_exporter_statsd::StatsdBuilder;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "HTTP service translating between clan ids and clan tags")]
struct Cli {
    /// Path to a YAML config file. Without one, defaults apply and the
    /// upstream credential must come from the API_KEY environment variable.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(error = %err, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let _sentry_guard = config.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.clone(),
            sentry::ClientOptions::default(),
        ))
    });

    if let Some(metrics_config) = &config.metrics {
        if let Err(err) = install_statsd_recorder(metrics_config) {
            tracing::warn!(error = %err, "failed to install statsd recorder");
        }
    }

    let credential = match config.credential() {
        Ok(credential) => credential,
        Err(err) => {
            tracing::error!(error = %err, "failed to resolve upstream credential");
            return ExitCode::FAILURE;
        }
    };

    let clan_api = match ClanApi::new(&config.upstream.base_url, credential) {
        Ok(clan_api) => clan_api,
        Err(err) => {
            tracing::error!(error = %err, base_url = %config.upstream.base_url, "invalid upstream base URL");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = api::serve(config.listener, clan_api).await {
        tracing::error!(error = %err, "server exited with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn install_statsd_recorder(config: &MetricsConfig) -> Result<(), String> {
    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some("clan_lookup"))
        .map_err(|err| err.to_string())?;
    metrics::set_global_recorder(recorder).map_err(|err| err.to_string())?;
    Ok(())
}
