use std::process::ExitCode;

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use airq::app::{AppError, Lookup, nearest_readings};
use airq::cityair::{CityAirClient, MockCityAirClient};
use airq::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "airq=info".into()))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(lookup) => {
            print!("{}", lookup.report());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<Lookup, AppError> {
    let config = Config::from_env()?;
    info!(reference = %config.reference, metric = ?config.metric, "looking up nearest station");

    let now = Utc::now();
    match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using fixture data");
            let source = MockCityAirClient::new(dir)?;
            nearest_readings(&source, &config.reference, config.metric, now).await
        }
        None => {
            let source = CityAirClient::new(config.api.clone())?;
            nearest_readings(&source, &config.reference, config.metric, now).await
        }
    }
}
