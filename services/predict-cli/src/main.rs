//! Command line front end for the wind power prediction service.
//!
//! Builds an input record from defaults, an optional YAML/JSON file and
//! per-field overrides, runs one prediction cycle and prints the outcome.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use prediction_client::config::DEFAULT_BASE_URL;
use prediction_client::{ClientConfig, Dispatcher, PredictionState};
use report::PredictionReport;
use wind_common::{update_field, FieldName, InputRecord};

#[derive(Parser, Debug)]
#[command(name = "wind-predict")]
#[command(about = "Wind power production forecasting client", long_about = None)]
struct Cli {
    /// Prediction service base URL
    #[arg(long, global = true, env = "WIND_API_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Request timeout in seconds (waits indefinitely when unset)
    #[arg(long, global = true, env = "WIND_API_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Connection timeout in seconds
    #[arg(long, global = true, env = "WIND_API_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Request a wind power prediction
    Predict(PredictArgs),

    /// Check that the prediction service is up
    Health,

    /// Show speed and direction of a wind vector
    Direction {
        /// Zonal component (m/s)
        #[arg(short, long, allow_negative_numbers = true)]
        u: f64,

        /// Meridional component (m/s)
        #[arg(short, long, allow_negative_numbers = true)]
        v: f64,
    },
}

/// Field values are taken as raw text; anything that is not a number becomes 0.
#[derive(Args, Debug)]
struct PredictArgs {
    /// YAML or JSON file with input fields (missing fields use defaults)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Zonal wind velocity at 10m (m/s)
    #[arg(long, allow_hyphen_values = true)]
    u10: Option<String>,

    /// Meridional wind velocity at 10m (m/s)
    #[arg(long, allow_hyphen_values = true)]
    v10: Option<String>,

    /// Zonal wind velocity at 100m (m/s)
    #[arg(long, allow_hyphen_values = true)]
    u100: Option<String>,

    /// Meridional wind velocity at 100m (m/s)
    #[arg(long, allow_hyphen_values = true)]
    v100: Option<String>,

    /// Hour (0-23)
    #[arg(long, allow_hyphen_values = true)]
    hour: Option<String>,

    /// Day (1-31)
    #[arg(long, allow_hyphen_values = true)]
    day: Option<String>,

    /// Month (1-12)
    #[arg(long, allow_hyphen_values = true)]
    month: Option<String>,

    /// Year (2020-2024)
    #[arg(long, allow_hyphen_values = true)]
    year: Option<String>,

    /// Refuse to send inputs outside the accepted ranges
    #[arg(long)]
    strict: bool,

    /// Output format: table (default), json
    #[arg(short, long, default_value = "table")]
    output: String,
}

impl PredictArgs {
    fn overrides(&self) -> Vec<(FieldName, &str)> {
        [
            (FieldName::U10, &self.u10),
            (FieldName::V10, &self.v10),
            (FieldName::U100, &self.u100),
            (FieldName::V100, &self.v100),
            (FieldName::Hour, &self.hour),
            (FieldName::Day, &self.day),
            (FieldName::Month, &self.month),
            (FieldName::Year, &self.year),
        ]
        .into_iter()
        .filter_map(|(name, raw)| raw.as_deref().map(|raw| (name, raw)))
        .collect()
    }

    fn build_input(&self) -> Result<InputRecord> {
        let base = match &self.input {
            Some(path) => InputRecord::from_file(path)?,
            None => InputRecord::default(),
        };

        Ok(self
            .overrides()
            .into_iter()
            .fold(base, |record, (name, raw)| update_field(&record, name, raw)))
    }
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::new(self.url.clone());
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.connect_timeout_secs {
            config = config.with_connect_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    let config = cli.client_config()?;

    match &cli.command {
        Commands::Predict(args) => run_predict(config, args).await,
        Commands::Health => run_health(config).await.map(|()| ExitCode::SUCCESS),
        Commands::Direction { u, v } => {
            println!("{}", PredictionReport::format_wind(*u, *v));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs one prediction cycle. A failed request is reported in the printed
/// outcome and turned into a non-zero exit code rather than an error.
async fn run_predict(config: ClientConfig, args: &PredictArgs) -> Result<ExitCode> {
    let input = args.build_input()?;

    if let Err(e) = input.validate() {
        if args.strict {
            bail!(e);
        }
        warn!(error = %e, "Input is outside the ranges the service accepts");
    }

    info!(url = %config.predict_url(), ?input, "Requesting prediction");
    let dispatcher = Dispatcher::from_config(config)?;
    let state = Mutex::new(PredictionState::new());
    dispatcher.predict(&state, input).await;
    let state = state.into_inner().unwrap_or_else(PoisonError::into_inner);

    println!("{}", render_outcome(&args.output, &input, &state)?);

    Ok(match state.error() {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    })
}

fn render_outcome(output: &str, input: &InputRecord, state: &PredictionState) -> Result<String> {
    match output {
        "json" => PredictionReport::format_json(state),
        _ => Ok(PredictionReport::format_table(input, state)),
    }
}

async fn run_health(config: ClientConfig) -> Result<()> {
    let base_url = config.base_url.clone();
    let dispatcher = Dispatcher::from_config(config)?;

    let health = dispatcher.health().await?;
    println!("{}", PredictionReport::format_health(&base_url, &health));

    if !health.is_healthy() {
        bail!("Service at {} is not healthy ({})", base_url, health.status);
    }
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_overrides_are_coerced() {
        let cli = Cli::parse_from([
            "wind-predict",
            "predict",
            "--u10",
            "-4.5",
            "--v10",
            "abc",
            "--hour",
            "7.8",
        ]);
        let Commands::Predict(args) = &cli.command else {
            panic!("expected predict command");
        };

        let input = args.build_input().unwrap();
        assert_eq!(input.u10, -4.5);
        assert_eq!(input.v10, 0.0);
        assert_eq!(input.hour, 7);
        assert_eq!(input.u100, InputRecord::default().u100);
    }

    #[test]
    fn test_global_options_build_config() {
        let cli = Cli::parse_from([
            "wind-predict",
            "health",
            "--url",
            "http://wind.local:8000/",
            "--timeout-secs",
            "3",
        ]);

        let config = cli.client_config().unwrap();
        assert_eq!(config.predict_url(), "http://wind.local:8000/predict");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_failed_outcome_shows_error_once() {
        let mut state = PredictionState::new();
        state.start();
        state.fail("bad input");
        let input = InputRecord::default();

        for output in ["table", "json"] {
            let rendered = render_outcome(output, &input, &state).unwrap();
            assert_eq!(rendered.matches("bad input").count(), 1, "{output}");
        }
    }

    #[test]
    fn test_direction_accepts_negative_components() {
        let cli = Cli::parse_from(["wind-predict", "direction", "-u", "-1", "-v", "0"]);
        assert!(matches!(cli.command, Commands::Direction { u, v } if u == -1.0 && v == 0.0));
    }
}
