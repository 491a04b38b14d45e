mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local, Utc};
use clap::Parser;
use cli::{AdviseArgs, AnalyzeArgs, Cli, Commands, FetchArgs, OutputArgs};
use config::Config;
use datasources::{coordinates_label, GatewayError, OpenWeatherMapClient, ProviderRequest};
use error::ParaweroError;
use logic::{advise, ScoringEngine};
use models::{Advice, RawForecastPayload, TimeWindow};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Some(Commands::Init) => {
            Config::setup_interactive().context("Setup failed")?;
            Ok(())
        }
        Some(Commands::Check) => run_check(cli.config).await,
        Some(Commands::Analyze(args)) => run_analyze(cli.config, args),
        Some(Commands::Advise(args)) => run_advise(cli.config, args).await,
        Some(Commands::Fetch(args)) => run_fetch(cli.config, args).await,
        None => run_advise(cli.config, AdviseArgs::default()).await,
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn load_or_setup(config_override: Option<std::path::PathBuf>) -> error::Result<Config> {
    if Config::exists(config_override.as_ref()) {
        Config::load(config_override)
    } else {
        Config::setup_interactive().map(|(config, _)| config)
    }
}

async fn run_advise(
    config_override: Option<std::path::PathBuf>,
    args: AdviseArgs,
) -> error::Result<()> {
    let config = load_or_setup(config_override)?;
    let provider = config.provider().cloned().ok_or_else(|| {
        ParaweroError::Config("OpenWeatherMap is not configured. Run `parawero init`.".into())
    })?;
    let client = OpenWeatherMapClient::new(provider.clone());

    let (lat, lon, location) = match (&args.city, args.lat, args.lon) {
        (Some(city), _, _) => {
            let found = client.geocode(city).await?;
            tracing::info!(lat = found.lat, lon = found.lon, "Found {}", found.display_name());
            (found.lat, found.lon, found.display_name())
        }
        (None, Some(lat), Some(lon)) => (lat, lon, client.location_label(lat, lon).await),
        _ => {
            let location = match &config.advisor.location_name {
                Some(name) => name.clone(),
                None => client.location_label(provider.latitude, provider.longitude).await,
            };
            (provider.latitude, provider.longitude, location)
        }
    };

    let payload = client.fetch_forecast(lat, lon).await?;
    let window = args.output.window.unwrap_or(config.advisor.default_window);
    let advice = advise(&payload, window, &location_now(&payload))?;

    print_advice(Some(&location), &advice, &args.output)
}

fn run_analyze(config_override: Option<std::path::PathBuf>, args: AnalyzeArgs) -> error::Result<()> {
    // A saved payload needs no provider, so a missing config is fine here
    let default_window = Config::load_optional(config_override)?
        .map(|c| c.advisor.default_window)
        .unwrap_or_default();

    let content = std::fs::read_to_string(&args.file)?;
    let payload = RawForecastPayload::from_json(&content)?;
    if payload.is_legacy() {
        tracing::warn!("3-hour forecast data: the requested window is not applied");
    }

    let window = args.output.window.unwrap_or(default_window);
    let advice = match &args.now {
        Some(now) => {
            let now = DateTime::parse_from_rfc3339(now).map_err(|e| {
                ParaweroError::InvalidArgument(format!("--now '{}': {}", now, e))
            })?;
            advise(&payload, window, &now)?
        }
        None => advise(&payload, window, &location_now(&payload))?,
    };

    print_advice(None, &advice, &args.output)
}

async fn run_fetch(config_override: Option<std::path::PathBuf>, args: FetchArgs) -> error::Result<()> {
    let params: HashMap<String, String> = args.params.into_iter().collect();

    match forward_params(config_override, &params).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(ParaweroError::Gateway(err)) => {
            println!("{}", err.body());
            Err(ParaweroError::Gateway(err))
        }
        Err(e) => Err(e),
    }
}

async fn forward_params(
    config_override: Option<std::path::PathBuf>,
    params: &HashMap<String, String>,
) -> error::Result<serde_json::Value> {
    let request = ProviderRequest::from_params(params)?;
    let provider = Config::load_optional(config_override)?
        .and_then(|config| config.provider().cloned())
        .ok_or_else(GatewayError::missing_api_key)?;
    OpenWeatherMapClient::new(provider).forward(&request).await
}

/// Current time at the forecast location, or on this machine when unknown
fn location_now(payload: &RawForecastPayload) -> DateTime<FixedOffset> {
    payload
        .local_time(Utc::now())
        .unwrap_or_else(|| Local::now().fixed_offset())
}

async fn run_check(config_override: Option<std::path::PathBuf>) -> error::Result<()> {
    let config = Config::load(config_override)?;
    println!("Configuration: OK");
    println!("Default window: {}", config.advisor.default_window);
    let factors: Vec<&str> = ScoringEngine::new()
        .list_factors()
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    println!("Scoring factors: {}", factors.join(", "));

    match config.provider() {
        Some(provider) => {
            let client = OpenWeatherMapClient::new(provider.clone());
            println!(
                "Location: {}",
                coordinates_label(provider.latitude, provider.longitude)
            );
            match client.test_connection().await {
                Ok(true) => println!("OpenWeatherMap: OK"),
                Ok(false) => println!("OpenWeatherMap: REJECTED (check the API key)"),
                Err(e) => println!("OpenWeatherMap: OFFLINE ({})", e),
            }
        }
        None => println!("OpenWeatherMap: NOT CONFIGURED"),
    }

    Ok(())
}

fn print_advice(
    location: Option<&str>,
    advice: &Advice,
    output: &OutputArgs,
) -> error::Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(advice)?);
        return Ok(());
    }

    let signals = &advice.signals;
    let level = advice.result.level;

    if let Some(location) = location {
        println!("{}", location);
    }
    println!("{}", advice.date_line());
    println!();
    println!(
        "{} {}  (score {}/100, {})",
        level.icon(),
        level.label(),
        advice.result.score,
        level.color()
    );
    println!("{} {}", signals.dominant_condition.symbol(), advice.description);
    println!();
    println!(
        "  Umbrella          {}",
        if advice.result.needs_umbrella() { "yes" } else { "no" }
    );
    println!("  Rain probability  {:.0}%", signals.max_rain_probability);
    println!("  Precipitation     {:.1} mm", signals.total_precipitation_mm);
    println!("  Temperature       {:.0}°C", signals.mean_temperature_c);
    if let Some(wind) = signals.peak_wind {
        println!("  Wind              {:.1} m/s", wind);
    }
    println!(
        "  Rain hours        {}/{} (longest run {})",
        signals.rain_hours, signals.total_hours, signals.longest_rain_run
    );
    println!("  Source            {}", advice.source.as_str());

    if advice.window != TimeWindow::Today && advice.date_offset > 0 {
        println!();
        println!("The {} is over for today, showing tomorrow.", advice.window);
    }

    tracing::debug!("Factor breakdown:");
    for factor in ScoringEngine::new().breakdown(signals) {
        tracing::debug!(
            "  {:<18} {:>5.1} x {:.2} = {:>5.1}",
            factor.name,
            factor.sub_score,
            factor.weight,
            factor.weighted()
        );
    }

    Ok(())
}
