use crate::models::TimeWindow;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parawero", version, about = "Do I need an umbrella today?")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the provider connection
    Check,
    /// Fetch the live forecast and give umbrella advice (default)
    Advise(AdviseArgs),
    /// Give umbrella advice for a saved forecast payload
    Analyze(AnalyzeArgs),
    /// Forward a raw provider query and print the JSON it returns
    Fetch(FetchArgs),
}

#[derive(Args, Default)]
pub struct AdviseArgs {
    /// City to look up instead of the configured coordinates
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Forecast payload as returned by the provider (JSON)
    pub file: PathBuf,

    /// Current instant (RFC 3339), defaults to now in local time
    #[arg(long)]
    pub now: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Default)]
pub struct OutputArgs {
    /// morning, afternoon, evening or today; defaults to the configured window
    #[arg(short, long)]
    pub window: Option<TimeWindow>,

    /// Print the advice as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Query parameters, e.g. `endpoint=weather lat=40.42 lon=-3.70` or `endpoint=geo-direct q=Bilbao`
    #[arg(value_parser = parse_param, required = true)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}
