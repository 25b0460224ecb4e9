use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Ceres agricultural climate-risk engine.
#[derive(Parser)]
#[command(
    name = "ceres",
    version,
    about = "Growing seasons, water balance and crop climate hazards"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Detect growing seasons in a daily table.
    Seasons(SeasonsArgs),
    /// Summarise a daily table overall and per detected season.
    Statistics(StatisticsArgs),
    /// Classify one season of a daily table against crop thresholds.
    Hazards(HazardsArgs),
    /// Run a baseline plus multi-model, multi-scenario ensemble.
    Ensemble(EnsembleArgs),
    /// Multi-year normals and trends of a daily table.
    Climatology(ClimatologyArgs),
}

impl Command {
    /// Output options shared by every subcommand.
    pub fn output(&self) -> &OutputArgs {
        match self {
            Self::Seasons(a) => &a.output,
            Self::Statistics(a) => &a.output,
            Self::Hazards(a) => &a.output,
            Self::Ensemble(a) => &a.output,
            Self::Climatology(a) => &a.output,
        }
    }
}

/// Report format on stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Wet-day test selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WetDayTestArg {
    /// Precipitation at least a fraction of ET0.
    Radiative,
    /// Precipitation at least a fixed depth.
    Fixed,
}

#[derive(clap::Args)]
pub struct OutputArgs {
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Season-detection overrides; unset flags fall back to the config file.
#[derive(clap::Args, Default)]
pub struct SeasonArgs {
    /// Consecutive dry days that end a season.
    #[arg(long)]
    pub gap_days: Option<usize>,

    /// Shortest season (days) that is reported.
    #[arg(long)]
    pub min_season_days: Option<i64>,

    /// How a wet day is recognised.
    #[arg(long, value_enum)]
    pub wet_day_test: Option<WetDayTestArg>,

    /// Rainfall (mm) of a wet day under the fixed test.
    #[arg(long)]
    pub wet_threshold: Option<f64>,
}

/// Arguments for the `seasons` subcommand.
#[derive(clap::Args)]
pub struct SeasonsArgs {
    /// Daily table (Parquet or CSV).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub season: SeasonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `statistics` subcommand.
#[derive(clap::Args)]
pub struct StatisticsArgs {
    /// Daily table (Parquet or CSV).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Baseline table to compare the overall statistics against.
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub season: SeasonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `hazards` subcommand.
#[derive(clap::Args)]
pub struct HazardsArgs {
    /// Crop name (case-insensitive).
    pub crop: String,

    /// Daily table (Parquet or CSV).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Location as "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub location: String,

    /// First season day (YYYY-MM-DD); detection is used when omitted.
    #[arg(long, requires = "season_end")]
    pub season_start: Option<String>,

    /// Last season day (YYYY-MM-DD).
    #[arg(long, requires = "season_start")]
    pub season_end: Option<String>,

    /// TOML crop-threshold table replacing the built-in one.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub season: SeasonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `ensemble` subcommand.
#[derive(clap::Args)]
pub struct EnsembleArgs {
    /// Crop name (case-insensitive).
    pub crop: String,

    /// Directory laid out as <scenario>/<model>.parquet (or .csv).
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Location as "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub location: String,

    /// Baseline start (YYYY-MM-DD).
    #[arg(long)]
    pub baseline_start: String,

    /// Baseline end (YYYY-MM-DD).
    #[arg(long)]
    pub baseline_end: String,

    /// Future start (YYYY-MM-DD).
    #[arg(long)]
    pub future_start: String,

    /// Future end (YYYY-MM-DD).
    #[arg(long)]
    pub future_end: String,

    /// Comma-separated scenarios; overrides the config file.
    #[arg(long)]
    pub scenarios: Option<String>,

    /// Comma-separated models; overrides the config file.
    #[arg(long)]
    pub models: Option<String>,

    /// Assess the first detected season in each period instead of the whole period.
    #[arg(long)]
    pub detect_seasons: bool,

    /// TOML crop-threshold table replacing the built-in one.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub season: SeasonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `climatology` subcommand.
#[derive(clap::Args)]
pub struct ClimatologyArgs {
    /// Daily table (Parquet or CSV) spanning the requested years.
    #[arg(short, long)]
    pub input: PathBuf,

    /// First year of the period.
    #[arg(long)]
    pub start_year: i32,

    /// Last year of the period (inclusive).
    #[arg(long)]
    pub end_year: i32,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}
