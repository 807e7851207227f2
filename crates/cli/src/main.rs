use anyhow::Result;
use billiards::apex::{biradial_distance, polar_distance, Apex, Metric};
use billiards::search::SearchOptions;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod commands;
mod export;
mod interrupt;
mod provenance;
mod report;

#[derive(Parser)]
#[command(name = "billiards")]
#[command(about = "Periodic billiard cycles over sampled triangle apexes")]
struct Cmd {
    /// Root of the point-set store
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Manage point sets and their known cycles
    #[command(subcommand)]
    Pointset(PointsetCmd),
}

#[derive(Subcommand)]
pub enum PointsetCmd {
    /// Sample a new random point set
    Create {
        name: String,
        #[arg(long)]
        count: usize,
        /// Points are snapped to multiples of 2^-grid_density
        #[arg(long, default_value_t = 32)]
        grid_density: u32,
        /// RNG seed; defaults to the current time and is logged
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stored point sets
    List,
    /// Print the coordinates of every point as `x,y`
    Print { name: String },
    /// Summarize the known cycles, or describe one point
    Info {
        name: String,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Delete a point set and its cycles
    Delete { name: String },
    /// Search every point (or one) for shorter cycles
    Search(SearchArgs),
    /// Copy cycles from nearby points of another set
    CopyCycles {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Nearest source points tried per target
        #[arg(long, default_value_t = 1)]
        neighbors: usize,
        /// Distance used to rank source points
        #[arg(long, value_enum, default_value_t = DistanceArg::Polar)]
        distance: DistanceArg,
        /// Worker threads (0 = one per CPU)
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
    /// Re-check the known cycle of one point
    Validate {
        name: String,
        #[arg(long)]
        index: usize,
    },
    /// Describe the points closest to given coordinates
    Probe {
        name: String,
        /// Target as `x,y` in the chosen coordinate system
        #[arg(long, value_parser = parse_coords)]
        coords: (f64, f64),
        #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
        metric: MetricArg,
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Write points and cycles as CSV or Parquet (by extension)
    Export {
        name: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    pub name: String,
    /// Only search this point
    #[arg(long)]
    pub index: Option<usize>,
    #[arg(long, default_value_t = SearchOptions::default().attempt_count)]
    pub attempt_count: usize,
    #[arg(long, default_value_t = SearchOptions::default().max_path_length)]
    pub max_path_length: usize,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub stop_after_success: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub skip_known_points: bool,
    /// Largest turn degree drawn by the random-walk search
    #[arg(long, default_value_t = 3)]
    pub max_degree: i64,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

impl SearchArgs {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            attempt_count: self.attempt_count,
            max_path_length: self.max_path_length,
            stop_after_success: self.stop_after_success,
            skip_known_points: self.skip_known_points,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MetricArg {
    Euclidean,
    Polar,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Polar => Metric::Polar,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DistanceArg {
    Polar,
    Biradial,
}

impl DistanceArg {
    pub fn function(self) -> fn(&Apex, &Apex) -> f64 {
        match self {
            DistanceArg::Polar => polar_distance,
            DistanceArg::Biradial => biradial_distance,
        }
    }
}

fn parse_coords(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let num = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{v}`: {e}"))
    };
    Ok((num(x)?, num(y)?))
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Pointset(sub) => commands::run(&cmd.data_dir, sub),
    }
}
