use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use volley_core::PlannerSettings;

mod scenario;

use scenario::{RunOptions, Scenario};

#[derive(Debug, Parser)]
#[command(name = "volley-cli", about = "Run the strike planner on a scripted scenario")]
pub(crate) struct Args {
    /// Scenario file (JSON)
    #[clap(long, short)]
    scenario: PathBuf,

    /// Planner settings file (JSON). Missing fields keep their defaults.
    #[clap(long)]
    settings: Option<PathBuf>,

    #[clap(long, default_value = "600")]
    frames: u32,

    #[clap(long, default_value = "info")]
    log_level: String,

    /// Kick the ball by up to this speed a third of the way into the run.
    #[clap(long, default_value = "0.0")]
    jitter: f64,

    #[clap(long)]
    seed: Option<u64>,

    /// Write one JSON line per frame with the directive and debug shapes.
    #[clap(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .format_timestamp(None)
        .init();

    let settings = match &args.settings {
        Some(path) => PlannerSettings::load(path)?,
        None => PlannerSettings::default(),
    };
    let scenario = Scenario::load(&args.scenario)?;
    let options = RunOptions {
        frames: args.frames,
        jitter: args.jitter,
        seed: args.seed,
    };

    match scenario::run(&scenario, &settings, &options, args.record.as_deref())? {
        Some(result) => log::info!("Result: {result:?}"),
        None => log::info!("Result: unfinished"),
    }
    Ok(())
}
