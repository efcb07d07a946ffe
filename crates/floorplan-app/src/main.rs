//! Main application entry point.

use clap::Parser;
use floorplan_app::{AppConfig, AppResult, ExportSelection, Session, load_script};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Replay a floorplan editing session and export it")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "FLOORPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON session script to replay.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output directory, overriding the config file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the PNG export.
    #[arg(long)]
    png: bool,

    /// Write the JSON export.
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> AppResult<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(out) = cli.out {
        config.output_dir = out;
    }

    let mut session = Session::new(config)?;
    if let Some(path) = &cli.script {
        let steps = load_script(path)?;
        session.replay(&steps);
    }

    // Neither flag means both exports
    let selection = if cli.png || cli.json {
        ExportSelection {
            png: cli.png,
            json: cli.json,
        }
    } else {
        ExportSelection::default()
    };
    session.export(selection)?;
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting floorplan");

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
