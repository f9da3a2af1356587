use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use galaxy_scene::config::SceneConfig;
use galaxy_scene::galaxy::GalaxyParameters;
use galaxy_scene::quality::DeviceTier;
use galaxy_scene::viewer::{self, ViewerOptions};

/// Galaxy landing scene viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Scene configuration file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quality tier: mobile, tablet or desktop
    #[arg(short, long)]
    tier: Option<DeviceTier>,

    /// Initial galaxy preset: spiral or disk
    #[arg(short, long)]
    preset: Option<String>,

    /// Seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Start on the main scene without the intro
    #[arg(long)]
    skip_intro: bool,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    dump_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(cli: &Cli) -> Result<SceneConfig, String> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path).map_err(|e| e.to_string())?,
        None => SceneConfig::default(),
    };
    if let Some(tier) = cli.tier {
        config.tier = tier;
    }
    if let Some(name) = &cli.preset {
        config.galaxy = GalaxyParameters::preset(name).ok_or_else(|| format!("unknown preset `{name}`"))?;
    }
    if cli.skip_intro {
        config.skip_intro = true;
    }
    config.apply_quality();
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_config {
        return match config.to_ron_string() {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("failed to serialize config: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let options = ViewerOptions {
        seed: cli.seed,
        ..Default::default()
    };
    match viewer::run(config, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
