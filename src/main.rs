use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use worldloom::cli::commands;
use worldloom::config::generation::GenerationParams;
use worldloom::config::simulation::SimulationConfig;

#[derive(Parser)]
#[command(name = "worldloom")]
#[command(about = "A deterministic tile-based agent simulation engine")]
#[command(version)]
struct Cli {
    /// Path to the simulation configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world from procedural parameters
    Generate {
        /// Path to world generation config file
        #[arg(short, long, default_value = "worldgen.toml")]
        worldgen: String,

        /// Name to give the generated world
        #[arg(short, long, default_value = "world")]
        name: String,
    },

    /// Run the simulation tick loop
    Run {
        /// Path to a specific world snapshot to load
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Inspect world or tile state from the latest snapshot
    Inspect {
        /// Tile world coordinates as "x,y"
        #[arg(short, long)]
        tile: Option<String>,

        /// Show world-level summary
        #[arg(long)]
        world: bool,
    },

    /// List known snapshots
    Snapshots,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_sim_config(path: &str) -> SimulationConfig {
    match SimulationConfig::from_file(Path::new(path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_tile_arg(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got '{raw}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x in '{raw}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y in '{raw}'"))?;
    Ok((x, y))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let sim_config = load_sim_config(&cli.config);
    init_logging(&sim_config.log_level);

    match cli.command {
        Commands::Generate { worldgen, name } => {
            let params = match GenerationParams::from_file(Path::new(&worldgen)) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading generation config: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = commands::generate(&params, &sim_config, &name) {
                eprintln!("Error generating world: {e}");
                std::process::exit(1);
            }
        }

        Commands::Run { world } => {
            if let Err(e) = commands::run_simulation(&sim_config, world.as_deref()).await {
                eprintln!("Simulation error: {e}");
                std::process::exit(1);
            }
        }

        Commands::Inspect { tile, world } => {
            let parsed_tile = match tile.as_deref().map(parse_tile_arg) {
                Some(Ok(coords)) => Some(coords),
                Some(Err(e)) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
                None => None,
            };
            if let Err(e) = commands::inspect(&sim_config, parsed_tile, world) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }

        Commands::Snapshots => {
            if let Err(e) = commands::snapshots(&sim_config) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
