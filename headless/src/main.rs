use clap::Parser;
use headless::autopilot::{Autopilot, AutopilotConfig};
use headless::init::{audit_assets, init, RunSettings};
use shared::config::{load_default_sim_config, load_sim_config};
use shared::content::ContentCatalog;
use shared::constants::{CONFIG_LOAD_ERROR, DEFAULT_TICKS_PER_SECOND, WORLD_BUILD_ERROR};
use shared::{get_game_folder_paths, WorldLoop};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    game_folder_path: Option<String>,

    #[arg(short, long)]
    assets_folder_path: Option<String>,

    #[arg(short, long, help = "Simulation config, defaults to <game_folder_path>/sim.ron")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    tick_rate: u64,

    #[arg(short = 'n', long, help = "Stop after this many ticks")]
    ticks: Option<u64>,

    #[arg(short, long, help = "Autopilot route (RON list of waypoints)")]
    route: Option<PathBuf>,

    #[arg(long, help = "Only check that the optional assets resolve, then exit")]
    check_assets: bool,
}

fn main() {
    let args = Args::parse();

    if args.tick_rate < 1 || args.tick_rate > 1000 {
        eprintln!("Error: tick_rate must be between 1 and 1000 (inclusive).");
        eprintln!("Got: {}", args.tick_rate);
        std::process::exit(1);
    }

    let game_folder_paths = get_game_folder_paths(args.game_folder_path, args.assets_folder_path);

    if args.check_assets {
        let complete = audit_assets(&game_folder_paths);
        std::process::exit(if complete { 0 } else { 1 });
    }

    let loaded = match &args.config {
        Some(path) => load_sim_config(path),
        None => load_default_sim_config(&game_folder_paths),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", CONFIG_LOAD_ERROR);
            std::process::exit(1);
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let route = match args.route.as_deref().map(AutopilotConfig::load) {
        None => AutopilotConfig::default(),
        Some(Ok(route)) => route,
        Some(Err(err)) => {
            eprintln!("Failed to load route: {err}");
            std::process::exit(1);
        }
    };

    let catalog = match ContentCatalog::load(&game_folder_paths.catalog_path()) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load content catalog, continuing without content: {err}");
            ContentCatalog::default()
        }
    };

    let world = match WorldLoop::new(&config, catalog) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("{}: {err}", WORLD_BUILD_ERROR);
            std::process::exit(1);
        }
    };

    init(
        world,
        Autopilot::new(route),
        RunSettings {
            ticks_per_second: args.tick_rate,
            tick_limit: args.ticks,
        },
        game_folder_paths,
    );
}
