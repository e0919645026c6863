mod camera;
mod constants;
mod input;
mod ui;
mod world;

use bevy::{asset::UnapprovedPathMode, prelude::*, window::PresentMode};
use clap::Parser;
use constants::{SKY_COLOR, WINDOW_TITLE};
use input::keyboard::{get_bindings, keyboard_input_system};
use shared::config::{load_default_sim_config, load_sim_config};
use shared::content::ContentCatalog;
use shared::input::InputState;
use shared::sets::FrameSet;
use shared::{get_game_folder_paths, WorldLoop, CONFIG_LOAD_ERROR, WORLD_BUILD_ERROR};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    game_folder_path: Option<String>,

    #[arg(
        short,
        long,
        help = "Allows overriding of the asset folder path, defaults to <game_folder_path>/data"
    )]
    assets_folder_path: Option<String>,

    #[arg(short, long, help = "Simulation config, defaults to <game_folder_path>/sim.ron")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Fixed seed for prop placement")]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();

    let game_folder_paths = get_game_folder_paths(args.game_folder_path, args.assets_folder_path);

    println!(
        "Starting application with game folder: {}",
        game_folder_paths.game_folder_path.display()
    );

    let loaded = match &args.config {
        Some(path) => load_sim_config(path),
        None => load_default_sim_config(&game_folder_paths),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{CONFIG_LOAD_ERROR}: {e}");
            std::process::exit(1);
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let catalog = match ContentCatalog::load(&game_folder_paths.catalog_path()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load content catalog, continuing without content: {e}");
            ContentCatalog::default()
        }
    };

    let world = match WorldLoop::new(&config, catalog) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("{WORLD_BUILD_ERROR}: {e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(AssetPlugin {
                file_path: game_folder_paths.assets_folder_path.display().to_string(),
                unapproved_path_mode: UnapprovedPathMode::Allow,
                ..Default::default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: WINDOW_TITLE.to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
    );

    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Simulation,
            FrameSet::Presentation,
            FrameSet::Ui,
        )
            .chain(),
    );

    app.insert_resource(get_bindings(&game_folder_paths))
        .insert_resource(game_folder_paths)
        .insert_resource(world)
        .insert_resource(ClearColor(SKY_COLOR))
        .insert_resource(AmbientLight {
            brightness: 400.0,
            ..default()
        })
        .init_resource::<InputState>()
        .add_plugins((world::WorldPlugin, ui::UiPlugin))
        .add_systems(Startup, camera::spawn_camera_system)
        .add_systems(Update, keyboard_input_system.in_set(FrameSet::Input))
        .add_systems(
            Update,
            camera::follow_camera_system.in_set(FrameSet::Presentation),
        )
        .run();
}
