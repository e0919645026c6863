use std::path::PathBuf;

use bevy_ecs::resource::Resource;

pub mod assets;
pub mod camera;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod input;
pub mod interaction;
pub mod physics;
pub mod pool;
pub mod props;
pub mod sets;
pub mod vessel;
pub mod water;
pub mod world;

pub use constants::*;
pub use error::{AssetError, ConfigError, PoolError, WaveError};
pub use world::{FrameStats, SimContext, WorldLoop};

#[derive(Resource, Debug, Clone)]
pub struct GameFolderPaths {
    pub game_folder_path: PathBuf,
    pub assets_folder_path: PathBuf,
    pub content_folder_path: PathBuf,
}

impl GameFolderPaths {
    pub fn sim_config_path(&self) -> PathBuf {
        self.game_folder_path.join(SIM_CONFIG_PATH)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.assets_folder_path.join(CONTENT_CATALOG_PATH)
    }
}

pub fn get_game_folder_paths(
    game_folder_path: Option<String>,
    assets_folder_path: Option<String>,
) -> GameFolderPaths {
    let mut paths = default_game_folder_paths();

    if let Some(game_data) = game_folder_path {
        paths.game_folder_path = game_data.into();
    }
    if let Some(game_assets) = assets_folder_path {
        paths.content_folder_path = PathBuf::from(&game_assets).join("content");
        paths.assets_folder_path = game_assets.into();
    }

    paths
}

#[cfg(target_os = "windows")]
pub fn default_game_folder_paths() -> GameFolderPaths {
    GameFolderPaths {
        game_folder_path: "%AppData/sailfolio".into(),
        assets_folder_path: "%AppData/sailfolio/data".into(),
        content_folder_path: "%AppData/sailfolio/data/content".into(),
    }
}

#[cfg(target_os = "linux")]
pub fn default_game_folder_paths() -> GameFolderPaths {
    GameFolderPaths {
        game_folder_path: "$HOME/.local/share/sailfolio".into(),
        assets_folder_path: "$HOME/.config/sailfolio".into(),
        content_folder_path: "$HOME/.config/sailfolio/content".into(),
    }
}

#[cfg(target_os = "macos")]
pub fn default_game_folder_paths() -> GameFolderPaths {
    GameFolderPaths {
        game_folder_path: "$HOME/Library/Application Support/sailfolio".into(),
        assets_folder_path: "$HOME/Library/Application Support/sailfolio/data".into(),
        content_folder_path: "$HOME/Library/Application Support/sailfolio/data/content".into(),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub fn default_game_folder_paths() -> GameFolderPaths {
    GameFolderPaths {
        game_folder_path: "sailfolio".into(),
        assets_folder_path: "sailfolio/data".into(),
        content_folder_path: "sailfolio/data/content".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_defaults() {
        let paths = get_game_folder_paths(Some("/tmp/game".into()), Some("/tmp/assets".into()));
        assert_eq!(paths.game_folder_path, PathBuf::from("/tmp/game"));
        assert_eq!(paths.assets_folder_path, PathBuf::from("/tmp/assets"));
        assert_eq!(paths.content_folder_path, PathBuf::from("/tmp/assets/content"));
        assert_eq!(paths.sim_config_path(), PathBuf::from("/tmp/game/sim.ron"));
    }
}
