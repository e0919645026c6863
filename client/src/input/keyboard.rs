use crate::{constants::BINDS_PATH, input::KeyMap};
use bevy::prelude::*;
use ron::{from_str, ser::PrettyConfig};
use shared::input::{InputState, ShipAction};
use shared::GameFolderPaths;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::Path,
};

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

pub fn is_action_pressed(
    action: ShipAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|key_codes| keyboard_input.any_pressed(key_codes.iter().copied()))
}

pub(crate) fn default_key_map() -> BTreeMap<ShipAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(ShipAction::Forward, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
    map.insert(ShipAction::Backward, vec![KeyCode::KeyS, KeyCode::ArrowDown]);
    map.insert(ShipAction::Left, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
    map.insert(ShipAction::Right, vec![KeyCode::KeyD, KeyCode::ArrowRight]);
    map.insert(ShipAction::Boost, vec![KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    map.insert(ShipAction::Interact, vec![KeyCode::KeyE, KeyCode::Space]);
    map
}

/// Load the key bindings, writing the defaults when no file exists yet.
///
/// A file that fails to parse is left alone so hand edits are not lost.
pub fn get_bindings(game_folder_paths: &GameFolderPaths) -> KeyMap {
    let binds_path = game_folder_paths.assets_folder_path.join(BINDS_PATH);

    match fs::read_to_string(&binds_path) {
        Ok(content) => match from_str::<KeyMap>(&content) {
            Ok(key_map) => return key_map,
            Err(e) => {
                warn!(
                    "Invalid keybindings file {:?}: {}. Using defaults.",
                    binds_path, e
                );
                return KeyMap::default();
            }
        },
        Err(e) => debug!("No keybindings at {:?}: {}", binds_path, e),
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, &binds_path) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

/// Mirror the bound keys into the simulation's input state.
pub fn keyboard_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut input: ResMut<InputState>,
) {
    for action in ShipAction::ALL {
        input.set(action, is_action_pressed(action, &keyboard_input, &key_map));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths(name: &str) -> GameFolderPaths {
        let root = std::env::temp_dir().join(format!("sailfolio-{name}-{}", std::process::id()));
        GameFolderPaths {
            game_folder_path: root.clone(),
            assets_folder_path: root.join("data"),
            content_folder_path: root.join("data/content"),
        }
    }

    #[test]
    fn test_every_action_is_bound() {
        let key_map = KeyMap::default();
        for action in ShipAction::ALL {
            assert!(
                key_map.map.get(&action).is_some_and(|keys| !keys.is_empty()),
                "{action:?} has no default key"
            );
        }
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let paths = temp_paths("binds-missing");
        let key_map = get_bindings(&paths);
        assert_eq!(key_map, KeyMap::default());

        let written = fs::read_to_string(paths.assets_folder_path.join(BINDS_PATH)).unwrap();
        assert_eq!(from_str::<KeyMap>(&written).unwrap(), key_map);

        fs::remove_dir_all(&paths.game_folder_path).unwrap();
    }

    #[test]
    fn test_broken_file_is_kept() {
        let paths = temp_paths("binds-broken");
        fs::create_dir_all(&paths.assets_folder_path).unwrap();
        let binds_path = paths.assets_folder_path.join(BINDS_PATH);
        fs::write(&binds_path, "(map: {").unwrap();

        assert_eq!(get_bindings(&paths), KeyMap::default());
        assert_eq!(fs::read_to_string(&binds_path).unwrap(), "(map: {");

        fs::remove_dir_all(&paths.game_folder_path).unwrap();
    }

    #[test]
    fn test_pressed_keys_feed_input_state() {
        let key_map = KeyMap::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ArrowUp);

        assert!(is_action_pressed(ShipAction::Forward, &keys, &key_map));
        assert!(!is_action_pressed(ShipAction::Boost, &keys, &key_map));
    }
}
