pub const GAME_NAME: &str = "sailfolio";
pub const SIM_CONFIG_PATH: &str = "sim.ron";
pub const CONTENT_CATALOG_PATH: &str = "content/catalog.ron";
pub const DEFAULT_WORLD_RADIUS: f32 = 600.0;
pub const DEFAULT_TICKS_PER_SECOND: u64 = 60;
/// Longest frame the world loop will simulate in one go (seconds)
pub const MAX_FRAME_DELTA: f32 = 0.1;
pub const CONFIG_LOAD_ERROR: &str = "Failed to load simulation config";
pub const WORLD_BUILD_ERROR: &str = "Failed to build the world";
/// Asset stems resolved through `assets::resolve_with_fallback`, relative to the assets folder
pub const SHIP_MODEL_STEM: &str = "models/ship";
pub const AMBIENT_AUDIO_STEM: &str = "audio/ocean";
