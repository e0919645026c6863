use bevy::color::Color;

pub const BINDS_PATH: &str = "keybindings.ron";
pub const WINDOW_TITLE: &str = "Sailfolio";

pub const SKY_COLOR: Color = Color::srgb(0.55, 0.75, 0.92);
pub const OCEAN_COLOR: Color = Color::srgb(0.05, 0.32, 0.52);
pub const HULL_COLOR: Color = Color::srgb(0.45, 0.28, 0.15);
pub const ISLAND_COLOR: Color = Color::srgb(0.78, 0.70, 0.45);
pub const CHEST_COLOR: Color = Color::srgb(0.55, 0.35, 0.12);
pub const BOTTLE_COLOR: Color = Color::srgba(0.3, 0.75, 0.45, 0.8);
pub const SPARKLE_COLOR: Color = Color::srgb(1.0, 0.85, 0.3);
pub const TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

pub const HUD_FONT_SIZE: f32 = 16.0;
pub const PANEL_TITLE_FONT_SIZE: f32 = 22.0;
pub const PANEL_BODY_FONT_SIZE: f32 = 15.0;
