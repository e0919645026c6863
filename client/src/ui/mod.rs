pub mod hud;
pub mod panel;

use bevy::prelude::*;
use shared::sets::FrameSet;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (hud::setup_hud, panel::setup_panel))
            .add_systems(
                Update,
                (
                    hud::hud_text_update_system,
                    panel::interaction_panel_system,
                )
                    .in_set(FrameSet::Ui),
            );
    }
}
