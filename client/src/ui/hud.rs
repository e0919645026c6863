use bevy::prelude::*;
use shared::WorldLoop;

use crate::constants::{HUD_FONT_SIZE, TEXT_COLOR};
use crate::world::LastFrameStats;

#[derive(Component)]
pub struct SpeedText;

#[derive(Component)]
pub struct StaminaText;

#[derive(Component)]
pub struct PromptText;

fn hud_line(commands: &mut Commands, label: &str, marker: impl Component) -> Entity {
    commands
        .spawn((
            Text::new(label),
            TextFont::from_font_size(HUD_FONT_SIZE),
            TextColor(TEXT_COLOR),
        ))
        .with_child((
            marker,
            TextSpan::new("-"),
            TextFont::from_font_size(HUD_FONT_SIZE),
            TextColor(TEXT_COLOR),
        ))
        .id()
}

pub fn setup_hud(mut commands: Commands) {
    let root = commands
        .spawn((
            BackgroundColor(Color::BLACK.with_alpha(0.4)),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(1.),
                bottom: Val::Percent(2.),
                padding: UiRect::all(Val::Px(6.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            },
        ))
        .id();

    let speed = hud_line(&mut commands, "Speed: ", SpeedText);
    let stamina = hud_line(&mut commands, "Boost: ", StaminaText);
    let prompt = hud_line(&mut commands, "", PromptText);
    commands.entity(root).add_children(&[speed, stamina, prompt]);
}

/// Draw `ratio` in [0, 1] as a fixed-width bar.
fn bar(ratio: f32, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn hud_text_update_system(
    world: Res<WorldLoop>,
    stats: Res<LastFrameStats>,
    speed_query: Query<Entity, With<SpeedText>>,
    stamina_query: Query<Entity, With<StaminaText>>,
    prompt_query: Query<Entity, With<PromptText>>,
    mut writer: TextUiWriter,
) {
    let telemetry = world.telemetry();

    for entity in speed_query.iter() {
        *writer.text(entity, 0) = format!(
            "{:.1} m/s {} ({} substeps)",
            telemetry.speed,
            bar(telemetry.speed_ratio, 20),
            stats.0.substeps
        );
    }
    for entity in stamina_query.iter() {
        let state = if telemetry.boosting { " BOOST" } else { "" };
        *writer.text(entity, 0) = format!("{}{state}", bar(telemetry.stamina, 20));
    }

    let prompt = world
        .nearest_interactable()
        .map(|nearest| {
            let label = nearest.label.unwrap_or_else(|| nearest.kind.name().to_string());
            format!("[E] {label} ({:.0} m)", nearest.distance)
        })
        .unwrap_or_default();
    for entity in prompt_query.iter() {
        *writer.text(entity, 0) = prompt.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fills_proportionally() {
        assert_eq!(bar(0.0, 4), "[....]");
        assert_eq!(bar(0.5, 4), "[##..]");
        assert_eq!(bar(1.0, 4), "[####]");
        assert_eq!(bar(3.0, 4), "[####]", "Ratios above one are clamped");
    }
}
