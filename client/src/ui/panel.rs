//! The portfolio panel opened by islands, chests and bottles.

use bevy::prelude::*;
use shared::content::{DirectoryContent, ResolvedContent};
use shared::interaction::{InteractionAction, InteractionEvent};
use shared::props::PropKind;
use shared::{GameFolderPaths, WorldLoop};

use crate::constants::{PANEL_BODY_FONT_SIZE, PANEL_TITLE_FONT_SIZE, TEXT_COLOR};

/// How long a bottle's link stays on screen (seconds)
const LINK_DISPLAY_TIME: f32 = 6.0;

#[derive(Component)]
pub struct PanelRoot;

#[derive(Component)]
pub struct PanelTitle;

#[derive(Component)]
pub struct PanelBody;

#[derive(Resource)]
pub struct ContentPanel {
    provider: DirectoryContent,
    shown: Option<ResolvedContent>,
    /// Remaining display time for links
    timer: Option<Timer>,
}

impl ContentPanel {
    fn is_showing(&self, kind: PropKind, slot: usize) -> bool {
        self.shown
            .as_ref()
            .is_some_and(|shown| shown.kind == kind && shown.slot == slot)
    }

    /// Apply one event. Returns true when the panel changed.
    fn apply(&mut self, world: &WorldLoop, event: &InteractionEvent) -> bool {
        if event.action == InteractionAction::ClosePanel {
            if self.is_showing(event.kind, event.slot) {
                self.shown = None;
                self.timer = None;
                return true;
            }
            return false;
        }

        match world.catalog().resolve(&self.provider, event) {
            Ok(Some(content)) => {
                if event.action == InteractionAction::OpenLink {
                    info!("Link from bottle {}: {}", event.slot, content.body);
                    self.timer = Some(Timer::from_seconds(LINK_DISPLAY_TIME, TimerMode::Once));
                } else {
                    self.timer = None;
                }
                self.shown = Some(content);
                true
            }
            Ok(None) => {
                debug!("{} {} has no content", event.kind.name(), event.slot);
                false
            }
            Err(e) => {
                warn!("Could not load content for {} {}: {e}", event.kind.name(), event.slot);
                false
            }
        }
    }
}

pub fn setup_panel(mut commands: Commands, paths: Res<GameFolderPaths>) {
    commands.insert_resource(ContentPanel {
        provider: DirectoryContent::new(&paths.content_folder_path),
        shown: None,
        timer: None,
    });

    commands
        .spawn((
            PanelRoot,
            BackgroundColor(Color::BLACK.with_alpha(0.75)),
            Node {
                position_type: PositionType::Absolute,
                right: Val::Percent(2.),
                top: Val::Percent(5.),
                width: Val::Percent(36.),
                max_height: Val::Percent(80.),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                overflow: Overflow::clip(),
                ..default()
            },
            Visibility::Hidden,
        ))
        .with_children(|panel| {
            panel.spawn((
                PanelTitle,
                Text::new(""),
                TextFont::from_font_size(PANEL_TITLE_FONT_SIZE),
                TextColor(TEXT_COLOR),
            ));
            panel.spawn((
                PanelBody,
                Text::new(""),
                TextFont::from_font_size(PANEL_BODY_FONT_SIZE),
                TextColor(TEXT_COLOR),
            ));
        });
}

fn island_in_range(world: &WorldLoop, slot: usize) -> bool {
    let ship = world.vessel().position();
    world
        .pool(PropKind::Island)
        .iter_active()
        .any(|island| island.slot() == slot && island.in_range(ship))
}

/// Drain this frame's interactions and keep the panel in step with them.
///
/// Island panels also close once the ship leaves their range.
pub fn interaction_panel_system(
    time: Res<Time>,
    mut world: ResMut<WorldLoop>,
    mut panel: ResMut<ContentPanel>,
    mut root: Query<&mut Visibility, With<PanelRoot>>,
    mut title: Query<&mut Text, (With<PanelTitle>, Without<PanelBody>)>,
    mut body: Query<&mut Text, (With<PanelBody>, Without<PanelTitle>)>,
) {
    let mut changed = false;
    for event in world.drain_interactions() {
        changed |= panel.apply(&world, &event);
    }

    if let Some(timer) = panel.timer.as_mut() {
        if timer.tick(time.delta()).finished() {
            panel.shown = None;
            panel.timer = None;
            changed = true;
        }
    } else if let Some(shown) = panel.shown.as_ref() {
        // Chests report their own ClosePanel; islands have no open state
        if shown.kind == PropKind::Island && !island_in_range(&world, shown.slot) {
            panel.shown = None;
            changed = true;
        }
    }

    if !changed {
        return;
    }

    let (title_text, body_text, visibility) = match panel.shown.as_ref() {
        Some(shown) => (shown.title.clone(), shown.body.clone(), Visibility::Inherited),
        None => (String::new(), String::new(), Visibility::Hidden),
    };
    for mut text in title.iter_mut() {
        text.0 = title_text.clone();
    }
    for mut text in body.iter_mut() {
        text.0 = body_text.clone();
    }
    for mut root_visibility in root.iter_mut() {
        *root_visibility = visibility;
    }
}
