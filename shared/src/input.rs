use bevy_ecs::resource::Resource;
use bevy_platform::collections::HashSet;
use serde::{Deserialize, Serialize};

/// Discrete controls the simulation understands.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub enum ShipAction {
    Forward,
    Backward,
    Left,
    Right,
    Boost,
    Interact,
}

impl ShipAction {
    pub const ALL: [ShipAction; 6] = [
        ShipAction::Forward,
        ShipAction::Backward,
        ShipAction::Left,
        ShipAction::Right,
        ShipAction::Boost,
        ShipAction::Interact,
    ];
}

/// Input snapshot consumed by the world loop.
///
/// Fed by key-down/key-up edges from whatever device layer sits on top.
/// `just_pressed` holds the rising edges since the last [`InputState::end_frame`].
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: HashSet<ShipAction>,
    just_pressed: HashSet<ShipAction>,
}

impl InputState {
    pub fn press(&mut self, action: ShipAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: ShipAction) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: ShipAction, down: bool) {
        if down {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    pub fn is_held(&self, action: ShipAction) -> bool {
        self.held.contains(&action)
    }

    pub fn just_pressed(&self, action: ShipAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Forget this frame's edges. Held keys stay held.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}
