use serde::{Deserialize, Serialize};

use crate::props::PropKind;

/// What the presentation layer should do in response to an interaction.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum InteractionAction {
    OpenPanel,
    ClosePanel,
    OpenLink,
}

/// Queued by the world, drained once per frame by the caller.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct InteractionEvent {
    pub slot: usize,
    pub kind: PropKind,
    pub action: InteractionAction,
    /// Index into the catalog list matching `kind`
    pub content: Option<usize>,
}

/// Closest prop the ship can interact with, polled by the HUD.
#[derive(PartialEq, Debug, Clone)]
pub struct NearestInteractable {
    pub slot: usize,
    pub kind: PropKind,
    /// Horizontal distance from the ship
    pub distance: f32,
    pub label: Option<String>,
}
