use bevy_ecs::schedule::SystemSet;

/// Per-frame ordering shared by both binaries.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulation,
    Presentation,
    Ui,
}
