use crate::config::BuildingKind;
use crate::world::BuildingId;

/// Intents that can be queued for a future tick through the host.
#[derive(Clone, Debug, PartialEq)]
pub enum DefenseAction {
    BeginPlacement { kind: BuildingKind },
    CancelPlacement,
    ConfirmPlacement { x: i32, z: i32 },
    Upgrade { building: BuildingId },
}
