use crate::config::Cost;
use crate::effects::spawn_burst;
use crate::error::UpgradeError;
use crate::events::DefenseEvent;
use crate::state::DefenseState;
use crate::world::{BuildingId, BurstKind};

/// Price of the next level: base cost times current level.
pub fn quote_upgrade(state: &DefenseState, id: BuildingId) -> Result<Cost, UpgradeError> {
    let building = state
        .world
        .buildings
        .get(id)
        .ok_or(UpgradeError::UnknownBuildingId(id))?;
    Ok(state.config.spec(building.kind).cost.times(building.level))
}

/// Charges the quote and levels the building up, fully healing it.
///
/// Damage and range only grow on buildings that have them.
pub fn upgrade(
    state: &mut DefenseState,
    id: BuildingId,
    events: &mut Vec<DefenseEvent>,
) -> Result<u32, UpgradeError> {
    if state.game_over {
        return Err(UpgradeError::GameOver);
    }
    let cost = quote_upgrade(state, id)?;
    state.economy.charge(&cost)?;

    let spec = state.config.spec(state.world.buildings[id].kind).clone();
    let building = &mut state.world.buildings[id];
    building.level += 1;
    let level = building.level;
    building.max_hp = spec.hp.saturating_mul(level as i32);
    building.hp = building.max_hp;
    if building.damage != 0 {
        building.damage = spec.damage.saturating_mul(level as i32);
    }
    if building.range != 0.0 {
        building.range = spec.range + level as f32;
    }
    building.scale = 1.0 + level as f32 * 0.1;
    let position = building.position;

    tracing::debug!(?id, level, %cost, "building upgraded");
    events.push(DefenseEvent::BuildingUpgraded { id, level, cost });
    spawn_burst(state, position, BurstKind::Upgraded, events);
    Ok(level)
}
