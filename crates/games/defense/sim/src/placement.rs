use crate::config::BuildingKind;
use crate::effects::spawn_burst;
use crate::error::{InsufficientResources, PlacementError};
use crate::events::DefenseEvent;
use crate::grid::Cell;
use crate::state::DefenseState;
use crate::world::{BuildingId, BurstKind};

/// Enters pending placement for `kind`. Charges nothing, but refuses a type
/// the stockpile cannot currently pay for.
pub fn begin_placement(
    state: &mut DefenseState,
    kind: BuildingKind,
    events: &mut Vec<DefenseEvent>,
) -> Result<(), PlacementError> {
    if state.game_over {
        return Err(PlacementError::GameOver);
    }
    let cost = state.config.spec(kind).cost;
    if !state.economy.can_afford(&cost) {
        return Err(InsufficientResources {
            required: cost,
            available: state.economy.available(),
        }
        .into());
    }

    state.pending_placement = Some(kind);
    events.push(DefenseEvent::PlacementStarted { kind });
    Ok(())
}

pub fn cancel_placement(
    state: &mut DefenseState,
    events: &mut Vec<DefenseEvent>,
) -> Option<BuildingKind> {
    let kind = state.pending_placement.take()?;
    events.push(DefenseEvent::PlacementCancelled { kind });
    Some(kind)
}

/// Places the pending building on `cell`.
///
/// The cell is validated before anything is charged. On failure the pending
/// placement is kept so the caller can pick another cell.
pub fn confirm_placement(
    state: &mut DefenseState,
    cell: Cell,
    events: &mut Vec<DefenseEvent>,
) -> Result<BuildingId, PlacementError> {
    if state.game_over {
        return Err(PlacementError::GameOver);
    }
    let kind = state
        .pending_placement
        .ok_or(PlacementError::NoPendingPlacement)?;

    state
        .world
        .grid
        .check(cell)
        .map_err(|reason| PlacementError::InvalidPlacement { cell, reason })?;

    let cost = state.config.spec(kind).cost;
    state.economy.charge(&cost)?;

    let id = state
        .world
        .place(&state.config, kind, cell)
        .map_err(|reason| PlacementError::InvalidPlacement { cell, reason })?;
    state.pending_placement = None;

    tracing::debug!(?id, %kind, %cell, "building placed");
    events.push(DefenseEvent::BuildingPlaced {
        id,
        kind,
        cell,
        cost,
    });
    let ground = state.world.grid.cell_to_world(cell, 0.0);
    spawn_burst(state, ground, BurstKind::Placed, events);
    Ok(id)
}

/// Building standing on `cell`, if any.
pub fn select_building(state: &DefenseState, cell: Cell) -> Option<BuildingId> {
    state.world.find_building_at(cell)
}
