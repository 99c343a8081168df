use crate::config::{Cost, ResourceKind};
use crate::effects::spawn_burst;
use crate::error::InsufficientResources;
use crate::events::DefenseEvent;
use crate::state::DefenseState;
use crate::world::{BuildingId, BurstKind};
use glam::Vec3;

/// Gold / wood / stone stockpile. Amounts never go negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Economy {
    gold: u32,
    wood: u32,
    stone: u32,
}

impl Economy {
    pub fn new(starting: Cost) -> Self {
        Self {
            gold: starting.gold,
            wood: starting.wood,
            stone: starting.stone,
        }
    }

    pub fn available(&self) -> Cost {
        Cost::new(self.gold, self.wood, self.stone)
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
        }
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.gold >= cost.gold && self.wood >= cost.wood && self.stone >= cost.stone
    }

    /// Subtracts all three amounts, or nothing.
    pub fn charge(&mut self, cost: &Cost) -> Result<(), InsufficientResources> {
        if !self.can_afford(cost) {
            return Err(InsufficientResources {
                required: *cost,
                available: self.available(),
            });
        }
        self.gold -= cost.gold;
        self.wood -= cost.wood;
        self.stone -= cost.stone;
        Ok(())
    }

    pub fn credit(&mut self, kind: ResourceKind, amount: u32) {
        let slot = match kind {
            ResourceKind::Gold => &mut self.gold,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// One production tick: every producing building credits `rate * level`.
pub fn apply_production(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    let producers: Vec<(BuildingId, ResourceKind, u32, Vec3)> = state
        .world
        .buildings
        .iter()
        .filter_map(|(id, b)| {
            let kind = b.produces?;
            Some((id, kind, b.production_rate.saturating_mul(b.level), b.position))
        })
        .collect();

    for (building, resource, amount, position) in producers {
        state.economy.credit(resource, amount);
        events.push(DefenseEvent::Produced {
            building,
            resource,
            amount,
        });
        spawn_burst(
            state,
            position + Vec3::Y * 2.0,
            BurstKind::Production,
            events,
        );
    }
}
