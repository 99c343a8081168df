use crate::clock::{ScheduledTask, SimulationClock};
use crate::config::Cost;
use crate::state::DefenseState;
use crate::upgrades::quote_upgrade;
use crate::world::BuildingId;
use defense_types::{
    BuildingInfo, DefenseSnapshot, EnemyInfo, ParticleInfo, Point3, ProjectileInfo,
    ResourceAmounts, WaveInfo, WaveStatus,
};
use glam::Vec3;
use sim_core::Tick;
use slotmap::{Key, KeyData};

pub fn id_to_u64(key: impl Key) -> u64 {
    key.data().as_ffi()
}

/// Inverse of [`id_to_u64`] for building ids coming back from a client.
pub fn building_id_from_u64(raw: u64) -> BuildingId {
    BuildingId::from(KeyData::from_ffi(raw))
}

fn point(v: Vec3) -> Point3 {
    Point3 {
        x: v.x,
        y: v.y,
        z: v.z,
    }
}

fn amounts(cost: Cost) -> ResourceAmounts {
    ResourceAmounts {
        gold: cost.gold,
        wood: cost.wood,
        stone: cost.stone,
    }
}

fn wave_info(state: &DefenseState, clock: &SimulationClock) -> WaveInfo {
    let waves = &state.waves;
    let status = if waves.is_spawning() {
        let next = clock.next_deadline(|t| matches!(t, ScheduledTask::SpawnEnemy { .. }));
        WaveStatus::Spawning {
            remaining_to_spawn: waves.remaining_to_spawn(),
            next_spawn_in_ms: next.map(|at| at.saturating_sub(clock.now()).as_millis()),
        }
    } else {
        WaveStatus::Countdown {
            ticks_remaining: waves.ticks_remaining(),
        }
    };

    WaveInfo {
        wave: waves.wave(),
        ticks_remaining: waves.ticks_remaining(),
        progress: waves.progress(),
        enemies_alive: state.world.enemies.len() as u32,
        status,
    }
}

pub fn build_snapshot(state: &DefenseState, clock: &SimulationClock, tick: Tick) -> DefenseSnapshot {
    let config = &state.config;

    let buildings = state
        .world
        .buildings
        .iter()
        .map(|(id, b)| BuildingInfo {
            id: id_to_u64(id),
            kind: b.kind.as_str().to_string(),
            name: config.spec(b.kind).name.clone(),
            grid_x: b.cell.x,
            grid_z: b.cell.z,
            position: point(b.position),
            hp: b.hp,
            max_hp: b.max_hp,
            level: b.level,
            damage: b.damage,
            range: b.range,
            produces: b.produces.map(|r| r.as_str().to_string()),
            production_rate: b.production_rate,
            is_main_base: b.is_main_base,
            scale: b.scale,
            upgrade_cost: quote_upgrade(state, id).map(amounts).unwrap_or_default(),
        })
        .collect();

    let enemies = state
        .world
        .enemies
        .iter()
        .map(|(id, e)| EnemyInfo {
            id: id_to_u64(id),
            position: point(e.position),
            hp: e.hp,
            max_hp: e.max_hp,
            speed: e.speed,
            damage: e.damage,
        })
        .collect();

    let projectiles = state
        .world
        .projectiles
        .values()
        .map(|p| ProjectileInfo {
            position: point(p.position),
            velocity: point(p.velocity),
            damage: p.damage,
            lifetime: p.lifetime,
        })
        .collect();

    let particles = state
        .world
        .particles
        .values()
        .map(|p| ParticleInfo {
            position: point(p.position),
            scale: p.scale,
            lifetime: p.lifetime,
            effect: p.effect.as_str().to_string(),
        })
        .collect();

    DefenseSnapshot {
        tick,
        ticks_per_second: config.tick_hz,
        elapsed_ms: clock.now().as_millis(),
        grid_size: state.world.grid.size(),
        cell_size: state.world.grid.cell_size(),
        resources: amounts(state.economy.available()),
        wave: wave_info(state, clock),
        pending_placement: state.pending_placement.map(|k| k.as_str().to_string()),
        game_over: state.game_over,
        buildings,
        enemies,
        projectiles,
        particles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefenseConfig;

    #[test]
    fn initial_snapshot_shows_base_and_countdown() {
        let state = DefenseState::new(DefenseConfig::default(), 0);
        let snapshot = build_snapshot(&state, &SimulationClock::new(), 0);

        assert_eq!(snapshot.resources.gold, 500);
        assert_eq!(snapshot.buildings.len(), 1);
        let base = &snapshot.buildings[0];
        assert!(base.is_main_base);
        assert_eq!(base.name, "Barracks");
        assert_eq!(base.upgrade_cost.gold, 200);
        assert_eq!(snapshot.wave.wave, 1);
        assert_eq!(
            snapshot.wave.status,
            WaveStatus::Countdown {
                ticks_remaining: 30
            }
        );
    }

    #[test]
    fn building_ids_survive_the_u64_round_trip() {
        let state = DefenseState::new(DefenseConfig::default(), 0);
        let base = state.main_base.unwrap();
        assert_eq!(building_id_from_u64(id_to_u64(base)), base);
    }
}
