use crate::config::{BuildingKind, ResourceKind};
use crate::effects::{advance_particles, spawn_burst};
use crate::events::DefenseEvent;
use crate::state::DefenseState;
use crate::waves::WaveStart;
use crate::world::{BuildingId, BurstKind, EnemyId, Projectile, ProjectileId};
use glam::Vec3;

/// One combat tick, in fixed order: wave countdown, enemies, turrets,
/// projectiles, particles.
///
/// Returns the wave that started this tick so the caller can schedule its
/// staggered releases.
pub fn combat_tick(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) -> Option<WaveStart> {
    let started = if state.game_over {
        None
    } else {
        state.waves.on_combat_tick(&state.config)
    };
    if let Some(start) = started {
        tracing::info!(wave = start.wave, quota = start.quota, "wave started");
        events.push(DefenseEvent::WaveStarted {
            wave: start.wave,
            quota: start.quota,
        });
    }

    move_enemies(state, events);
    fire_turrets(state, events);
    advance_projectiles(state, events);
    advance_particles(&mut state.world, &state.config);

    started
}

/// Each enemy walks toward the closest building, or hits it once in contact.
pub fn move_enemies(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    let enemy_ids: Vec<EnemyId> = state.world.enemies.keys().collect();
    let threshold = state.config.contact_threshold;

    for enemy_id in enemy_ids {
        let Some(enemy) = state.world.enemies.get(enemy_id) else {
            continue;
        };
        let (position, speed, damage) = (enemy.position, enemy.speed, enemy.damage);

        // Re-resolved per enemy: an earlier enemy may have destroyed the target.
        let Some((target, distance)) = state.world.closest_building(position) else {
            continue;
        };

        if distance > threshold {
            let target_pos = state.world.buildings[target].position;
            let step = (target_pos - position).normalize_or_zero() * speed;
            state.world.enemies[enemy_id].position += step;
        } else {
            damage_building(state, target, damage, events);
        }
    }
}

pub fn damage_building(
    state: &mut DefenseState,
    id: BuildingId,
    damage: i32,
    events: &mut Vec<DefenseEvent>,
) {
    let Some(building) = state.world.buildings.get_mut(id) else {
        return;
    };
    building.hp = (building.hp - damage).max(0);
    let hp = building.hp;
    events.push(DefenseEvent::BuildingDamaged { id, damage, hp });

    if hp <= 0 {
        destroy_building(state, id, events);
    }
}

/// Removes a building without refund. Losing the main base ends the game,
/// and that transition happens at most once.
pub fn destroy_building(state: &mut DefenseState, id: BuildingId, events: &mut Vec<DefenseEvent>) {
    let Some(building) = state.world.remove_building(id) else {
        return;
    };

    tracing::debug!(?id, kind = %building.kind, cell = %building.cell, "building destroyed");
    events.push(DefenseEvent::BuildingDestroyed {
        id,
        kind: building.kind,
        cell: building.cell,
        was_main_base: building.is_main_base,
    });
    spawn_burst(state, building.position, BurstKind::Destroyed, events);

    if building.is_main_base && !state.game_over {
        state.game_over = true;
        state.waves.halt();
        tracing::info!(wave = state.waves.wave(), "main base destroyed, game over");
        events.push(DefenseEvent::GameOver {
            wave: state.waves.wave(),
        });
    }
}

/// Every turret shoots at the closest enemy within range, aiming at where
/// the enemy is now.
pub fn fire_turrets(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    let turrets: Vec<(BuildingId, Vec3, f32, i32)> = state
        .world
        .buildings
        .iter()
        .filter(|(_, b)| b.kind == BuildingKind::Turret)
        .map(|(id, b)| (id, b.position, b.range, b.damage))
        .collect();

    for (source, origin, range, damage) in turrets {
        let Some(target) = state.world.closest_enemy_within(origin, range) else {
            continue;
        };
        let aim = state.world.enemies[target].position;
        let velocity = (aim - origin).normalize_or_zero() * state.config.projectile_speed;

        let id = state.world.projectiles.insert(Projectile {
            position: origin,
            velocity,
            damage,
            lifetime: state.config.projectile_lifetime_ticks,
            source,
        });
        events.push(DefenseEvent::ProjectileFired { id, source, target });
    }
}

/// Moves projectiles, expires them, and resolves the first enemy hit.
pub fn advance_projectiles(state: &mut DefenseState, events: &mut Vec<DefenseEvent>) {
    let projectile_ids: Vec<ProjectileId> = state.world.projectiles.keys().collect();
    let hit_radius = state.config.hit_radius;

    for projectile_id in projectile_ids {
        let Some(projectile) = state.world.projectiles.get_mut(projectile_id) else {
            continue;
        };
        projectile.position += projectile.velocity;
        projectile.lifetime = projectile.lifetime.saturating_sub(1);
        let (position, damage) = (projectile.position, projectile.damage);

        if projectile.lifetime == 0 {
            state.world.projectiles.remove(projectile_id);
            events.push(DefenseEvent::ProjectileExpired { id: projectile_id });
            continue;
        }

        let Some(enemy_id) = state.world.first_enemy_touching(position, hit_radius) else {
            continue;
        };
        state.world.projectiles.remove(projectile_id);

        let enemy = &mut state.world.enemies[enemy_id];
        enemy.hp = (enemy.hp - damage).max(0);
        let remaining_hp = enemy.hp;
        events.push(DefenseEvent::ProjectileHit {
            id: projectile_id,
            enemy: enemy_id,
            damage,
            remaining_hp,
        });

        if remaining_hp <= 0 {
            kill_enemy(state, enemy_id, events);
        }
        spawn_burst(state, position, BurstKind::Hit, events);
    }
}

fn kill_enemy(state: &mut DefenseState, id: EnemyId, events: &mut Vec<DefenseEvent>) {
    let Some(enemy) = state.world.enemies.remove(id) else {
        return;
    };
    let reward = state.config.kill_reward_gold;
    state.economy.credit(ResourceKind::Gold, reward);

    tracing::debug!(?id, wave = enemy.wave, reward, "enemy killed");
    events.push(DefenseEvent::EnemyKilled {
        id,
        wave: enemy.wave,
        reward,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefenseConfig;
    use crate::grid::Cell;
    use crate::waves::enemy_for_wave;

    fn empty_state() -> DefenseState {
        let mut state = DefenseState::new(DefenseConfig::default(), 3);
        if let Some(base) = state.main_base {
            state.world.remove_building(base);
        }
        state
    }

    #[test]
    fn idle_enemy_without_buildings() {
        let mut state = empty_state();
        let pos = Vec3::new(5.0, 0.75, 0.0);
        let id = state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, pos));

        move_enemies(&mut state, &mut Vec::new());
        assert_eq!(state.world.enemies[id].position, pos);
    }

    #[test]
    fn enemy_walks_toward_closest_building() {
        let mut state = DefenseState::new(DefenseConfig::default(), 3);
        let start = Vec3::new(10.0, 1.25, 0.0);
        let id = state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 2, start));

        move_enemies(&mut state, &mut Vec::new());
        let moved = state.world.enemies[id].position;
        assert!((moved.x - (10.0 - 0.03)).abs() < 1e-5);
        assert!((moved.z).abs() < 1e-6);
    }

    #[test]
    fn enemy_in_contact_damages_and_clamps() {
        let mut state = empty_state();
        let wall = state
            .world
            .place(&state.config, BuildingKind::Wall, Cell::new(0, 0))
            .unwrap();
        state.world.buildings[wall].hp = 4;
        let position = state.world.buildings[wall].position + Vec3::X * 0.5;
        state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, position));

        let mut events = Vec::new();
        move_enemies(&mut state, &mut events);

        assert!(state.world.buildings.get(wall).is_none());
        assert!(state.world.can_place(Cell::new(0, 0)));
        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::BuildingDamaged { hp: 0, .. })));
        assert!(!state.game_over);
    }

    #[test]
    fn main_base_loss_sets_game_over_once() {
        let mut state = DefenseState::new(DefenseConfig::default(), 3);
        let base = state.main_base.unwrap();
        let mut events = Vec::new();

        damage_building(&mut state, base, 10_000, &mut events);
        destroy_building(&mut state, base, &mut events);

        assert!(state.game_over);
        let overs = events
            .iter()
            .filter(|e| matches!(e, DefenseEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn game_over_drops_owed_releases() {
        let mut state = DefenseState::new(DefenseConfig::default(), 3);
        let config = state.config.clone();
        while state.waves.on_combat_tick(&config).is_none() {}
        assert_eq!(state.waves.remaining_to_spawn(), 7);

        let base = state.main_base.unwrap();
        destroy_building(&mut state, base, &mut Vec::new());

        assert!(state.game_over);
        assert!(!state.waves.is_spawning());
    }

    #[test]
    fn turret_fires_at_snapshot_of_nearest_enemy() {
        let mut state = empty_state();
        let turret = state
            .world
            .place(&state.config, BuildingKind::Turret, Cell::new(0, 0))
            .unwrap();
        let origin = state.world.buildings[turret].position;
        let near = state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, origin + Vec3::X * 3.0));
        state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, origin + Vec3::Z * 5.0));
        state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, origin - Vec3::X * 9.0));

        let mut events = Vec::new();
        fire_turrets(&mut state, &mut events);

        assert_eq!(state.world.projectiles.len(), 1);
        let projectile = state.world.projectiles.values().next().unwrap();
        assert!((projectile.velocity - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(projectile.damage, 10);
        assert_eq!(projectile.lifetime, 100);
        assert!(matches!(
            events.as_slice(),
            [DefenseEvent::ProjectileFired { target, source, .. }] if *target == near && *source == turret
        ));
    }

    #[test]
    fn projectile_expires_after_exactly_its_lifetime() {
        let mut state = empty_state();
        let mut events = Vec::new();
        let source = state
            .world
            .place(&state.config, BuildingKind::Turret, Cell::new(5, 5))
            .unwrap();
        let id = state.world.projectiles.insert(Projectile {
            position: Vec3::ZERO,
            velocity: Vec3::X * 0.5,
            damage: 10,
            lifetime: 4,
            source,
        });

        for _ in 0..3 {
            advance_projectiles(&mut state, &mut events);
            assert!(state.world.projectiles.contains_key(id));
        }
        advance_projectiles(&mut state, &mut events);
        assert!(!state.world.projectiles.contains_key(id));
        assert!(matches!(
            events.last(),
            Some(DefenseEvent::ProjectileExpired { id: expired }) if *expired == id
        ));
    }

    #[test]
    fn lethal_hit_kills_and_rewards_gold() {
        let mut state = empty_state();
        let source = state
            .world
            .place(&state.config, BuildingKind::Turret, Cell::new(5, 5))
            .unwrap();
        let mut enemy = enemy_for_wave(&state.config, 1, Vec3::new(1.0, 0.0, 0.0));
        enemy.hp = 6;
        let enemy_id = state.world.enemies.insert(enemy);
        state.world.projectiles.insert(Projectile {
            position: Vec3::ZERO,
            velocity: Vec3::X * 0.5,
            damage: 10,
            lifetime: 100,
            source,
        });
        let gold = state.economy.get(ResourceKind::Gold);

        let mut events = Vec::new();
        advance_projectiles(&mut state, &mut events);

        assert!(state.world.projectiles.is_empty());
        assert!(!state.world.enemies.contains_key(enemy_id));
        assert_eq!(state.economy.get(ResourceKind::Gold), gold + 10);
        assert!(events
            .iter()
            .any(|e| matches!(e, DefenseEvent::ProjectileHit { remaining_hp: 0, .. })));
        assert_eq!(state.world.particles.len(), 20);
    }

    #[test]
    fn non_lethal_hit_still_bursts() {
        let mut state = empty_state();
        let source = state
            .world
            .place(&state.config, BuildingKind::Turret, Cell::new(5, 5))
            .unwrap();
        let enemy_id = state
            .world
            .enemies
            .insert(enemy_for_wave(&state.config, 1, Vec3::new(0.6, 0.0, 0.0)));
        state.world.projectiles.insert(Projectile {
            position: Vec3::ZERO,
            velocity: Vec3::X * 0.5,
            damage: 10,
            lifetime: 100,
            source,
        });

        advance_projectiles(&mut state, &mut Vec::new());
        assert_eq!(state.world.enemies[enemy_id].hp, 50);
        assert_eq!(state.world.particles.len(), 20);
    }
}
