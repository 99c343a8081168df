use crate::config::DefenseConfig;
use crate::events::DefenseEvent;
use crate::state::DefenseState;
use crate::world::{Enemy, EnemyId};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Returned by [`WaveDirector::on_combat_tick`] when a new wave begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStart {
    pub wave: u32,
    pub quota: u32,
}

/// Wave number, countdown and the count of enemies still owed to the field.
///
/// The countdown for the next wave restarts as soon as a wave starts, so it
/// runs while the previous wave is still being released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveDirector {
    wave: u32,
    timer: u32,
    countdown: u32,
    remaining_to_spawn: u32,
}

impl WaveDirector {
    pub fn new(timer: u32) -> Self {
        Self {
            wave: 1,
            timer,
            countdown: timer,
            remaining_to_spawn: 0,
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Combat ticks until the next wave.
    pub fn ticks_remaining(&self) -> u32 {
        self.countdown
    }

    pub fn remaining_to_spawn(&self) -> u32 {
        self.remaining_to_spawn
    }

    pub fn is_spawning(&self) -> bool {
        self.remaining_to_spawn > 0
    }

    /// `(timer - remaining) / timer`, clamped to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.timer == 0 {
            return 1.0;
        }
        let elapsed = self.timer.saturating_sub(self.countdown) as f32;
        (elapsed / self.timer as f32).clamp(0.0, 1.0)
    }

    pub fn on_combat_tick(&mut self, config: &DefenseConfig) -> Option<WaveStart> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }

        self.wave += 1;
        self.countdown = self.timer;
        let quota = config.wave_quota(self.wave);
        self.remaining_to_spawn += quota;
        Some(WaveStart {
            wave: self.wave,
            quota,
        })
    }

    /// Drops every release still owed. Used once the match is lost.
    pub fn halt(&mut self) {
        self.remaining_to_spawn = 0;
    }

    fn note_spawned(&mut self) {
        self.remaining_to_spawn = self.remaining_to_spawn.saturating_sub(1);
    }
}

/// Stats of an enemy released by `wave`, placed at `position`.
pub fn enemy_for_wave(config: &DefenseConfig, wave: u32, position: Vec3) -> Enemy {
    let scaling = &config.enemy;
    let w = wave as i32;
    let hp = scaling.hp_base + scaling.hp_per_wave * w;
    Enemy {
        position,
        hp,
        max_hp: hp,
        speed: scaling.speed_base + scaling.speed_per_wave * wave as f32,
        damage: scaling.damage_base + scaling.damage_per_wave * w,
        wave,
    }
}

/// Releases one enemy of `wave` at a random point on the spawn ring.
pub fn spawn_enemy(
    state: &mut DefenseState,
    wave: u32,
    events: &mut Vec<DefenseEvent>,
) -> EnemyId {
    let angle = state.rng.gen::<f32>() * TAU;
    let radius = state.config.spawn_radius();
    let position = Vec3::new(
        angle.cos() * radius,
        state.config.enemy_spawn_height,
        angle.sin() * radius,
    );

    let enemy = enemy_for_wave(&state.config, wave, position);
    let hp = enemy.hp;
    let id = state.world.enemies.insert(enemy);
    state.waves.note_spawned();

    tracing::debug!(?id, wave, hp, "enemy spawned");
    events.push(DefenseEvent::EnemySpawned { id, wave, position });
    id
}
