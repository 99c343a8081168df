//! Canonical serializable snapshot types for the base defense game.
//!
//! Produced by `sim_defense` once per observation and consumed read-only by
//! the presentation layer. Nothing in here refers back into the simulation.

use serde::{Deserialize, Serialize};

/// Position or direction in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Gold / wood / stone triple, used for both stockpiles and prices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAmounts {
    pub gold: u32,
    pub wood: u32,
    pub stone: u32,
}

/// Current wave status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Counting down to the next wave; nothing left to release.
    Countdown {
        ticks_remaining: u32,
    },
    /// Enemies of a started wave are still being released.
    Spawning {
        /// Enemies still to be released.
        remaining_to_spawn: u32,
        /// Milliseconds until the next release, if one is scheduled.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_spawn_in_ms: Option<u64>,
    },
}

impl Default for WaveStatus {
    fn default() -> Self {
        Self::Countdown { ticks_remaining: 0 }
    }
}

/// Wave panel data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveInfo {
    pub wave: u32,
    /// Combat ticks until the next wave; also the countdown display value.
    pub ticks_remaining: u32,
    /// `(timer - ticks_remaining) / timer`, clamped to `[0, 1]`.
    pub progress: f32,
    pub enemies_alive: u32,
    pub status: WaveStatus,
}

/// Information about a building.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub id: u64,
    pub kind: String,
    pub name: String,
    pub grid_x: i32,
    pub grid_z: i32,
    pub position: Point3,
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub damage: i32,
    pub range: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<String>,
    pub production_rate: u32,
    pub is_main_base: bool,
    /// Uniform scale the renderer should apply.
    pub scale: f32,
    /// Price of the next level.
    pub upgrade_cost: ResourceAmounts,
}

/// Information about an enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyInfo {
    pub id: u64,
    pub position: Point3,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub damage: i32,
}

/// Information about a projectile in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileInfo {
    pub position: Point3,
    pub velocity: Point3,
    pub damage: i32,
    pub lifetime: u32,
}

/// Information about a cosmetic particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleInfo {
    pub position: Point3,
    pub scale: f32,
    pub lifetime: u32,
    /// What produced the particle, e.g. `"hit"` or `"production"`.
    pub effect: String,
}

/// Full game state snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefenseSnapshot {
    pub tick: u64,
    pub ticks_per_second: u32,
    pub elapsed_ms: u64,

    pub grid_size: i32,
    pub cell_size: f32,

    pub resources: ResourceAmounts,
    pub wave: WaveInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_placement: Option<String>,
    pub game_over: bool,

    pub buildings: Vec<BuildingInfo>,
    pub enemies: Vec<EnemyInfo>,
    pub projectiles: Vec<ProjectileInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub particles: Vec<ParticleInfo>,
}
