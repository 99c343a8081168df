use crate::config::{BuildingKind, Cost, ResourceKind};
use crate::grid::Cell;
use crate::world::{BuildingId, BurstKind, EnemyId, ProjectileId};
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub enum DefenseEvent {
    PlacementStarted {
        kind: BuildingKind,
    },
    PlacementCancelled {
        kind: BuildingKind,
    },
    BuildingPlaced {
        id: BuildingId,
        kind: BuildingKind,
        cell: Cell,
        cost: Cost,
    },
    BuildingUpgraded {
        id: BuildingId,
        level: u32,
        cost: Cost,
    },
    BuildingDamaged {
        id: BuildingId,
        damage: i32,
        hp: i32,
    },
    BuildingDestroyed {
        id: BuildingId,
        kind: BuildingKind,
        cell: Cell,
        was_main_base: bool,
    },
    EnemySpawned {
        id: EnemyId,
        wave: u32,
        position: Vec3,
    },
    EnemyKilled {
        id: EnemyId,
        wave: u32,
        reward: u32,
    },
    ProjectileFired {
        id: ProjectileId,
        source: BuildingId,
        target: EnemyId,
    },
    ProjectileHit {
        id: ProjectileId,
        enemy: EnemyId,
        damage: i32,
        remaining_hp: i32,
    },
    ProjectileExpired {
        id: ProjectileId,
    },
    Produced {
        building: BuildingId,
        resource: ResourceKind,
        amount: u32,
    },
    WaveStarted {
        wave: u32,
        quota: u32,
    },
    ParticleBurst {
        effect: BurstKind,
        position: Vec3,
        count: u32,
    },
    /// The main base fell. Emitted once per game.
    GameOver {
        wave: u32,
    },
    /// A queued intent failed; carries the human-readable reason.
    IntentRejected {
        reason: String,
    },
}
