pub mod actions;
pub mod clock;
pub mod combat;
pub mod config;
pub mod economy;
pub mod effects;
pub mod error;
pub mod events;
pub mod game;
pub mod grid;
pub mod observe;
pub mod placement;
pub mod state;
pub mod upgrades;
pub mod waves;
pub mod world;

pub use actions::DefenseAction;
pub use clock::{ScheduledTask, SimulationClock};
pub use config::{BuildingKind, BuildingSpec, Cost, DefenseConfig, ResourceKind};
pub use defense_types::DefenseSnapshot;
pub use economy::Economy;
pub use error::{
    CellRejection, ConfigError, InsufficientResources, IntentError, PlacementError, UpgradeError,
};
pub use events::DefenseEvent;
pub use game::DefenseGame;
pub use grid::{Cell, Grid};
pub use observe::{building_id_from_u64, id_to_u64};
pub use state::DefenseState;
pub use waves::WaveDirector;
pub use world::{BuildingId, BurstKind, EnemyId, ParticleId, ProjectileId, World};
