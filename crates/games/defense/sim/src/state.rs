use crate::config::{BuildingKind, DefenseConfig};
use crate::economy::Economy;
use crate::grid::Cell;
use crate::waves::WaveDirector;
use crate::world::{BuildingId, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// All mutable simulation state. Systems take it by `&mut`; nothing is global.
#[derive(Clone, Debug)]
pub struct DefenseState {
    pub config: DefenseConfig,
    pub world: World,
    pub economy: Economy,
    pub waves: WaveDirector,
    /// The building whose destruction ends the game.
    pub main_base: Option<BuildingId>,
    pub game_over: bool,
    pub pending_placement: Option<BuildingKind>,
    pub rng: ChaCha8Rng,
}

impl DefenseState {
    /// Fresh world: starting stockpile and a free main base.
    pub fn new(config: DefenseConfig, seed: u64) -> Self {
        let mut world = World::new(config.grid_size, config.cell_size);
        let (x, z) = config.main_base_cell;
        let main_base = match world.place_main_base(&config, config.main_base_kind, Cell::new(x, z))
        {
            Ok(id) => Some(id),
            Err(reason) => {
                tracing::warn!(?reason, "main base could not be placed");
                None
            }
        };

        Self {
            economy: Economy::new(config.starting_resources),
            waves: WaveDirector::new(config.wave_timer_ticks),
            world,
            main_base,
            game_over: false,
            pending_placement: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        }
    }
}
