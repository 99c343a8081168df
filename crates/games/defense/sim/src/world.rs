use crate::config::{BuildingKind, BuildingSpec, DefenseConfig, ResourceKind};
use crate::error::CellRejection;
use crate::grid::{Cell, Grid};
use glam::Vec3;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct BuildingId; }
new_key_type! { pub struct EnemyId; }
new_key_type! { pub struct ProjectileId; }
new_key_type! { pub struct ParticleId; }

#[derive(Clone, Debug)]
pub struct Building {
    pub kind: BuildingKind,
    pub cell: Cell,
    pub position: Vec3,
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub damage: i32,
    pub range: f32,
    pub produces: Option<ResourceKind>,
    pub production_rate: u32,
    pub is_main_base: bool,
    /// Render scale hint, `1 + level * 0.1` after the first upgrade.
    pub scale: f32,
}

impl Building {
    fn from_spec(kind: BuildingKind, spec: &BuildingSpec, cell: Cell, position: Vec3) -> Self {
        Self {
            kind,
            cell,
            position,
            hp: spec.hp,
            max_hp: spec.hp,
            level: 1,
            damage: spec.damage,
            range: spec.range,
            produces: spec.produces,
            production_rate: spec.rate,
            is_main_base: false,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub position: Vec3,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: f32,
    pub damage: i32,
    pub wave: u32,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: i32,
    pub lifetime: u32,
    pub source: BuildingId,
}

/// What a particle burst marks; lets the presentation layer pick colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BurstKind {
    Placed,
    Upgraded,
    Hit,
    Destroyed,
    Production,
}

impl BurstKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BurstKind::Placed => "placed",
            BurstKind::Upgraded => "upgraded",
            BurstKind::Hit => "hit",
            BurstKind::Destroyed => "destroyed",
            BurstKind::Production => "production",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub lifetime: u32,
    pub scale: f32,
    pub effect: BurstKind,
}

/// Owns every entity. Everything else refers to entities by id.
///
/// Iteration order over each arena is slot order, which is deterministic for
/// a given sequence of inserts and removals; "first encountered" tie-breaks
/// follow it.
#[derive(Clone, Debug)]
pub struct World {
    pub buildings: SlotMap<BuildingId, Building>,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub projectiles: SlotMap<ProjectileId, Projectile>,
    pub particles: SlotMap<ParticleId, Particle>,
    pub grid: Grid,
}

impl World {
    pub fn new(grid_size: i32, cell_size: f32) -> Self {
        Self {
            buildings: SlotMap::with_key(),
            enemies: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            particles: SlotMap::with_key(),
            grid: Grid::new(grid_size, cell_size),
        }
    }

    pub fn can_place(&self, cell: Cell) -> bool {
        self.grid.can_place(cell)
    }

    /// Creates a level-1 building from the type table and registers its cell.
    pub fn place(
        &mut self,
        config: &DefenseConfig,
        kind: BuildingKind,
        cell: Cell,
    ) -> Result<BuildingId, CellRejection> {
        self.grid.check(cell)?;

        let spec = config.spec(kind);
        let position = self.grid.cell_to_world(cell, spec.height);
        let id = self
            .buildings
            .insert(Building::from_spec(kind, spec, cell, position));
        self.grid.occupy(cell, id)?;
        Ok(id)
    }

    pub(crate) fn place_main_base(
        &mut self,
        config: &DefenseConfig,
        kind: BuildingKind,
        cell: Cell,
    ) -> Result<BuildingId, CellRejection> {
        let id = self.place(config, kind, cell)?;
        if let Some(building) = self.buildings.get_mut(id) {
            building.is_main_base = true;
        }
        Ok(id)
    }

    pub fn find_building_at(&self, cell: Cell) -> Option<BuildingId> {
        self.grid.find_building_at(cell)
    }

    pub fn remove_building(&mut self, id: BuildingId) -> Option<Building> {
        let building = self.buildings.remove(id)?;
        self.grid.release(building.cell, id);
        Some(building)
    }

    pub fn main_base(&self) -> Option<BuildingId> {
        self.buildings
            .iter()
            .find_map(|(id, b)| b.is_main_base.then_some(id))
    }

    /// Closest building to `from`, by straight-line distance.
    /// Linear scan; ties keep the first building encountered.
    pub fn closest_building(&self, from: Vec3) -> Option<(BuildingId, f32)> {
        let mut best: Option<(BuildingId, f32)> = None;
        for (id, building) in self.buildings.iter() {
            let dist = from.distance(building.position);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((id, dist));
            }
        }
        best
    }

    /// Closest enemy strictly within `range` of `from`.
    /// Linear scan; ties keep the first enemy encountered.
    pub fn closest_enemy_within(&self, from: Vec3, range: f32) -> Option<EnemyId> {
        let mut best: Option<(EnemyId, f32)> = None;
        for (id, enemy) in self.enemies.iter() {
            let dist = from.distance(enemy.position);
            if dist < range && best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    /// First enemy, in storage order, strictly within `radius` of `at`.
    pub fn first_enemy_touching(&self, at: Vec3, radius: f32) -> Option<EnemyId> {
        self.enemies
            .iter()
            .find(|(_, enemy)| enemy.position.distance(at) < radius)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> (World, DefenseConfig) {
        let config = DefenseConfig::default();
        (World::new(config.grid_size, config.cell_size), config)
    }

    fn enemy_at(position: Vec3) -> Enemy {
        Enemy {
            position,
            hp: 60,
            max_hp: 60,
            speed: 0.025,
            damage: 7,
            wave: 1,
        }
    }

    #[test]
    fn place_uses_type_table() {
        let (mut world, config) = world();
        let id = world.place(&config, BuildingKind::Turret, Cell::new(2, 3)).unwrap();

        let turret = &world.buildings[id];
        assert_eq!(turret.hp, 150);
        assert_eq!(turret.max_hp, 150);
        assert_eq!(turret.level, 1);
        assert_eq!(turret.damage, 10);
        assert_eq!(turret.range, 8.0);
        assert_eq!(turret.position, Vec3::new(4.0, 1.0, 6.0));
        assert!(!turret.is_main_base);
        assert_eq!(world.find_building_at(Cell::new(2, 3)), Some(id));
    }

    #[test]
    fn place_rejects_occupied_and_out_of_bounds_cells() {
        let (mut world, config) = world();
        let first = world.place(&config, BuildingKind::Wall, Cell::new(1, 1)).unwrap();

        assert_eq!(
            world.place(&config, BuildingKind::Mine, Cell::new(1, 1)).unwrap_err(),
            CellRejection::Occupied(first)
        );
        assert_eq!(
            world.place(&config, BuildingKind::Mine, Cell::new(10, 0)).unwrap_err(),
            CellRejection::OutOfBounds
        );
        assert_eq!(world.buildings.len(), 1);
    }

    #[test]
    fn removing_a_building_frees_its_cell() {
        let (mut world, config) = world();
        let id = world.place(&config, BuildingKind::Wall, Cell::new(-2, 0)).unwrap();

        let removed = world.remove_building(id).unwrap();
        assert_eq!(removed.cell, Cell::new(-2, 0));
        assert!(world.can_place(Cell::new(-2, 0)));
        assert!(world.remove_building(id).is_none());
    }

    #[test]
    fn closest_building_prefers_first_on_ties() {
        let (mut world, config) = world();
        let west = world.place(&config, BuildingKind::Wall, Cell::new(-1, 0)).unwrap();
        let _east = world.place(&config, BuildingKind::Wall, Cell::new(1, 0)).unwrap();

        let (id, dist) = world.closest_building(Vec3::new(0.0, 0.75, 0.0)).unwrap();
        assert_eq!(id, west);
        assert!((dist - (4.0f32 + 0.0625).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn closest_enemy_range_is_strict() {
        let (mut world, _) = world();
        let origin = Vec3::ZERO;
        world.enemies.insert(enemy_at(Vec3::new(8.0, 0.0, 0.0)));
        assert_eq!(world.closest_enemy_within(origin, 8.0), None);

        let near = world.enemies.insert(enemy_at(Vec3::new(0.0, 0.0, 5.0)));
        world.enemies.insert(enemy_at(Vec3::new(-5.0, 0.0, 0.0)));
        assert_eq!(world.closest_enemy_within(origin, 8.0), Some(near));
    }

    #[test]
    fn main_base_is_flagged() {
        let (mut world, config) = world();
        let base = world
            .place_main_base(&config, BuildingKind::Barracks, Cell::new(0, 0))
            .unwrap();
        world.place(&config, BuildingKind::Wall, Cell::new(0, 1)).unwrap();

        assert_eq!(world.main_base(), Some(base));
        assert!(world.buildings[base].is_main_base);
    }
}
