use crate::error::ConfigError;
use crate::grid::within_half_extent;
use serde::{Deserialize, Serialize};
use sim_core::Micros;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    Wall,
    Turret,
    Mine,
    Barracks,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 4] = [
        BuildingKind::Wall,
        BuildingKind::Turret,
        BuildingKind::Mine,
        BuildingKind::Barracks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildingKind::Wall => "wall",
            BuildingKind::Turret => "turret",
            BuildingKind::Mine => "mine",
            BuildingKind::Barracks => "barracks",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown building type: {s}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Gold,
    Wood,
    Stone,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Gold => "gold",
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
        }
    }
}

/// A price (or stockpile delta) in all three resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub gold: u32,
    pub wood: u32,
    pub stone: u32,
}

impl Cost {
    pub const fn new(gold: u32, wood: u32, stone: u32) -> Self {
        Self { gold, wood, stone }
    }

    /// Linear scaling, used for upgrade quotes.
    pub fn times(self, factor: u32) -> Self {
        Self {
            gold: self.gold.saturating_mul(factor),
            wood: self.wood.saturating_mul(factor),
            stone: self.stone.saturating_mul(factor),
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gold / {} wood / {} stone", self.gold, self.wood, self.stone)
    }
}

/// Base stats of one building type, before any upgrades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub name: String,
    pub cost: Cost,
    pub hp: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub range: f32,
    #[serde(default)]
    pub produces: Option<ResourceKind>,
    #[serde(default)]
    pub rate: u32,
    /// Visual height; the building's centre sits at half of it.
    pub height: f32,
}

/// Building stats as read from a config file. Missing entries and missing
/// fields fall back to the default for that building type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BuildingTableOverrides")]
pub struct BuildingTable {
    pub wall: BuildingSpec,
    pub turret: BuildingSpec,
    pub mine: BuildingSpec,
    pub barracks: BuildingSpec,
}

impl Default for BuildingTable {
    fn default() -> Self {
        Self {
            wall: BuildingSpec {
                name: "Wall".into(),
                cost: Cost::new(50, 30, 0),
                hp: 200,
                damage: 0,
                range: 0.0,
                produces: None,
                rate: 0,
                height: 1.5,
            },
            turret: BuildingSpec {
                name: "Turret".into(),
                cost: Cost::new(100, 50, 30),
                hp: 150,
                damage: 10,
                range: 8.0,
                produces: None,
                rate: 0,
                height: 2.0,
            },
            mine: BuildingSpec {
                name: "Gold Mine".into(),
                cost: Cost::new(150, 100, 0),
                hp: 100,
                damage: 0,
                range: 0.0,
                produces: Some(ResourceKind::Gold),
                rate: 5,
                height: 1.2,
            },
            barracks: BuildingSpec {
                name: "Barracks".into(),
                cost: Cost::new(200, 150, 100),
                hp: 300,
                damage: 0,
                range: 0.0,
                produces: None,
                rate: 0,
                height: 2.5,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CostOverrides {
    gold: Option<u32>,
    wood: Option<u32>,
    stone: Option<u32>,
}

impl CostOverrides {
    fn apply(self, base: Cost) -> Cost {
        Cost {
            gold: self.gold.unwrap_or(base.gold),
            wood: self.wood.unwrap_or(base.wood),
            stone: self.stone.unwrap_or(base.stone),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SpecOverrides {
    name: Option<String>,
    cost: Option<CostOverrides>,
    hp: Option<i32>,
    damage: Option<i32>,
    range: Option<f32>,
    produces: Option<Option<ResourceKind>>,
    rate: Option<u32>,
    height: Option<f32>,
}

impl SpecOverrides {
    fn apply(self, base: BuildingSpec) -> BuildingSpec {
        BuildingSpec {
            name: self.name.unwrap_or(base.name),
            cost: self.cost.map_or(base.cost, |cost| cost.apply(base.cost)),
            hp: self.hp.unwrap_or(base.hp),
            damage: self.damage.unwrap_or(base.damage),
            range: self.range.unwrap_or(base.range),
            produces: self.produces.unwrap_or(base.produces),
            rate: self.rate.unwrap_or(base.rate),
            height: self.height.unwrap_or(base.height),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BuildingTableOverrides {
    wall: SpecOverrides,
    turret: SpecOverrides,
    mine: SpecOverrides,
    barracks: SpecOverrides,
}

impl From<BuildingTableOverrides> for BuildingTable {
    fn from(overrides: BuildingTableOverrides) -> Self {
        let base = BuildingTable::default();
        Self {
            wall: overrides.wall.apply(base.wall),
            turret: overrides.turret.apply(base.turret),
            mine: overrides.mine.apply(base.mine),
            barracks: overrides.barracks.apply(base.barracks),
        }
    }
}

/// Per-wave enemy stat formula: `base + per_wave * wave`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyScaling {
    pub hp_base: i32,
    pub hp_per_wave: i32,
    pub speed_base: f32,
    pub speed_per_wave: f32,
    pub damage_base: i32,
    pub damage_per_wave: i32,
    pub quota_base: u32,
    pub quota_per_wave: u32,
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self {
            hp_base: 50,
            hp_per_wave: 10,
            speed_base: 0.02,
            speed_per_wave: 0.005,
            damage_base: 5,
            damage_per_wave: 2,
            quota_base: 3,
            quota_per_wave: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    // Grid
    pub grid_size: i32,
    pub cell_size: f32,
    pub main_base_kind: BuildingKind,
    pub main_base_cell: (i32, i32),

    // Timing
    /// Resolution of the host clock; scheduled tasks fire on the first tick
    /// at or after their deadline.
    pub tick_hz: u32,
    pub combat_tick_ms: u32,
    pub production_tick_ms: u32,
    pub spawn_interval_ms: u32,
    pub wave_timer_ticks: u32,

    // Economy
    pub starting_resources: Cost,
    pub kill_reward_gold: u32,

    // Enemies
    pub enemy: EnemyScaling,
    /// Spawn ring radius as a fraction of the grid's world width.
    pub spawn_radius_fraction: f32,
    pub enemy_spawn_height: f32,
    pub contact_threshold: f32,

    // Projectiles
    pub projectile_speed: f32,
    pub projectile_lifetime_ticks: u32,
    pub hit_radius: f32,

    // Particles
    pub particles_per_burst: u32,
    pub particle_lifetime_ticks: u32,
    pub particle_gravity: f32,
    pub particle_shrink: f32,

    pub buildings: BuildingTable,
}

impl DefenseConfig {
    pub fn spec(&self, kind: BuildingKind) -> &BuildingSpec {
        match kind {
            BuildingKind::Wall => &self.buildings.wall,
            BuildingKind::Turret => &self.buildings.turret,
            BuildingKind::Mine => &self.buildings.mine,
            BuildingKind::Barracks => &self.buildings.barracks,
        }
    }

    pub fn combat_period(&self) -> Micros {
        Micros::from_millis(self.combat_tick_ms.max(1))
    }

    pub fn production_period(&self) -> Micros {
        Micros::from_millis(self.production_tick_ms.max(1))
    }

    pub fn spawn_interval(&self) -> Micros {
        Micros::from_millis(self.spawn_interval_ms)
    }

    pub fn spawn_radius(&self) -> f32 {
        self.grid_size as f32 * self.cell_size * self.spawn_radius_fraction
    }

    /// Enemies released by wave `wave`.
    pub fn wave_quota(&self, wave: u32) -> u32 {
        self.enemy.quota_base + self.enemy.quota_per_wave * wave
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 {
            return Err(ConfigError::Invalid("tick_hz must be positive"));
        }
        if self.combat_tick_ms == 0 || self.production_tick_ms == 0 {
            return Err(ConfigError::Invalid("tick periods must be positive"));
        }
        if self.grid_size < 2 {
            return Err(ConfigError::Invalid("grid_size must be at least 2"));
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid("cell_size must be positive"));
        }
        if self.projectile_lifetime_ticks == 0 {
            return Err(ConfigError::Invalid("projectile lifetime must be positive"));
        }
        let (x, z) = self.main_base_cell;
        if !within_half_extent(x, self.grid_size) || !within_half_extent(z, self.grid_size) {
            return Err(ConfigError::Invalid("main base cell is outside the grid"));
        }
        Ok(())
    }
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 2.0,
            main_base_kind: BuildingKind::Barracks,
            main_base_cell: (0, 0),

            tick_hz: 20,
            combat_tick_ms: 1_000,
            production_tick_ms: 2_000,
            spawn_interval_ms: 500,
            wave_timer_ticks: 30,

            starting_resources: Cost::new(500, 300, 200),
            kill_reward_gold: 10,

            enemy: EnemyScaling::default(),
            spawn_radius_fraction: 0.45,
            enemy_spawn_height: 0.75,
            contact_threshold: 1.0,

            projectile_speed: 0.5,
            projectile_lifetime_ticks: 100,
            hit_radius: 1.0,

            particles_per_burst: 20,
            particle_lifetime_ticks: 30,
            particle_gravity: 0.01,
            particle_shrink: 0.95,

            buildings: BuildingTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_kind_parses_case_insensitively() {
        assert_eq!("Turret".parse::<BuildingKind>(), Ok(BuildingKind::Turret));
        assert_eq!("mine".parse::<BuildingKind>(), Ok(BuildingKind::Mine));
        assert!("tower".parse::<BuildingKind>().is_err());
    }

    #[test]
    fn default_table_matches_published_values() {
        let config = DefenseConfig::default();
        assert_eq!(config.spec(BuildingKind::Turret).cost, Cost::new(100, 50, 30));
        assert_eq!(config.spec(BuildingKind::Wall).hp, 200);
        assert_eq!(
            config.spec(BuildingKind::Mine).produces,
            Some(ResourceKind::Gold)
        );
        assert_eq!(config.spec(BuildingKind::Barracks).cost, Cost::new(200, 150, 100));
        assert!((config.spawn_radius() - 18.0).abs() < 1e-6);
        assert_eq!(config.wave_quota(2), 7);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let config = DefenseConfig::from_json(r#"{ "grid_size": 30, "kill_reward_gold": 25 }"#)
            .unwrap();
        assert_eq!(config.grid_size, 30);
        assert_eq!(config.kill_reward_gold, 25);
        assert_eq!(config.combat_tick_ms, 1_000);
    }

    #[test]
    fn building_overrides_merge_onto_their_own_defaults() {
        let config = DefenseConfig::from_json(
            r#"{ "buildings": {
                "turret": { "damage": 20 },
                "mine": { "cost": { "gold": 90 }, "produces": "wood" }
            } }"#,
        )
        .unwrap();

        let turret = config.spec(BuildingKind::Turret);
        assert_eq!(turret.damage, 20);
        assert_eq!(turret.hp, 150);
        assert_eq!(turret.cost, Cost::new(100, 50, 30));
        assert_eq!(turret.name, "Turret");

        let mine = config.spec(BuildingKind::Mine);
        assert_eq!(mine.cost, Cost::new(90, 100, 0));
        assert_eq!(mine.produces, Some(ResourceKind::Wood));
        assert_eq!(mine.rate, 5);

        assert_eq!(config.buildings.wall, BuildingTable::default().wall);
        assert!(DefenseConfig::from_json(r#"{ "buildings": { "turret": { "dmg": 1 } } }"#).is_err());
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let config = DefenseConfig {
            tick_hz: 0,
            ..DefenseConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DefenseConfig {
            main_base_cell: (10, 0),
            ..DefenseConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(DefenseConfig::from_json("{ not json").is_err());
        assert!(DefenseConfig::default().validate().is_ok());
    }
}
