use crate::config::Cost;
use crate::grid::Cell;
use crate::world::BuildingId;
use std::fmt;

/// Error when loading or validating a [`DefenseConfig`](crate::DefenseConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "failed to parse config: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The stockpile cannot cover a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientResources {
    pub required: Cost,
    pub available: Cost,
}

impl fmt::Display for InsufficientResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "not enough resources: need {}, have {}",
            self.required, self.available
        )
    }
}

impl std::error::Error for InsufficientResources {}

/// Why a cell cannot take a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRejection {
    OutOfBounds,
    Occupied(BuildingId),
}

/// Error from the placement intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Cell is out of bounds or already occupied.
    InvalidPlacement { cell: Cell, reason: CellRejection },
    InsufficientResources(InsufficientResources),
    /// `confirm_placement` without a preceding `place_building`.
    NoPendingPlacement,
    GameOver,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::InvalidPlacement {
                cell,
                reason: CellRejection::OutOfBounds,
            } => write!(f, "cannot place here: {cell} is outside the grid"),
            PlacementError::InvalidPlacement {
                cell,
                reason: CellRejection::Occupied(_),
            } => write!(f, "cannot place here: {cell} is occupied"),
            PlacementError::InsufficientResources(e) => e.fmt(f),
            PlacementError::NoPendingPlacement => write!(f, "no building selected for placement"),
            PlacementError::GameOver => write!(f, "game over"),
        }
    }
}

impl std::error::Error for PlacementError {}

impl From<InsufficientResources> for PlacementError {
    fn from(e: InsufficientResources) -> Self {
        PlacementError::InsufficientResources(e)
    }
}

/// Error from the upgrade intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    UnknownBuildingId(BuildingId),
    InsufficientResources(InsufficientResources),
    GameOver,
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeError::UnknownBuildingId(id) => write!(f, "unknown building id {id:?}"),
            UpgradeError::InsufficientResources(e) => e.fmt(f),
            UpgradeError::GameOver => write!(f, "game over"),
        }
    }
}

impl std::error::Error for UpgradeError {}

impl From<InsufficientResources> for UpgradeError {
    fn from(e: InsufficientResources) -> Self {
        UpgradeError::InsufficientResources(e)
    }
}

/// Error from an intent queued as a [`DefenseAction`](crate::DefenseAction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    Placement(PlacementError),
    Upgrade(UpgradeError),
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentError::Placement(e) => e.fmt(f),
            IntentError::Upgrade(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for IntentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntentError::Placement(e) => Some(e),
            IntentError::Upgrade(e) => Some(e),
        }
    }
}

impl From<PlacementError> for IntentError {
    fn from(e: PlacementError) -> Self {
        IntentError::Placement(e)
    }
}

impl From<UpgradeError> for IntentError {
    fn from(e: UpgradeError) -> Self {
        IntentError::Upgrade(e)
    }
}
