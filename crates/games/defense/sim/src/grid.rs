use crate::error::CellRejection;
use crate::world::BuildingId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete grid coordinate. The grid is centred on the origin, so both axes
/// run from `-(size-1)/2` to `(size-1)/2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// `2 * |coord| < size`, widened so any `i32` coordinate is safe.
#[inline]
pub(crate) fn within_half_extent(coord: i32, size: i32) -> bool {
    2 * i64::from(coord).abs() < i64::from(size)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Empty,
    Building(BuildingId),
}

impl CellState {
    pub fn is_blocked(self) -> bool {
        !matches!(self, CellState::Empty)
    }
}

/// Occupancy map. Holds building ids only; the buildings themselves live in
/// the world arena.
#[derive(Clone, Debug)]
pub struct Grid {
    size: i32,
    cell_size: f32,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(size: i32, cell_size: f32) -> Self {
        let size = size.max(1);
        Self {
            size,
            cell_size,
            cells: vec![CellState::Empty; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// `|x| < size/2 && |z| < size/2`, evaluated without rounding `size/2`.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        within_half_extent(cell.x, self.size) && within_half_extent(cell.z, self.size)
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let offset = (self.size - 1) / 2;
        let col = (cell.x + offset) as usize;
        let row = (cell.z + offset) as usize;
        Some(row * self.size as usize + col)
    }

    pub fn get(&self, cell: Cell) -> CellState {
        self.idx(cell)
            .and_then(|idx| self.cells.get(idx).copied())
            .unwrap_or_default()
    }

    pub fn check(&self, cell: Cell) -> Result<(), CellRejection> {
        match self.idx(cell).and_then(|idx| self.cells.get(idx).copied()) {
            None => Err(CellRejection::OutOfBounds),
            Some(CellState::Building(id)) => Err(CellRejection::Occupied(id)),
            Some(CellState::Empty) => Ok(()),
        }
    }

    pub fn can_place(&self, cell: Cell) -> bool {
        self.check(cell).is_ok()
    }

    pub fn find_building_at(&self, cell: Cell) -> Option<BuildingId> {
        match self.get(cell) {
            CellState::Building(id) => Some(id),
            CellState::Empty => None,
        }
    }

    pub(crate) fn occupy(&mut self, cell: Cell, id: BuildingId) -> Result<(), CellRejection> {
        self.check(cell)?;
        if let Some(idx) = self.idx(cell) {
            self.cells[idx] = CellState::Building(id);
        }
        Ok(())
    }

    /// Frees `cell` if it is held by `id`.
    pub(crate) fn release(&mut self, cell: Cell, id: BuildingId) {
        if let Some(idx) = self.idx(cell) {
            if self.cells[idx] == CellState::Building(id) {
                self.cells[idx] = CellState::Empty;
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_blocked()).count()
    }

    /// World-space centre of a structure of the given height standing on `cell`.
    pub fn cell_to_world(&self, cell: Cell, height: f32) -> Vec3 {
        Vec3::new(
            cell.x as f32 * self.cell_size,
            height / 2.0,
            cell.z as f32 * self.cell_size,
        )
    }

    /// Nearest cell to a world position, as a picking helper for callers.
    pub fn world_to_cell(&self, position: Vec3) -> Cell {
        Cell::new(
            (position.x / self.cell_size).round() as i32,
            (position.z / self.cell_size).round() as i32,
        )
    }
}
