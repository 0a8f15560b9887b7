//! Mutable tile store shared by every tick source.

use meltdown_core::{CellCoord, Direction, GridError, Level, Tile};

/// Fixed-size row-major grid of tiles.
///
/// Dimensions are set when the grid is built from a level and never change
/// afterwards; only the tile contents are mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub(crate) fn from_level(level: &Level) -> Self {
        Self {
            columns: level.columns(),
            rows: level.rows(),
            tiles: level.tiles().to_vec(),
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the cell, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites the tile at the cell.
    pub fn mutate(&mut self, cell: CellCoord, tile: Tile) -> Result<(), GridError> {
        let out_of_bounds = GridError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
            columns: self.columns,
            rows: self.rows,
        };
        let index = self.index(cell).ok_or(out_of_bounds)?;
        let slot = self.tiles.get_mut(index).ok_or(out_of_bounds)?;
        *slot = tile;
        Ok(())
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterates over every cell together with its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// In-bounds neighbour of the cell in the provided direction.
    #[must_use]
    pub fn step(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.neighbor(direction).filter(|next| self.contains(*next))
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
