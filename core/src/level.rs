//! Plain-text level layouts.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Tile};

/// Rectangular tile layout a session is loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Level {
    /// Parses whitespace separated tile codes, one grid row per line.
    ///
    /// At most `rows` lines and `columns` tokens per line are read. Tokens that
    /// are not unsigned integers decode to the corner tile, and cells without a
    /// token keep that same default.
    #[must_use]
    pub fn parse(text: &str, columns: u32, rows: u32) -> Self {
        let mut level = Self::uniform(columns, rows, Tile::CORNER);
        let width = usize::try_from(columns).unwrap_or(0);

        for (row, line) in text.lines().take(rows as usize).enumerate() {
            for (column, token) in line.split_whitespace().take(width).enumerate() {
                let tile = token.parse::<u32>().map_or(Tile::CORNER, Tile::from_code);
                let index = row * width + column;
                if let Some(slot) = level.tiles.get_mut(index) {
                    *slot = tile;
                }
            }
        }

        level
    }

    /// Builds a level where every cell holds the same tile.
    #[must_use]
    pub fn uniform(columns: u32, rows: u32, tile: Tile) -> Self {
        let count = (columns as usize).saturating_mul(rows as usize);
        Self {
            columns,
            rows,
            tiles: vec![tile; count],
        }
    }

    /// Level used when no layout could be read: open ground everywhere.
    #[must_use]
    pub fn fallback(columns: u32, rows: u32) -> Self {
        Self::uniform(columns, rows, Tile::GROUND)
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile stored at the provided cell, if it lies inside the level.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.tiles.get(index).copied()
    }

    /// Iterates over every cell together with its tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }
}
