//! Bookkeeping for tiles hidden beneath ice and enemy footprints.

use std::collections::BTreeMap;

use meltdown_core::{CellCoord, PlayerSet, Tile};

/// Remembers what an overlay covered so the tile can be put back later.
///
/// Only fruit and defeated player footprints are worth remembering; every
/// other tile is restored as plain ground.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FruitVault {
    records: BTreeMap<CellCoord, Tile>,
}

impl FruitVault {
    /// Records the tile covered at `cell` when it is fruit or a defeated player.
    ///
    /// Returns `true` when a record was written. A new record replaces any
    /// previous one for the same cell.
    pub fn store(&mut self, cell: CellCoord, tile: Tile, defeated: PlayerSet) -> bool {
        if !(tile.is_fruit() || tile.is_defeated_player(defeated)) {
            return false;
        }
        let _ = self.records.insert(cell, tile);
        true
    }

    /// Removes and returns the tile recorded at `cell`, or ground if none was.
    pub fn restore(&mut self, cell: CellCoord) -> Tile {
        self.records.remove(&cell).unwrap_or(Tile::GROUND)
    }

    /// Tile recorded at `cell` without removing it.
    #[must_use]
    pub fn peek(&self, cell: CellCoord) -> Option<Tile> {
        self.records.get(&cell).copied()
    }

    /// Number of fruit tiles currently hidden.
    #[must_use]
    pub fn hidden_fruit_count(&self) -> usize {
        self.records
            .values()
            .filter(|tile| tile.fruit_set().is_some())
            .count()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
