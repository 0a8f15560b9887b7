//! Player bodies and the phased fruit ledger.

use std::time::Duration;

use meltdown_core::{CellCoord, Direction, FruitSet, PlayerId, Tile};

use crate::grid::TileGrid;

const FRUIT_POINTS: u32 = 100;

/// A player standing on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) id: PlayerId,
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) score: u32,
    /// Tile covered by the player's footprint.
    pub(crate) under: Tile,
    last_action_at: Option<Duration>,
}

impl Player {
    pub(crate) fn spawn(id: PlayerId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            facing: Direction::South,
            score: 0,
            under: Tile::GROUND,
            last_action_at: None,
        }
    }

    /// Reports whether an intent issued at `now` clears the cooldown.
    pub(crate) fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        self.last_action_at
            .map_or(true, |last| now.saturating_sub(last) >= cooldown)
    }

    pub(crate) fn mark_acted(&mut self, now: Duration) {
        self.last_action_at = Some(now);
    }
}

/// Counts of fruit still to be collected, per set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FruitLedger {
    primary: u32,
    secondary: u32,
}

impl FruitLedger {
    pub(crate) fn from_grid(grid: &TileGrid) -> Self {
        let mut ledger = Self::default();
        for (_, tile) in grid.cells() {
            match tile.fruit_set() {
                Some(FruitSet::Primary) => ledger.primary += 1,
                Some(FruitSet::Secondary) => ledger.secondary += 1,
                None => {}
            }
        }
        ledger
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.primary + self.secondary
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Secondary fruit only opens up once every primary fruit is gone.
    pub(crate) fn is_collectable(&self, tile: Tile) -> bool {
        match tile.fruit_set() {
            Some(FruitSet::Primary) => self.primary > 0,
            Some(FruitSet::Secondary) => self.primary == 0 && self.secondary > 0,
            None => false,
        }
    }

    /// Removes the fruit from the ledger. Returns `false` if it was not collectable.
    pub(crate) fn collect(&mut self, tile: Tile) -> bool {
        if !self.is_collectable(tile) {
            return false;
        }
        match tile.fruit_set() {
            Some(FruitSet::Primary) => self.primary -= 1,
            Some(FruitSet::Secondary) => self.secondary -= 1,
            None => return false,
        }
        true
    }
}

/// Points awarded for a fruit collected after `elapsed` of play.
pub(crate) fn fruit_points(elapsed: Duration) -> u32 {
    let minutes = u32::try_from(elapsed.as_secs() / 60).unwrap_or(u32::MAX);
    FRUIT_POINTS.saturating_mul(minutes.max(1))
}
