//! Ice trails that freeze or dissolve a straight line of tiles over time.

use std::time::Duration;

use meltdown_core::{is_ice_formable, CellCoord, Direction, Event, PlayerSet, Tile, TrailId, TrailKind};

use crate::{grid::TileGrid, vault::FruitVault};

/// A trail growing one tile per step away from its origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct IceTrail {
    id: TrailId,
    kind: TrailKind,
    direction: Direction,
    head: CellCoord,
    accumulator: Duration,
}

impl IceTrail {
    pub(crate) fn new(id: TrailId, kind: TrailKind, origin: CellCoord, direction: Direction) -> Self {
        Self {
            id,
            kind,
            direction,
            head: origin,
            accumulator: Duration::ZERO,
        }
    }

    pub(crate) fn id(&self) -> TrailId {
        self.id
    }

    /// Accrues `dt` and performs every step that became due.
    ///
    /// Returns `false` once the trail reached a blocking tile or the edge.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        interval: Duration,
        grid: &mut TileGrid,
        vault: &mut FruitVault,
        defeated: PlayerSet,
        out_events: &mut Vec<Event>,
    ) -> bool {
        self.accumulator = self.accumulator.saturating_add(dt);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            if !self.step(grid, vault, defeated, out_events) {
                return false;
            }
            if interval.is_zero() {
                break;
            }
        }
        true
    }

    /// Converts the next tile beyond the head.
    ///
    /// Returns `false` when nothing was converted and the trail is done.
    pub(crate) fn step(
        &mut self,
        grid: &mut TileGrid,
        vault: &mut FruitVault,
        defeated: PlayerSet,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(next) = grid.step(self.head, self.direction) else {
            return false;
        };
        let Some(tile) = grid.get(next) else {
            return false;
        };

        let replacement = match self.kind {
            TrailKind::Form if is_ice_formable(tile, defeated) => {
                let _ = vault.store(next, tile, defeated);
                Tile::ICE
            }
            TrailKind::Break if tile.is_ice() => vault.restore(next),
            TrailKind::Form | TrailKind::Break => return false,
        };

        if let Err(error) = grid.mutate(next, replacement) {
            tracing::warn!(%error, trail = self.id.get(), "ice trail stopped");
            return false;
        }
        self.head = next;

        out_events.push(match self.kind {
            TrailKind::Form => Event::IceFormed {
                trail: self.id,
                cell: next,
            },
            TrailKind::Break => Event::IceBroken {
                trail: self.id,
                cell: next,
                revealed: replacement,
            },
        });
        true
    }
}
