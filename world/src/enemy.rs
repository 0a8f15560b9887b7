//! Enemy behaviours: wall following, path pursuit, and ice breaking.

use std::{collections::VecDeque, time::Duration};

use meltdown_core::{
    is_enemy_passable, CellCoord, Direction, EnemyId, EnemyKind, Event, PlayerId, Tile, Timing,
};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::{grid::TileGrid, navigation::shortest_path, state::GameState, vault::FruitVault};

/// Position of a player that enemies may chase or catch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Quarry {
    pub(crate) player: PlayerId,
    pub(crate) cell: CellCoord,
}

/// Everything an enemy update may read or mutate.
pub(crate) struct EnemyContext<'a> {
    pub(crate) grid: &'a mut TileGrid,
    pub(crate) vault: &'a mut FruitVault,
    pub(crate) state: &'a mut GameState,
    pub(crate) quarries: &'a [Quarry],
    pub(crate) now: Duration,
    pub(crate) timing: &'a Timing,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) out_events: &'a mut Vec<Event>,
}

/// Progress of an ice breaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BreakerState {
    Chasing,
    Breaking {
        target: CellCoord,
        started_at: Duration,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Brain {
    Monster,
    Halo {
        path: VecDeque<CellCoord>,
        last_path_at: Duration,
    },
    IceBreaker {
        state: BreakerState,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Body {
    id: EnemyId,
    cell: CellCoord,
    facing: Direction,
    animation_frame: u32,
    last_move_at: Duration,
}

impl Body {
    fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        now.saturating_sub(self.last_move_at) >= cooldown
    }

    fn mark_moved(&mut self, now: Duration) {
        self.last_move_at = now;
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }
}

/// A single enemy on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Enemy {
    body: Body,
    brain: Brain,
}

impl Enemy {
    /// Spawns an enemy at the start of a session.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, cell: CellCoord) -> Self {
        let (facing, brain) = match kind {
            EnemyKind::Monster => (Direction::South, Brain::Monster),
            EnemyKind::Halo => (
                Direction::East,
                Brain::Halo {
                    path: VecDeque::new(),
                    last_path_at: Duration::ZERO,
                },
            ),
            EnemyKind::IceBreaker => (
                Direction::East,
                Brain::IceBreaker {
                    state: BreakerState::Chasing,
                },
            ),
        };
        Self {
            body: Body {
                id,
                cell,
                facing,
                animation_frame: 0,
                last_move_at: Duration::ZERO,
            },
            brain,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.body.id
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        match self.brain {
            Brain::Monster => EnemyKind::Monster,
            Brain::Halo { .. } => EnemyKind::Halo,
            Brain::IceBreaker { .. } => EnemyKind::IceBreaker,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.body.cell
    }

    pub(crate) fn facing(&self) -> Direction {
        self.body.facing
    }

    pub(crate) fn animation_frame(&self) -> u32 {
        self.body.animation_frame
    }

    /// Ice tile currently being dissolved, if any.
    pub(crate) fn breaking_target(&self) -> Option<CellCoord> {
        match self.brain {
            Brain::IceBreaker {
                state: BreakerState::Breaking { target, .. },
            } => Some(target),
            _ => None,
        }
    }

    /// Advances the enemy by one scheduler tick.
    ///
    /// The previous cell is restored before the move, collisions are resolved
    /// at the new cell, and only then is the footprint stamped, so whatever the
    /// enemy walks over is remembered by the vault.
    pub(crate) fn update(&mut self, ctx: &mut EnemyContext<'_>) {
        let destination = match &mut self.brain {
            Brain::Monster => monster_step(&mut self.body, ctx),
            Brain::Halo { path, last_path_at } => halo_step(&mut self.body, path, last_path_at, ctx),
            Brain::IceBreaker { state } => breaker_step(&mut self.body, state, ctx),
        };

        let Some(to) = destination else {
            self.resolve_collisions(ctx);
            return;
        };

        let from = self.body.cell;
        let revealed = ctx.vault.restore(from);
        write(ctx.grid, from, revealed);
        if let Some(direction) = from.direction_to(to) {
            self.body.facing = direction;
        }
        self.body.cell = to;
        ctx.out_events.push(Event::EnemyMoved {
            enemy: self.body.id,
            from,
            to,
        });

        self.resolve_collisions(ctx);

        if let Some(covered) = ctx.grid.get(to) {
            let _ = ctx.vault.store(to, covered, ctx.state.defeated());
        }
        write(ctx.grid, to, Tile::enemy(self.kind()));
    }

    fn catches(&self, cell: CellCoord) -> bool {
        match self.brain {
            Brain::Halo { .. } => self.body.cell.manhattan_distance(cell) <= 1,
            Brain::Monster | Brain::IceBreaker { .. } => self.body.cell == cell,
        }
    }

    fn resolve_collisions(&self, ctx: &mut EnemyContext<'_>) {
        for quarry in ctx.quarries {
            if ctx.state.is_defeated(quarry.player) || !self.catches(quarry.cell) {
                continue;
            }
            if ctx.state.flag_collision(quarry.player) {
                tracing::debug!(enemy = self.body.id.get(), player = ?quarry.player, "player caught");
                ctx.out_events.push(Event::PlayerCollided {
                    player: quarry.player,
                    enemy: self.body.id,
                });
            }
        }
        ctx.state.check_game_over(ctx.out_events);
    }
}

/// Closest live player by Manhattan distance; ties go to the earlier player.
pub(crate) fn closest_player(
    from: CellCoord,
    quarries: &[Quarry],
    state: &GameState,
) -> Option<Quarry> {
    let mut best: Option<(u32, Quarry)> = None;
    for quarry in quarries {
        if state.is_defeated(quarry.player) {
            continue;
        }
        let distance = from.manhattan_distance(quarry.cell);
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, *quarry));
        }
    }
    best.map(|(_, quarry)| quarry)
}

fn passable(grid: &TileGrid, cell: CellCoord) -> bool {
    grid.get(cell).is_some_and(is_enemy_passable)
}

fn write(grid: &mut TileGrid, cell: CellCoord, tile: Tile) {
    if let Err(error) = grid.mutate(cell, tile) {
        tracing::warn!(%error, "enemy footprint skipped");
    }
}

fn monster_step(body: &mut Body, ctx: &mut EnemyContext<'_>) -> Option<CellCoord> {
    if !body.ready(ctx.now, ctx.timing.enemy_step()) {
        return None;
    }
    body.mark_moved(ctx.now);

    let grid = &*ctx.grid;
    let ahead = grid
        .step(body.cell, body.facing)
        .filter(|next| passable(grid, *next));
    if ahead.is_none() {
        body.facing = body.facing.clockwise();
    }
    ahead
}

fn halo_step(
    body: &mut Body,
    path: &mut VecDeque<CellCoord>,
    last_path_at: &mut Duration,
    ctx: &mut EnemyContext<'_>,
) -> Option<CellCoord> {
    let target = closest_player(body.cell, ctx.quarries, ctx.state)?;
    if !body.ready(ctx.now, ctx.timing.enemy_step()) {
        return None;
    }

    let stale = ctx.now.saturating_sub(*last_path_at) > ctx.timing.path_staleness();
    if path.is_empty() || stale {
        let grid = &*ctx.grid;
        *path = shortest_path(grid.columns(), grid.rows(), body.cell, target.cell, |cell| {
            passable(grid, cell)
        })
        .unwrap_or_default();
        *last_path_at = ctx.now;
    }

    let next = match path.front().copied() {
        Some(next) if next.manhattan_distance(body.cell) == 1 && passable(ctx.grid, next) => {
            let _ = path.pop_front();
            Some(next)
        }
        Some(_) => {
            path.clear();
            random_step(body.cell, ctx)
        }
        None => random_step(body.cell, ctx),
    };

    // A failed attempt still waits out the cooldown before planning again.
    match next {
        Some(_) => body.mark_moved(ctx.now),
        None => body.last_move_at = ctx.now,
    }
    next
}

fn random_step(cell: CellCoord, ctx: &mut EnemyContext<'_>) -> Option<CellCoord> {
    let mut directions = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];
    directions.shuffle(&mut *ctx.rng);
    let grid = &*ctx.grid;
    directions
        .into_iter()
        .filter_map(|direction| grid.step(cell, direction))
        .find(|next| passable(grid, *next))
}

fn breaker_step(
    body: &mut Body,
    state: &mut BreakerState,
    ctx: &mut EnemyContext<'_>,
) -> Option<CellCoord> {
    if let BreakerState::Breaking { target, started_at } = *state {
        body.animation_frame = body.animation_frame.wrapping_add(1);
        if ctx.now.saturating_sub(started_at) >= ctx.timing.break_duration() {
            *state = BreakerState::Chasing;
            if ctx.grid.get(target).is_some_and(Tile::is_ice) {
                let revealed = ctx.vault.restore(target);
                write(ctx.grid, target, revealed);
                ctx.out_events.push(Event::EnemyBrokeIce {
                    enemy: body.id,
                    target,
                });
            }
        }
        return None;
    }

    if !body.ready(ctx.now, ctx.timing.enemy_step()) {
        return None;
    }
    let quarry = closest_player(body.cell, ctx.quarries, ctx.state)?;
    body.mark_moved(ctx.now);

    let direction = chase_direction(body.cell, quarry.cell)?;
    body.facing = direction;

    let next = ctx.grid.step(body.cell, direction)?;
    let tile = ctx.grid.get(next)?;
    if tile.is_ice() {
        *state = BreakerState::Breaking {
            target: next,
            started_at: ctx.now,
        };
        ctx.out_events.push(Event::EnemyBreakingStarted {
            enemy: body.id,
            target: next,
        });
        None
    } else if is_enemy_passable(tile) {
        Some(next)
    } else {
        None
    }
}

/// Dominant-axis direction toward `target`; horizontal wins ties.
fn chase_direction(from: CellCoord, target: CellCoord) -> Option<Direction> {
    let column_diff = i64::from(target.column()) - i64::from(from.column());
    let row_diff = i64::from(target.row()) - i64::from(from.row());
    if column_diff == 0 && row_diff == 0 {
        return None;
    }

    let direction = if column_diff.abs() >= row_diff.abs() {
        if column_diff > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if row_diff > 0 {
        Direction::South
    } else {
        Direction::North
    };
    Some(direction)
}
