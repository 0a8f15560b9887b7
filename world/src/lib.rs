#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Meltdown.
//!
//! The [`World`] owns the tile grid, the fruit vault, every enemy, every
//! in-flight ice trail, and both players. All of it changes only through
//! [`apply`], which makes the order of grid mutations explicit: within a
//! tick, ice trails advance first, then enemies in id order, then the game
//! state settles.

use std::time::Duration;

use meltdown_core::{
    is_player_walkable, CellCoord, Command, Direction, EnemyId, Event, IntentRejection, Level,
    PlayerId, PlayerSet, SessionConfig, Tile, TrailId, TrailKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod enemy;
mod grid;
mod ice;
mod level;
mod navigation;
mod player;
mod state;
mod vault;

pub use grid::TileGrid;
pub use level::{load_level_or_fallback, read_level, LevelError};
pub use state::GameState;
pub use vault::FruitVault;

use enemy::{Enemy, EnemyContext, Quarry};
use ice::IceTrail;
use player::{fruit_points, FruitLedger, Player};

/// Represents the authoritative Meltdown session state.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    level: Level,
    grid: TileGrid,
    vault: FruitVault,
    state: GameState,
    ledger: FruitLedger,
    players: Vec<Player>,
    enemies: Vec<Enemy>,
    trails: Vec<IceTrail>,
    next_trail: u32,
    paused: bool,
    clock: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a session on an open ground level of the configured size.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let level = Level::fallback(config.columns, config.rows);
        Self::with_level(config, level)
    }

    /// Creates a session on the provided level.
    #[must_use]
    pub fn with_level(config: SessionConfig, level: Level) -> Self {
        let grid = TileGrid::from_level(&level);
        let mut world = Self {
            config,
            level: level.clone(),
            grid,
            vault: FruitVault::default(),
            state: GameState::default(),
            ledger: FruitLedger::default(),
            players: Vec::new(),
            enemies: Vec::new(),
            trails: Vec::new(),
            next_trail: 0,
            paused: false,
            clock: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        };
        world.load(level, &mut Vec::new());
        world
    }

    fn load(&mut self, level: Level, out_events: &mut Vec<Event>) {
        self.cancel_trails(out_events);
        self.grid = TileGrid::from_level(&level);
        self.vault.clear();
        self.players.clear();
        self.enemies.clear();

        let mut roster = PlayerSet::empty();
        let mut duplicates = Vec::new();
        for (cell, tile) in self.grid.cells() {
            if let Some(player) = tile.occupant_player() {
                if roster.insert(player) {
                    self.players.push(Player::spawn(player, cell));
                } else {
                    duplicates.push(cell);
                }
            } else if let Some(kind) = tile.spawned_enemy() {
                let id = EnemyId::new(u32::try_from(self.enemies.len()).unwrap_or(u32::MAX));
                self.enemies.push(Enemy::spawn(id, kind, cell));
            }
        }
        for cell in duplicates {
            tracing::warn!(
                column = cell.column(),
                row = cell.row(),
                "duplicate player spawn replaced with ground"
            );
            write_tile(&mut self.grid, cell, Tile::GROUND);
        }
        self.players.sort_by_key(|player| player.id);

        self.ledger = FruitLedger::from_grid(&self.grid);
        self.state = GameState::new(roster);
        self.next_trail = 0;
        self.paused = false;
        self.clock = Duration::ZERO;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.level = level;

        tracing::info!(
            columns = self.grid.columns(),
            rows = self.grid.rows(),
            enemies = self.enemies.len(),
            fruit = self.ledger.remaining(),
            "level loaded"
        );
        out_events.push(Event::LevelLoaded {
            columns: self.grid.columns(),
            rows: self.grid.rows(),
            enemies: self.enemies.len(),
            fruit: self.ledger.remaining(),
        });
    }

    fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        if self.paused == paused {
            return;
        }
        if paused {
            self.cancel_trails(out_events);
        }
        self.paused = paused;
        tracing::info!(paused, "pause toggled");
        out_events.push(Event::PauseChanged { paused });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.paused || self.state.is_terminal() {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.advance_trails(dt, out_events);
        self.advance_enemies(out_events);

        if self.state.is_terminal() {
            self.cancel_trails(out_events);
        }
    }

    fn advance_trails(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let interval = self.config.timing.ice_step();
        let defeated = self.state.defeated();
        let Self {
            trails,
            grid,
            vault,
            ..
        } = self;

        trails.retain_mut(|trail| {
            let active = trail.advance(dt, interval, grid, vault, defeated, out_events);
            if !active {
                out_events.push(Event::IceTrailFinished { trail: trail.id() });
            }
            active
        });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let quarries: Vec<Quarry> = self
            .players
            .iter()
            .map(|player| Quarry {
                player: player.id,
                cell: player.cell,
            })
            .collect();
        let Self {
            enemies,
            grid,
            vault,
            state,
            config,
            rng,
            clock,
            ..
        } = self;

        let mut ctx = EnemyContext {
            grid,
            vault,
            state,
            quarries: &quarries,
            now: *clock,
            timing: &config.timing,
            rng,
            out_events,
        };
        for enemy in enemies.iter_mut() {
            if ctx.state.is_terminal() {
                break;
            }
            enemy.update(&mut ctx);
        }
    }

    fn cancel_trails(&mut self, out_events: &mut Vec<Event>) {
        for trail in self.trails.drain(..) {
            tracing::debug!(trail = trail.id().get(), "ice trail cancelled");
            out_events.push(Event::IceTrailCancelled { trail: trail.id() });
        }
    }

    fn admit(&self, player: PlayerId) -> Result<usize, IntentRejection> {
        if self.paused {
            return Err(IntentRejection::Paused);
        }
        if self.state.is_terminal() {
            return Err(IntentRejection::SessionOver);
        }
        let index = self
            .players
            .iter()
            .position(|body| body.id == player)
            .ok_or(IntentRejection::Absent)?;
        if self.state.is_defeated(player) {
            return Err(IntentRejection::Defeated);
        }
        if !self.players[index].ready(self.clock, self.config.timing.player_cooldown()) {
            return Err(IntentRejection::CoolingDown);
        }
        Ok(index)
    }

    fn admit_or_reject(&self, player: PlayerId, out_events: &mut Vec<Event>) -> Option<usize> {
        match self.admit(player) {
            Ok(index) => Some(index),
            Err(reason) => {
                tracing::trace!(?player, ?reason, "intent rejected");
                out_events.push(Event::IntentRejected { player, reason });
                None
            }
        }
    }

    fn move_player(&mut self, player: PlayerId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(index) = self.admit_or_reject(player, out_events) else {
            return;
        };
        let now = self.clock;
        let defeated = self.state.defeated();

        let body = &mut self.players[index];
        body.mark_acted(now);
        body.facing = direction;

        let Some(next) = self.grid.step(body.cell, direction) else {
            return;
        };
        let Some(tile) = self.grid.get(next) else {
            return;
        };
        if !is_player_walkable(tile, defeated) {
            return;
        }

        let from = body.cell;
        write_tile(&mut self.grid, from, body.under);
        body.cell = next;
        body.under = tile;
        out_events.push(Event::PlayerMoved {
            player,
            from,
            to: next,
        });

        let collected = tile.is_fruit() && self.ledger.collect(tile);
        if collected {
            let points = fruit_points(now);
            body.score = body.score.saturating_add(points);
            body.under = Tile::GROUND;
            tracing::debug!(?player, code = tile.code(), points, "fruit collected");
            out_events.push(Event::FruitCollected {
                player,
                cell: next,
                tile,
                points,
            });
        }
        write_tile(&mut self.grid, next, Tile::player(player));

        if collected && self.ledger.is_exhausted() && self.state.declare_victory(out_events) {
            self.cancel_trails(out_events);
        }
    }

    fn player_act(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let Some(index) = self.admit_or_reject(player, out_events) else {
            return;
        };
        let body = &mut self.players[index];
        body.mark_acted(self.clock);
        let (origin, direction) = (body.cell, body.facing);

        let ahead_is_ice = self
            .grid
            .step(origin, direction)
            .and_then(|cell| self.grid.get(cell))
            .is_some_and(Tile::is_ice);
        let kind = if ahead_is_ice {
            TrailKind::Break
        } else {
            TrailKind::Form
        };
        self.start_trail(kind, origin, direction, out_events);
    }

    fn start_trail(
        &mut self,
        kind: TrailKind,
        origin: CellCoord,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        if self.paused || self.state.is_terminal() {
            tracing::debug!(?kind, "ice trail ignored while the session is frozen");
            return;
        }
        if !self.grid.contains(origin) {
            tracing::warn!(
                column = origin.column(),
                row = origin.row(),
                "ice trail origin lies outside the grid"
            );
            return;
        }

        let id = TrailId::new(self.next_trail);
        self.next_trail = self.next_trail.wrapping_add(1);
        out_events.push(Event::IceTrailStarted {
            trail: id,
            kind,
            origin,
            direction,
        });

        let mut trail = IceTrail::new(id, kind, origin, direction);
        if trail.step(
            &mut self.grid,
            &mut self.vault,
            self.state.defeated(),
            out_events,
        ) {
            self.trails.push(trail);
        } else {
            out_events.push(Event::IceTrailFinished { trail: id });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

fn write_tile(grid: &mut TileGrid, cell: CellCoord, tile: Tile) {
    if let Err(error) = grid.mutate(cell, tile) {
        tracing::warn!(%error, "tile write skipped");
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level } => world.load(level, out_events),
        Command::ResetLevel => {
            let level = world.level.clone();
            world.load(level, out_events);
        }
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::MovePlayer { player, direction } => {
            world.move_player(player, direction, out_events);
        }
        Command::PlayerAct { player } => world.player_act(player, out_events),
        Command::FormIce { origin, direction } => {
            world.start_trail(TrailKind::Form, origin, direction, out_events);
        }
        Command::BreakIce { origin, direction } => {
            world.start_trail(TrailKind::Break, origin, direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{FruitVault, GameState, TileGrid, World};
    use meltdown_core::{CellCoord, Direction, EnemyId, EnemyKind, PlayerId, SessionConfig};

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Provides read-only access to the tiles hidden beneath overlays.
    #[must_use]
    pub fn fruit_vault(world: &World) -> &FruitVault {
        &world.vault
    }

    /// Copy of the collision and terminal flags.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Reports whether every tick source is frozen by an explicit pause.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Simulated time since the level was loaded.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Time left on the display clock.
    #[must_use]
    pub fn time_remaining(world: &World) -> Duration {
        world
            .config
            .timing
            .level_duration()
            .saturating_sub(world.clock)
    }

    /// Number of ice trails still growing.
    #[must_use]
    pub fn active_trails(world: &World) -> usize {
        world.trails.len()
    }

    /// Fruit the players still have to collect.
    #[must_use]
    pub fn fruit_remaining(world: &World) -> u32 {
        world.ledger.remaining()
    }

    /// Fruit tiles that physically exist: on the grid, under overlays, or
    /// beneath a player. Always equal to [`fruit_remaining`].
    #[must_use]
    pub fn fruit_in_play(world: &World) -> usize {
        let on_grid = world
            .grid
            .tiles()
            .iter()
            .filter(|tile| tile.fruit_set().is_some())
            .count();
        let under_players = world
            .players
            .iter()
            .filter(|player| player.under.fruit_set().is_some())
            .count();
        on_grid + world.vault.hidden_fruit_count() + under_players
    }

    /// Captures a read-only view of the enemies in id order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id(),
                kind: enemy.kind(),
                cell: enemy.cell(),
                facing: enemy.facing(),
                animation_frame: enemy.animation_frame(),
                breaking: enemy.breaking_target(),
            })
            .collect();
        EnemyView { snapshots }
    }

    /// Captures a read-only view of the players present in the level.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        let snapshots = world
            .players
            .iter()
            .map(|player| PlayerSnapshot {
                id: player.id,
                cell: player.cell,
                facing: player.facing,
                score: player.score,
                defeated: world.state.is_defeated(player.id),
            })
            .collect();
        PlayerView { snapshots }
    }

    /// Read-only snapshot describing all enemies.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured enemy snapshots in id order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single enemy.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnemySnapshot {
        /// Unique identifier assigned to the enemy.
        pub id: EnemyId,
        /// Behavioural variant.
        pub kind: EnemyKind,
        /// Grid cell currently occupied by the enemy.
        pub cell: CellCoord,
        /// Direction the enemy faces.
        pub facing: Direction,
        /// Animation counter, advanced on every movement tick.
        pub animation_frame: u32,
        /// Ice tile being dissolved by an ice breaker.
        pub breaking: Option<CellCoord>,
    }

    /// Read-only snapshot describing the players.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PlayerView {
        snapshots: Vec<PlayerSnapshot>,
    }

    impl PlayerView {
        /// Iterator over the captured player snapshots in player order.
        pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
            self.snapshots.iter()
        }

        /// Snapshot of the given player, if it is present in the level.
        #[must_use]
        pub fn get(&self, player: PlayerId) -> Option<&PlayerSnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == player)
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<PlayerSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single player.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Which player this is.
        pub id: PlayerId,
        /// Grid cell currently occupied by the player.
        pub cell: CellCoord,
        /// Direction the player faces.
        pub facing: Direction,
        /// Points scored so far.
        pub score: u32,
        /// Whether an enemy defeated the player.
        pub defeated: bool,
    }
}
