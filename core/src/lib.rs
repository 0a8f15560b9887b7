#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Meltdown engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Every grid mutation funnels through that single
//! entry point, so enemy ticks, player intents, and in-flight ice trails are
//! strictly serialized against each other.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod config;
mod level;
mod tile;

pub use config::{SessionConfig, Timing};
pub use level::Level;
pub use tile::{
    is_enemy_passable, is_ice_formable, is_player_walkable, FruitSet, Tile, TileKind,
};

/// Number of players in a session.
pub const PLAYER_COUNT: usize = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the session with a freshly loaded level.
    LoadLevel {
        /// Layout to load.
        level: Level,
    },
    /// Restarts the currently loaded level from its initial layout.
    ResetLevel,
    /// Freezes or resumes every tick source at once.
    SetPaused {
        /// Whether the session should be paused.
        paused: bool,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Turns a player toward the direction and steps if the tile is walkable.
    MovePlayer {
        /// Player issuing the intent.
        player: PlayerId,
        /// Direction of travel.
        direction: Direction,
    },
    /// Forms or breaks ice in front of a player depending on the tile ahead.
    PlayerAct {
        /// Player issuing the intent.
        player: PlayerId,
    },
    /// Starts an ice trail that freezes formable tiles beyond the origin.
    FormIce {
        /// Cell the trail grows away from; it is never converted itself.
        origin: CellCoord,
        /// Direction the trail grows in.
        direction: Direction,
    },
    /// Starts a trail that dissolves consecutive ice tiles beyond the origin.
    BreakIce {
        /// Cell the trail grows away from; it is never converted itself.
        origin: CellCoord,
        /// Direction the trail grows in.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a level was (re)loaded and the session restarted.
    LevelLoaded {
        /// Number of tile columns in the grid.
        columns: u32,
        /// Number of tile rows in the grid.
        rows: u32,
        /// Number of enemies spawned from the layout.
        enemies: usize,
        /// Number of fruit tiles in the layout.
        fruit: u32,
    },
    /// Announces that every tick source was paused or resumed.
    PauseChanged {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// Confirms that a player stepped between two cells.
    PlayerMoved {
        /// Player that moved.
        player: PlayerId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// Reports that a player intent was ignored.
    IntentRejected {
        /// Player that issued the intent.
        player: PlayerId,
        /// Reason the intent was ignored.
        reason: IntentRejection,
    },
    /// Confirms that a player collected a fruit.
    FruitCollected {
        /// Player credited with the fruit.
        player: PlayerId,
        /// Cell the fruit occupied.
        cell: CellCoord,
        /// Tile code of the collected fruit.
        tile: Tile,
        /// Points awarded.
        points: u32,
    },
    /// Announces that an ice trail began growing.
    IceTrailStarted {
        /// Identifier of the trail.
        trail: TrailId,
        /// Whether the trail forms or breaks ice.
        kind: TrailKind,
        /// Cell the trail grows away from.
        origin: CellCoord,
        /// Direction the trail grows in.
        direction: Direction,
    },
    /// Confirms that a trail froze a tile.
    IceFormed {
        /// Trail that froze the tile.
        trail: TrailId,
        /// Cell that became ice.
        cell: CellCoord,
    },
    /// Confirms that a trail dissolved an ice tile.
    IceBroken {
        /// Trail that dissolved the tile.
        trail: TrailId,
        /// Cell that stopped being ice.
        cell: CellCoord,
        /// Tile revealed beneath the ice.
        revealed: Tile,
    },
    /// Announces that a trail reached a blocking tile or the grid edge.
    IceTrailFinished {
        /// Trail that stopped.
        trail: TrailId,
    },
    /// Announces that a trail was stopped by a reset, pause, or terminal state.
    IceTrailCancelled {
        /// Trail that was cancelled.
        trail: TrailId,
    },
    /// Confirms that an enemy stepped between two cells.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// Announces that an ice breaker started dissolving an ice tile.
    EnemyBreakingStarted {
        /// Enemy that started breaking.
        enemy: EnemyId,
        /// Ice tile being dissolved.
        target: CellCoord,
    },
    /// Announces that an ice breaker finished dissolving an ice tile.
    EnemyBrokeIce {
        /// Enemy that finished breaking.
        enemy: EnemyId,
        /// Cell that stopped being ice.
        target: CellCoord,
    },
    /// Reports that an enemy caught a player.
    PlayerCollided {
        /// Player that was caught.
        player: PlayerId,
        /// Enemy that caught the player.
        enemy: EnemyId,
    },
    /// Reports that a caught player was defeated.
    PlayerDefeated {
        /// Player that was defeated.
        player: PlayerId,
    },
    /// Announces that every fruit was collected.
    Victory,
    /// Announces that every player was defeated.
    GameOver,
}

/// Reasons the world ignores a player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentRejection {
    /// The session is paused.
    Paused,
    /// The session already reached victory or game over.
    SessionOver,
    /// The level has no spawn marker for the player.
    Absent,
    /// The player has been defeated.
    Defeated,
    /// The player's previous intent is still cooling down.
    CoolingDown,
}

/// Cardinal directions on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Next direction in the clockwise cycle north, east, south, west.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an ice trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrailId(u32);

impl TrailId {
    /// Creates a new trail identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavioural variant of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Pursues the closest player along a breadth-first shortest path.
    Halo,
    /// Chases along the dominant axis and dissolves ice in its way.
    IceBreaker,
    /// Follows walls, turning clockwise whenever blocked.
    Monster,
}

impl EnemyKind {
    /// Subtype digit used by spawn markers and footprints.
    #[must_use]
    pub const fn subtype(self) -> u32 {
        match self {
            Self::Halo => 0,
            Self::IceBreaker => 1,
            Self::Monster => 2,
        }
    }

    /// Variant encoded by a spawn marker subtype.
    #[must_use]
    pub const fn from_subtype(subtype: u32) -> Option<Self> {
        match subtype {
            0 => Some(Self::Halo),
            1 => Some(Self::IceBreaker),
            2 => Some(Self::Monster),
            _ => None,
        }
    }
}

/// Whether an ice trail freezes or dissolves tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailKind {
    /// Freezes formable tiles.
    Form,
    /// Dissolves consecutive ice tiles.
    Break,
}

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// First player, footprint code 40.
    One,
    /// Second player, footprint code 41.
    Two,
}

impl PlayerId {
    /// Every player in enumeration order.
    pub const ALL: [Self; PLAYER_COUNT] = [Self::One, Self::Two];

    /// Zero-based index of the player.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Compact set of players, used for collided and defeated flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSet(u8);

impl PlayerSet {
    /// Set containing no players.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Reports whether the player belongs to the set.
    #[must_use]
    pub const fn contains(self, player: PlayerId) -> bool {
        self.0 & (1 << player.index()) != 0
    }

    /// Adds the player, returning `true` when it was not yet present.
    pub fn insert(&mut self, player: PlayerId) -> bool {
        let newly = !self.contains(player);
        self.0 |= 1 << player.index();
        newly
    }

    /// Set containing every player.
    #[must_use]
    pub const fn full() -> Self {
        Self((1 << PLAYER_COUNT) - 1)
    }

    /// Reports whether every player belongs to the set.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == Self::full().0
    }

    /// Reports whether every member of `other` also belongs to this set.
    #[must_use]
    pub const fn covers(self, other: PlayerSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether the set has no players.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Adjacent cell in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// callers check the upper grid bounds themselves.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => Some(Self::new(self.column, self.row.checked_sub(1)?)),
            Direction::East => Some(Self::new(self.column.checked_add(1)?, self.row)),
            Direction::South => Some(Self::new(self.column, self.row.checked_add(1)?)),
            Direction::West => Some(Self::new(self.column.checked_sub(1)?, self.row)),
        }
    }

    /// Direction of a single orthogonal step from `self` to `to`.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        let column_diff = self.column().abs_diff(to.column());
        let row_diff = self.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > self.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > self.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Errors raised by bounds-checked grid access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The cell lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_stops_at_the_origin_edges() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North), None);
        assert_eq!(corner.neighbor(Direction::West), None);
        assert_eq!(corner.neighbor(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.neighbor(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(origin.direction_to(origin), None);
        assert_eq!(origin.direction_to(CellCoord::new(4, 4)), None);
    }

    #[test]
    fn clockwise_cycle_returns_to_start() {
        let mut direction = Direction::North;
        let mut visited = Vec::new();
        for _ in 0..4 {
            visited.push(direction);
            direction = direction.clockwise();
        }
        assert_eq!(direction, Direction::North);
        assert_eq!(
            visited,
            vec![
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West
            ]
        );
    }

    #[test]
    fn player_set_tracks_membership() {
        let mut set = PlayerSet::empty();
        assert!(set.is_empty());
        assert!(set.insert(PlayerId::Two));
        assert!(!set.insert(PlayerId::Two));
        assert!(set.contains(PlayerId::Two));
        assert!(!set.contains(PlayerId::One));
        assert!(!set.is_full());
        assert!(set.insert(PlayerId::One));
        assert!(set.is_full());
        assert_eq!(set, PlayerSet::full());
    }

    #[test]
    fn covers_checks_subsets() {
        let mut second = PlayerSet::empty();
        let _ = second.insert(PlayerId::Two);

        assert!(PlayerSet::full().covers(second));
        assert!(second.covers(second));
        assert!(!second.covers(PlayerSet::full()));
        assert!(second.covers(PlayerSet::empty()));
    }

    #[test]
    fn grid_error_mentions_dimensions() {
        let error = GridError::OutOfBounds {
            column: 9,
            row: 2,
            columns: 5,
            rows: 5,
        };
        assert_eq!(
            error.to_string(),
            "cell (9, 2) lies outside the 5x5 grid"
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn level_round_trips_through_bincode() {
        assert_round_trip(&Level::parse("6 2 512\n40 30 41", 3, 2));
    }

    #[test]
    fn session_config_round_trips_through_bincode() {
        assert_round_trip(&SessionConfig::default());
    }
}
