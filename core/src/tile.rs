//! Integer tile codec shared by the world, systems, and adapters.
//!
//! Level files and the live grid store every cell as a small integer. The
//! number of decimal digits selects how the code splits into a kind and a
//! subtype: single digit codes carry only a kind, two digit codes carry a kind
//! in the tens place, and three digit codes (fruit) carry the kind in the
//! hundreds place with a two digit subtype.

use serde::{Deserialize, Serialize};

use crate::{EnemyKind, PlayerId, PlayerSet};

/// Broad category a tile code decodes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Decorative corner block.
    Corner,
    /// Solid wall; the subtype selects the wall variant.
    Wall,
    /// Frozen tile produced by ice trails.
    Ice,
    /// Enemy spawn marker or live enemy footprint.
    Enemy,
    /// Player spawn marker or live player footprint.
    Player,
    /// Collectable fruit; the subtype encodes variety and collection set.
    Fruit,
    /// Empty ground.
    Ground,
    /// Decorative structure such as an igloo.
    Structure,
    /// Any kind digit outside the catalog.
    Unknown(u32),
}

impl TileKind {
    /// Numeric kind digit used by the encoding.
    #[must_use]
    pub const fn digit(self) -> u32 {
        match self {
            Self::Corner => 0,
            Self::Wall => 1,
            Self::Ice => 2,
            Self::Enemy => 3,
            Self::Player => 4,
            Self::Fruit => 5,
            Self::Ground => 6,
            Self::Structure => 7,
            Self::Unknown(digit) => digit,
        }
    }

    const fn from_digit(digit: u32) -> Self {
        match digit {
            0 => Self::Corner,
            1 => Self::Wall,
            2 => Self::Ice,
            3 => Self::Enemy,
            4 => Self::Player,
            5 => Self::Fruit,
            6 => Self::Ground,
            7 => Self::Structure,
            other => Self::Unknown(other),
        }
    }
}

/// Collection phase a fruit belongs to.
///
/// Primary fruit must all be gathered before secondary fruit become
/// collectable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitSet {
    /// Fruit whose subtype ends in zero.
    Primary,
    /// Every other fruit.
    Secondary,
}

/// One encoded grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile(u32);

impl Tile {
    /// Empty ground, the default content revealed by restorations.
    pub const GROUND: Self = Self(6);
    /// Ice produced by trails.
    pub const ICE: Self = Self(2);
    /// Decorative corner; also the value of unparsable level tokens.
    pub const CORNER: Self = Self(0);

    /// Wraps a raw tile code.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        Self(code)
    }

    /// Raw integer code stored in the grid.
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Splits the code into its kind and subtype.
    #[must_use]
    pub const fn decode(self) -> (TileKind, u32) {
        let code = self.0;
        if code < 10 {
            (TileKind::from_digit(code), 0)
        } else if code >= 100 {
            (TileKind::from_digit(code / 100), code % 100)
        } else {
            (TileKind::from_digit(code / 10), code % 10)
        }
    }

    /// Builds the canonical code for a kind and subtype.
    ///
    /// Corner, ice, and ground are single digit codes and only accept a zero
    /// subtype. Fruit uses the three digit form. Every other kind uses the two
    /// digit form. Returns `None` when the subtype does not fit.
    #[must_use]
    pub const fn encode(kind: TileKind, subtype: u32) -> Option<Self> {
        let digit = kind.digit();
        match kind {
            TileKind::Corner | TileKind::Ice | TileKind::Ground => {
                if subtype == 0 {
                    Some(Self(digit))
                } else {
                    None
                }
            }
            TileKind::Fruit => {
                if subtype < 100 {
                    Some(Self(digit * 100 + subtype))
                } else {
                    None
                }
            }
            TileKind::Wall
            | TileKind::Enemy
            | TileKind::Player
            | TileKind::Structure
            | TileKind::Unknown(_) => {
                if subtype < 10 && digit > 0 && digit < 10 {
                    Some(Self(digit * 10 + subtype))
                } else {
                    None
                }
            }
        }
    }

    /// Footprint code stamped while the player occupies a tile.
    #[must_use]
    pub const fn player(player: PlayerId) -> Self {
        Self(40 + player.index() as u32)
    }

    /// Footprint code stamped while an enemy occupies a tile.
    #[must_use]
    pub const fn enemy(kind: EnemyKind) -> Self {
        Self(30 + kind.subtype())
    }

    /// Kind component of the code.
    #[must_use]
    pub const fn kind(self) -> TileKind {
        self.decode().0
    }

    /// Subtype component of the code.
    #[must_use]
    pub const fn subtype(self) -> u32 {
        self.decode().1
    }

    /// Reports whether the tile is ice.
    #[must_use]
    pub const fn is_ice(self) -> bool {
        matches!(self.kind(), TileKind::Ice)
    }

    /// Reports whether the tile is empty ground.
    #[must_use]
    pub const fn is_ground(self) -> bool {
        matches!(self.kind(), TileKind::Ground)
    }

    /// Reports whether the tile holds fruit.
    #[must_use]
    pub const fn is_fruit(self) -> bool {
        matches!(self.kind(), TileKind::Fruit)
    }

    /// Collection set of a fruit tile.
    ///
    /// Fruit whose set digit is neither 0 nor 1 is scenery: never counted and
    /// never collected.
    #[must_use]
    pub const fn fruit_set(self) -> Option<FruitSet> {
        match self.decode() {
            (TileKind::Fruit, subtype) => match subtype % 10 {
                0 => Some(FruitSet::Primary),
                1 => Some(FruitSet::Secondary),
                _ => None,
            },
            _ => None,
        }
    }

    /// Player whose footprint or spawn marker this tile is.
    #[must_use]
    pub const fn occupant_player(self) -> Option<PlayerId> {
        match self.decode() {
            (TileKind::Player, 0) => Some(PlayerId::One),
            (TileKind::Player, 1) => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// Enemy variant spawned by this tile when a level loads.
    #[must_use]
    pub const fn spawned_enemy(self) -> Option<EnemyKind> {
        match self.decode() {
            (TileKind::Enemy, subtype) => EnemyKind::from_subtype(subtype),
            _ => None,
        }
    }

    /// Reports whether the tile is the footprint of a defeated player.
    #[must_use]
    pub fn is_defeated_player(self, defeated: PlayerSet) -> bool {
        self.occupant_player()
            .is_some_and(|player| defeated.contains(player))
    }
}

/// Tiles enemies may step onto: ground, any fruit, or any player tile.
///
/// Player tiles are open to enemies so that pursuit can reach its target.
#[must_use]
pub const fn is_enemy_passable(tile: Tile) -> bool {
    matches!(
        tile.kind(),
        TileKind::Ground | TileKind::Fruit | TileKind::Player
    )
}

/// Tiles an ice trail may freeze: ground, any fruit, or a defeated player.
#[must_use]
pub fn is_ice_formable(tile: Tile, defeated: PlayerSet) -> bool {
    tile.is_ground() || tile.is_fruit() || tile.is_defeated_player(defeated)
}

/// Tiles a live player may walk onto: ground, any fruit, or a defeated player.
#[must_use]
pub fn is_player_walkable(tile: Tile, defeated: PlayerSet) -> bool {
    tile.is_ground() || tile.is_fruit() || tile.is_defeated_player(defeated)
}
