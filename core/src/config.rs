//! Session tuning shared by the world and the systems that drive it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_GRID_COLUMNS: u32 = 18;
const DEFAULT_GRID_ROWS: u32 = 18;
const DEFAULT_RNG_SEED: u64 = 0x5eed_1ce0_c0ff_ee42;

/// Fixed intervals that clock every tick source, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Minimum time between two enemy movement ticks.
    pub enemy_step_ms: u64,
    /// Age after which a pursuit path is recomputed.
    pub path_staleness_ms: u64,
    /// Time an ice breaker spends dissolving one ice tile.
    pub break_duration_ms: u64,
    /// Time between two tiles of an ice trail.
    pub ice_step_ms: u64,
    /// Minimum time between two honoured player intents.
    pub player_cooldown_ms: u64,
    /// Length of a level on the display clock.
    pub level_duration_ms: u64,
}

impl Timing {
    /// Enemy movement cooldown.
    #[must_use]
    pub const fn enemy_step(&self) -> Duration {
        Duration::from_millis(self.enemy_step_ms)
    }

    /// Pursuit path staleness window.
    #[must_use]
    pub const fn path_staleness(&self) -> Duration {
        Duration::from_millis(self.path_staleness_ms)
    }

    /// Ice breaking duration.
    #[must_use]
    pub const fn break_duration(&self) -> Duration {
        Duration::from_millis(self.break_duration_ms)
    }

    /// Ice trail step interval.
    #[must_use]
    pub const fn ice_step(&self) -> Duration {
        Duration::from_millis(self.ice_step_ms)
    }

    /// Player intent cooldown.
    #[must_use]
    pub const fn player_cooldown(&self) -> Duration {
        Duration::from_millis(self.player_cooldown_ms)
    }

    /// Level duration shown by the display clock.
    #[must_use]
    pub const fn level_duration(&self) -> Duration {
        Duration::from_millis(self.level_duration_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            enemy_step_ms: 275,
            path_staleness_ms: 5_000,
            break_duration_ms: 750,
            ice_step_ms: 100,
            player_cooldown_ms: 150,
            level_duration_ms: 120_000,
        }
    }
}

/// Everything required to construct a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tick intervals.
    pub timing: Timing,
    /// Number of tile columns read from level files.
    pub columns: u32,
    /// Number of tile rows read from level files.
    pub rows: u32,
    /// Seed for the session's random number generator.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            seed: DEFAULT_RNG_SEED,
        }
    }
}
