#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns held player controls into world intents.

use std::time::Duration;

use meltdown_core::{Command, Direction, Event, PlayerId, PlayerSet, Timing, PLAYER_COUNT};

/// Controls a player is holding down during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldIntents {
    /// Move toward decreasing columns.
    pub left: bool,
    /// Move toward increasing columns.
    pub right: bool,
    /// Move toward decreasing rows.
    pub up: bool,
    /// Move toward increasing rows.
    pub down: bool,
    /// Form or break ice ahead.
    pub act: bool,
}

impl HeldIntents {
    /// Snapshot with nothing held.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            left: false,
            right: false,
            up: false,
            down: false,
            act: false,
        }
    }

    /// Highest priority command for the held controls.
    ///
    /// Priority runs left, right, up, down, act.
    #[must_use]
    pub fn command(self, player: PlayerId) -> Option<Command> {
        let direction = if self.left {
            Some(Direction::West)
        } else if self.right {
            Some(Direction::East)
        } else if self.up {
            Some(Direction::North)
        } else if self.down {
            Some(Direction::South)
        } else {
            None
        };

        match direction {
            Some(direction) => Some(Command::MovePlayer { player, direction }),
            None if self.act => Some(Command::PlayerAct { player }),
            None => None,
        }
    }
}

/// Configuration parameters required to construct the player input system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cooldown: Duration,
}

impl Config {
    /// Creates a configuration using the provided intent cooldown.
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Uses the player cooldown of the session timing.
    #[must_use]
    pub const fn from_timing(timing: &Timing) -> Self {
        Self::new(timing.player_cooldown())
    }
}

/// Emits at most one intent per player per frame, honouring the cooldown.
#[derive(Debug)]
pub struct PlayerInput {
    cooldown: Duration,
    since_last: [Option<Duration>; PLAYER_COUNT],
    defeated: PlayerSet,
    paused: bool,
    session_over: bool,
}

impl PlayerInput {
    /// Creates a new player input system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            cooldown: config.cooldown,
            since_last: [None; PLAYER_COUNT],
            defeated: PlayerSet::empty(),
            paused: false,
            session_over: false,
        }
    }

    /// Consumes world events and the held controls to emit intent commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        held: [HeldIntents; PLAYER_COUNT],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    for elapsed in self.since_last.iter_mut().flatten() {
                        *elapsed = elapsed.saturating_add(*dt);
                    }
                }
                Event::LevelLoaded { .. } => {
                    self.since_last = [None; PLAYER_COUNT];
                    self.defeated = PlayerSet::empty();
                    self.paused = false;
                    self.session_over = false;
                }
                Event::PauseChanged { paused } => self.paused = *paused,
                Event::PlayerDefeated { player } => {
                    let _ = self.defeated.insert(*player);
                }
                Event::Victory | Event::GameOver => self.session_over = true,
                _ => {}
            }
        }

        if self.paused || self.session_over {
            return;
        }

        for player in PlayerId::ALL {
            if self.defeated.contains(player) || !self.ready(player) {
                continue;
            }
            if let Some(command) = held[player.index()].command(player) {
                out.push(command);
                self.since_last[player.index()] = Some(Duration::ZERO);
            }
        }
    }

    fn ready(&self, player: PlayerId) -> bool {
        self.since_last[player.index()].map_or(true, |elapsed| elapsed >= self.cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_wins_over_every_other_control() {
        let held = HeldIntents {
            left: true,
            right: true,
            up: true,
            down: true,
            act: true,
        };
        assert_eq!(
            held.command(PlayerId::One),
            Some(Command::MovePlayer {
                player: PlayerId::One,
                direction: Direction::West,
            })
        );
    }

    #[test]
    fn act_only_fires_without_movement() {
        let held = HeldIntents {
            down: true,
            act: true,
            ..HeldIntents::idle()
        };
        assert_eq!(
            held.command(PlayerId::Two),
            Some(Command::MovePlayer {
                player: PlayerId::Two,
                direction: Direction::South,
            })
        );

        let held = HeldIntents {
            act: true,
            ..HeldIntents::idle()
        };
        assert_eq!(
            held.command(PlayerId::Two),
            Some(Command::PlayerAct {
                player: PlayerId::Two
            })
        );
        assert_eq!(HeldIntents::idle().command(PlayerId::Two), None);
    }
}
