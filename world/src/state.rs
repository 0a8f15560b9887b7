//! Collision flags and the sticky victory/defeat state machine.

use meltdown_core::{Event, PlayerId, PlayerSet};

/// Outcome flags for a single session.
///
/// Every flag only ever turns on; building a fresh state is the only way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    roster: PlayerSet,
    collided: PlayerSet,
    defeated: PlayerSet,
    victory: bool,
    game_over: bool,
}

impl GameState {
    /// Fresh state for a session in which only `roster` players take part.
    #[must_use]
    pub const fn new(roster: PlayerSet) -> Self {
        Self {
            roster,
            collided: PlayerSet::empty(),
            defeated: PlayerSet::empty(),
            victory: false,
            game_over: false,
        }
    }

    /// Players an enemy has caught.
    #[must_use]
    pub const fn collided(&self) -> PlayerSet {
        self.collided
    }

    /// Players that were defeated.
    #[must_use]
    pub const fn defeated(&self) -> PlayerSet {
        self.defeated
    }

    /// Reports whether the player was defeated.
    #[must_use]
    pub const fn is_defeated(&self, player: PlayerId) -> bool {
        self.defeated.contains(player)
    }

    /// Reports whether every fruit was collected.
    #[must_use]
    pub const fn victory(&self) -> bool {
        self.victory
    }

    /// Reports whether every player was defeated.
    #[must_use]
    pub const fn game_over(&self) -> bool {
        self.game_over
    }

    /// Reports whether the session reached either terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.victory || self.game_over
    }

    /// Marks the player as caught. Returns `true` the first time only.
    pub fn flag_collision(&mut self, player: PlayerId) -> bool {
        self.collided.insert(player)
    }

    /// Promotes collisions to defeats and defeats to game over.
    ///
    /// Collisions are ignored once victory is set, so a won session can never
    /// also end in game over.
    pub fn check_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.victory {
            return;
        }

        for player in PlayerId::ALL {
            if !self.roster.contains(player) {
                continue;
            }
            if self.collided.contains(player) && self.defeated.insert(player) {
                tracing::info!(?player, "player defeated");
                out_events.push(Event::PlayerDefeated { player });
            }
        }

        if !self.roster.is_empty() && self.defeated.covers(self.roster) && !self.game_over {
            self.game_over = true;
            tracing::info!("game over");
            out_events.push(Event::GameOver);
        }
    }

    /// Sets the victory flag unless the session already ended.
    pub fn declare_victory(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.victory = true;
        tracing::info!("victory");
        out_events.push(Event::Victory);
        true
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(PlayerSet::full())
    }
}
