//! Seeded stand-in for human players.

use meltdown_core::PLAYER_COUNT;
use meltdown_system_player_input::HeldIntents;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MIN_HOLD_FRAMES: u32 = 4;
const MAX_HOLD_FRAMES: u32 = 24;

/// Holds a random control for a random number of frames, per player.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    held: [HeldIntents; PLAYER_COUNT],
    frames_left: [u32; PLAYER_COUNT],
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: [HeldIntents::idle(); PLAYER_COUNT],
            frames_left: [0; PLAYER_COUNT],
        }
    }

    /// Controls held by both players during the next frame.
    pub(crate) fn next_frame(&mut self) -> [HeldIntents; PLAYER_COUNT] {
        for (held, frames_left) in self.held.iter_mut().zip(self.frames_left.iter_mut()) {
            if *frames_left == 0 {
                *held = random_controls(&mut self.rng);
                *frames_left = self.rng.gen_range(MIN_HOLD_FRAMES..=MAX_HOLD_FRAMES);
            }
            *frames_left -= 1;
        }
        self.held
    }
}

fn random_controls(rng: &mut ChaCha8Rng) -> HeldIntents {
    let mut held = HeldIntents::idle();
    match rng.gen_range(0..6) {
        0 => held.left = true,
        1 => held.right = true,
        2 => held.up = true,
        3 => held.down = true,
        4 => held.act = true,
        _ => {}
    }
    held
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_same_controls() {
        let mut first = Autopilot::new(11);
        let mut second = Autopilot::new(11);
        for _ in 0..100 {
            assert_eq!(first.next_frame(), second.next_frame());
        }
    }

    #[test]
    fn controls_are_held_for_several_frames() {
        let mut pilot = Autopilot::new(3);
        let first = pilot.next_frame();
        for _ in 1..MIN_HOLD_FRAMES {
            assert_eq!(pilot.next_frame(), first);
        }
    }
}
