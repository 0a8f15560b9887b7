#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Meltdown session.

mod autopilot;
mod render;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use meltdown_core::{Command, Event, Level, PlayerId};
use meltdown_system_player_input::{Config, PlayerInput};
use meltdown_world::{self as world, load_level_or_fallback, query, World};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

const DEMO_LEVEL: &str = include_str!("../levels/demo.txt");

/// Runs a seeded, headless session and prints how it went.
#[derive(Debug, Parser)]
#[command(name = "meltdown", version, about)]
struct Args {
    /// Level file of whitespace separated tile codes; defaults to the demo level.
    #[arg(long)]
    level: Option<PathBuf>,
    /// TOML file overriding the session configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 3_000)]
    ticks: u32,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Prints the final grid.
    #[arg(long)]
    print_grid: bool,
}

#[derive(Debug, Default)]
struct Summary {
    frames: u32,
    fruit_collected: u32,
    ice_formed: u32,
    ice_broken: u32,
    enemy_steps: u32,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FruitCollected { .. } => self.fruit_collected += 1,
                Event::IceFormed { .. } => self.ice_formed += 1,
                Event::IceBroken { .. } | Event::EnemyBrokeIce { .. } => self.ice_broken += 1,
                Event::EnemyMoved { .. } => self.enemy_steps += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Meltdown command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let mut config = settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let level = match &args.level {
        Some(path) => load_level_or_fallback(path, config.columns, config.rows),
        None => Level::parse(DEMO_LEVEL, config.columns, config.rows),
    };
    let mut world = World::with_level(config, level);
    tracing::info!(seed = query::config(&world).seed, "session started");

    let summary = run(
        &mut world,
        args.ticks,
        Duration::from_millis(args.tick_ms),
    );
    report(&world, &summary, args.print_grid);
    Ok(())
}

fn run(world: &mut World, frames: u32, dt: Duration) -> Summary {
    let config = *query::config(world);
    let mut input = PlayerInput::new(Config::from_timing(&config.timing));
    let mut pilot = Autopilot::new(config.seed.rotate_left(17));
    let mut events = Vec::new();
    let mut summary = Summary::default();

    for _ in 0..frames {
        let mut commands = Vec::new();
        input.handle(&events, pilot.next_frame(), &mut commands);

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        world::apply(world, Command::Tick { dt }, &mut events);

        summary.frames += 1;
        summary.record(&events);
        if query::game_state(world).is_terminal() {
            break;
        }
    }

    tracing::debug!(frames = summary.frames, "session finished");
    summary
}

fn report(world: &World, summary: &Summary, print_grid: bool) {
    let state = query::game_state(world);
    let outcome = if state.victory() {
        "victory"
    } else if state.game_over() {
        "game over"
    } else {
        "in progress"
    };

    println!(
        "{outcome} after {} frames ({:.1}s simulated, {:.1}s left on the clock)",
        summary.frames,
        query::elapsed(world).as_secs_f32(),
        query::time_remaining(world).as_secs_f32()
    );
    for player in PlayerId::ALL {
        let Some(snapshot) = query::player_view(world).get(player).copied() else {
            continue;
        };
        println!(
            "player {:?}: score {}, {}",
            player,
            snapshot.score,
            if snapshot.defeated { "defeated" } else { "standing" }
        );
    }
    println!(
        "fruit collected {}, remaining {}; ice formed {}, broken {}; enemy steps {}",
        summary.fruit_collected,
        query::fruit_remaining(world),
        summary.ice_formed,
        summary.ice_broken,
        summary.enemy_steps
    );

    if print_grid {
        println!("{}", render::render_grid(query::tile_grid(world)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meltdown_core::SessionConfig;

    #[test]
    fn demo_level_has_both_players_and_every_enemy_kind() {
        let config = SessionConfig::default();
        let world = World::with_level(config, Level::parse(DEMO_LEVEL, config.columns, config.rows));

        assert_eq!(query::player_view(&world).iter().count(), 2);
        assert_eq!(query::enemy_view(&world).iter().count(), 3);
        assert_eq!(query::fruit_remaining(&world), 10);
    }

    #[test]
    fn headless_runs_are_reproducible() {
        let config = SessionConfig::default();
        let level = Level::parse(DEMO_LEVEL, config.columns, config.rows);
        let mut first = World::with_level(config, level.clone());
        let mut second = World::with_level(config, level);

        let a = run(&mut first, 500, Duration::from_millis(16));
        let b = run(&mut second, 500, Duration::from_millis(16));

        assert_eq!(a.frames, b.frames);
        assert_eq!(a.enemy_steps, b.enemy_steps);
        assert_eq!(
            query::tile_grid(&first).tiles(),
            query::tile_grid(&second).tiles()
        );
        assert_eq!(query::fruit_in_play(&first), query::fruit_remaining(&first) as usize);
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::try_parse_from(["meltdown", "--seed", "9", "--print-grid"]).expect("valid args");
        assert_eq!(args.seed, Some(9));
        assert!(args.print_grid);
        assert_eq!(args.ticks, 3_000);
        assert_eq!(args.tick_ms, 16);
    }
}
