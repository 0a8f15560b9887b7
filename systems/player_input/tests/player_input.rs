use std::time::Duration;

use meltdown_core::{CellCoord, Command, Direction, Event, Level, PlayerId, SessionConfig};
use meltdown_system_player_input::{Config, HeldIntents, PlayerInput};
use meltdown_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(50);

fn held_right() -> [HeldIntents; 2] {
    [
        HeldIntents {
            right: true,
            ..HeldIntents::idle()
        },
        HeldIntents::idle(),
    ]
}

#[test]
fn emits_at_most_one_intent_per_cooldown() {
    let mut input = PlayerInput::new(Config::new(Duration::from_millis(150)));
    let mut commands = Vec::new();

    input.handle(&[], held_right(), &mut commands);
    assert_eq!(commands.len(), 1);

    for _ in 0..2 {
        commands.clear();
        input.handle(&[Event::TimeAdvanced { dt: FRAME }], held_right(), &mut commands);
        assert!(commands.is_empty());
    }

    input.handle(&[Event::TimeAdvanced { dt: FRAME }], held_right(), &mut commands);
    assert_eq!(
        commands,
        vec![Command::MovePlayer {
            player: PlayerId::One,
            direction: Direction::East,
        }]
    );
}

#[test]
fn pause_and_terminal_events_silence_input() {
    let mut input = PlayerInput::new(Config::new(Duration::ZERO));
    let mut commands = Vec::new();

    input.handle(&[Event::PauseChanged { paused: true }], held_right(), &mut commands);
    assert!(commands.is_empty());

    input.handle(&[Event::PauseChanged { paused: false }], held_right(), &mut commands);
    assert_eq!(commands.len(), 1);

    commands.clear();
    input.handle(&[Event::Victory], held_right(), &mut commands);
    assert!(commands.is_empty());

    input.handle(
        &[Event::LevelLoaded {
            columns: 4,
            rows: 4,
            enemies: 0,
            fruit: 0,
        }],
        held_right(),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
}

#[test]
fn defeated_players_stop_emitting() {
    let mut input = PlayerInput::new(Config::new(Duration::ZERO));
    let mut commands = Vec::new();
    let held = [
        HeldIntents {
            act: true,
            ..HeldIntents::idle()
        },
        HeldIntents {
            up: true,
            ..HeldIntents::idle()
        },
    ];

    input.handle(
        &[Event::PlayerDefeated {
            player: PlayerId::One,
        }],
        held,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::MovePlayer {
            player: PlayerId::Two,
            direction: Direction::North,
        }]
    );
}

#[test]
fn driving_the_world_never_trips_its_cooldown() {
    let config = SessionConfig::default();
    let mut world = World::with_level(config, Level::parse("40 6 6 6 6 6 6 6\n41 6 6 6 6 6 6 6", 8, 2));
    let mut input = PlayerInput::new(Config::from_timing(&config.timing));
    let mut events = Vec::new();

    for _ in 0..40 {
        let mut commands = Vec::new();
        input.handle(&events, held_right(), &mut commands);
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick { dt: FRAME }, &mut events);

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::IntentRejected { .. })));
    }

    let players = query::player_view(&world);
    assert_eq!(
        players.get(PlayerId::One).map(|player| player.cell),
        Some(CellCoord::new(7, 0))
    );
}
