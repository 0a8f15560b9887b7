use std::time::Duration;

use meltdown_core::{CellCoord, Command, Direction, EnemyKind, Event, Level, PlayerId, SessionConfig};
use meltdown_world::{self as world, query, World};

fn session(layout: &str, columns: u32, rows: u32) -> World {
    World::with_level(SessionConfig::default(), Level::parse(layout, columns, rows))
}

fn tick(world: &mut World, millis: u64, events: &mut Vec<Event>) {
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        events,
    );
}

fn code_at(world: &World, column: u32, row: u32) -> Option<u32> {
    query::tile_grid(world)
        .get(CellCoord::new(column, row))
        .map(|tile| tile.code())
}

#[test]
fn ice_breaker_holds_position_for_the_whole_break() {
    let mut world = session("31 2 6 40\n6 6 6 41", 4, 2);
    let mut events = Vec::new();
    let timing = query::config(&world).timing;
    let started = timing.enemy_step();
    let finished = started + timing.break_duration();

    loop {
        tick(&mut world, 25, &mut events);
        let now = query::elapsed(&world);
        let breaker = query::enemy_view(&world).into_vec()[0];

        if now < finished {
            assert_eq!(breaker.cell, CellCoord::new(0, 0), "moved at {now:?}");
            assert_eq!(code_at(&world, 1, 0), Some(2), "ice gone at {now:?}");
            if now >= started {
                assert_eq!(breaker.breaking, Some(CellCoord::new(1, 0)));
                assert_eq!(breaker.facing, Direction::East);
            }
            continue;
        }

        assert_eq!(breaker.cell, CellCoord::new(0, 0));
        assert_eq!(breaker.breaking, None);
        assert_eq!(code_at(&world, 1, 0), Some(6));
        break;
    }

    assert!(events.contains(&Event::EnemyBrokeIce {
        enemy: query::enemy_view(&world).into_vec()[0].id,
        target: CellCoord::new(1, 0),
    }));

    tick(&mut world, 25, &mut events);
    assert_eq!(
        query::enemy_view(&world).into_vec()[0].cell,
        CellCoord::new(1, 0)
    );
}

#[test]
fn breaking_keeps_animating() {
    let mut world = session("31 2 40\n6 6 41", 3, 2);
    let mut events = Vec::new();

    tick(&mut world, 275, &mut events);
    let first = query::enemy_view(&world).into_vec()[0].animation_frame;
    tick(&mut world, 25, &mut events);
    tick(&mut world, 25, &mut events);
    let later = query::enemy_view(&world).into_vec()[0].animation_frame;

    assert_eq!(later, first + 2);
}

#[test]
fn pursuit_prefers_the_first_player_on_ties() {
    let mut world = session("31 6 40\n6 6 6\n41 6 6", 3, 3);
    let mut events = Vec::new();

    tick(&mut world, 275, &mut events);

    let breaker = query::enemy_view(&world).into_vec()[0];
    assert_eq!(breaker.kind, EnemyKind::IceBreaker);
    assert_eq!(breaker.cell, CellCoord::new(1, 0));
    assert_eq!(breaker.facing, Direction::East);
    assert_eq!(code_at(&world, 0, 0), Some(6));
    assert_eq!(code_at(&world, 1, 0), Some(31));
}

#[test]
fn halo_catches_from_an_adjacent_tile() {
    let mut world = session("30 6 40\n6 6 41", 3, 2);
    let mut events = Vec::new();

    tick(&mut world, 275, &mut events);

    let halo = query::enemy_view(&world).into_vec()[0];
    assert_eq!(halo.cell, CellCoord::new(1, 0));
    assert!(events.contains(&Event::PlayerCollided {
        player: PlayerId::One,
        enemy: halo.id,
    }));
    assert!(events.contains(&Event::PlayerDefeated {
        player: PlayerId::One
    }));

    let state = query::game_state(&world);
    assert!(state.is_defeated(PlayerId::One));
    assert!(!state.is_defeated(PlayerId::Two));
    assert!(!state.game_over());
    assert_eq!(code_at(&world, 2, 0), Some(40));
}

#[test]
fn monster_catching_both_players_ends_the_game() {
    let mut world = session("32\n40\n41", 1, 3);
    let mut events = Vec::new();

    tick(&mut world, 275, &mut events);
    assert!(query::game_state(&world).is_defeated(PlayerId::One));
    assert_eq!(code_at(&world, 0, 1), Some(32));

    tick(&mut world, 275, &mut events);
    let state = query::game_state(&world);
    assert!(state.game_over());
    assert!(!state.victory());
    assert_eq!(code_at(&world, 0, 1), Some(40));
    assert_eq!(code_at(&world, 0, 2), Some(32));
    assert_eq!(
        events.iter().filter(|event| **event == Event::GameOver).count(),
        1
    );

    let players = query::player_view(&world);
    assert!(players.iter().all(|player| player.defeated));

    // Terminal sessions ignore ticks.
    events.clear();
    tick(&mut world, 275, &mut events);
    assert!(events.is_empty());
}

#[test]
fn defeated_player_footprints_can_be_frozen() {
    let mut world = session("32 6\n40 6\n6 41", 2, 3);
    let mut events = Vec::new();

    // The monster steps onto player one, then keeps walking south.
    tick(&mut world, 275, &mut events);
    tick(&mut world, 275, &mut events);
    assert_eq!(code_at(&world, 0, 1), Some(40));
    assert_eq!(code_at(&world, 0, 2), Some(32));

    // A defeated footprint no longer blocks ice, and survives beneath it.
    world::apply(
        &mut world,
        Command::FormIce {
            origin: CellCoord::new(1, 1),
            direction: Direction::West,
        },
        &mut events,
    );
    assert_eq!(code_at(&world, 0, 1), Some(2));
    assert_eq!(
        query::fruit_vault(&world).peek(CellCoord::new(0, 1)).map(|tile| tile.code()),
        Some(40)
    );
}
