use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_duel_core::{
    Cell, Command, Direction, Event, MatchOutcome, ObstacleMap, SnakeId, SnakeStatus,
};
use snake_duel_world::{apply, query, MatchConfig, World};

const FRAME: Duration = Duration::from_micros(16_667);
const MAX_FRAMES_PER_TURN: usize = 120;

const FIRST: SnakeId = SnakeId::new(0);
const SECOND: SnakeId = SnakeId::new(1);

fn open_world(first: Cell, second: Cell) -> World {
    let mut config = MatchConfig::default();
    config.snakes[0].spawn = first;
    config.snakes[1].spawn = second;
    World::with_obstacles(&config, ObstacleMap::bordered(config.grid())).expect("valid world")
}

fn steer(world: &mut World, snake: SnakeId, direction: Direction, events: &mut Vec<Event>) {
    apply(world, Command::SetDirection { snake, direction }, events);
}

fn tick(world: &mut World, events: &mut Vec<Event>) {
    apply(world, Command::Tick { dt: FRAME }, events);
}

fn any_moving(world: &World) -> bool {
    query::snake_view(world)
        .iter()
        .any(|snake| snake.status == SnakeStatus::Moving)
}

/// Steers both snakes and ticks until the resulting turn has played out.
fn play_turn(world: &mut World, first: Direction, second: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    steer(world, FIRST, first, &mut events);
    steer(world, SECOND, second, &mut events);
    tick(world, &mut events);
    for _ in 0..MAX_FRAMES_PER_TURN {
        if !any_moving(world) {
            break;
        }
        tick(world, &mut events);
    }
    events
}

fn body_cells(world: &World, id: SnakeId) -> Vec<Cell> {
    query::snake(world, id)
        .expect("snake exists")
        .body
        .iter()
        .map(|segment| segment.cell)
        .collect()
}

fn status(world: &World, id: SnakeId) -> SnakeStatus {
    query::snake(world, id).expect("snake exists").status
}

#[test]
fn head_on_swap_terminates_both() {
    let mut world = open_world(Cell::new(5, 5), Cell::new(5, 6));

    let events = play_turn(&mut world, Direction::Right, Direction::Left);

    assert_eq!(status(&world, FIRST), SnakeStatus::Terminated);
    assert_eq!(status(&world, SECOND), SnakeStatus::Terminated);
    assert_eq!(query::outcome(&world), Some(MatchOutcome::Draw));
    assert!(events.contains(&Event::MatchEnded {
        outcome: MatchOutcome::Draw
    }));
}

#[test]
fn heads_entering_same_cell_terminate_both() {
    let mut world = open_world(Cell::new(5, 4), Cell::new(5, 6));

    let events = play_turn(&mut world, Direction::Right, Direction::Left);

    let terminated: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::SnakeTerminated { snake, at } => Some((*snake, *at)),
            _ => None,
        })
        .collect();
    assert_eq!(
        terminated,
        vec![(FIRST, Cell::new(5, 5)), (SECOND, Cell::new(5, 5))]
    );
    assert_eq!(query::outcome(&world), Some(MatchOutcome::Draw));
}

#[test]
fn vacating_tail_can_be_entered() {
    let mut world = open_world(Cell::new(9, 3), Cell::new(3, 3));

    for _ in 0..5 {
        let _ = play_turn(&mut world, Direction::Up, Direction::Right);
    }
    assert_eq!(body_cells(&world, FIRST)[0], Cell::new(4, 3));
    assert_eq!(body_cells(&world, SECOND).last(), Some(&Cell::new(3, 3)));

    let events = play_turn(&mut world, Direction::Up, Direction::Right);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::SnakeTerminated { .. })));
    assert_eq!(body_cells(&world, FIRST)[0], Cell::new(3, 3));
    assert!(!body_cells(&world, SECOND).contains(&Cell::new(3, 3)));
    assert_eq!(query::outcome(&world), None);
}

#[test]
fn growing_tail_stays_solid() {
    let mut world = open_world(Cell::new(8, 3), Cell::new(3, 3));

    for _ in 0..4 {
        let _ = play_turn(&mut world, Direction::Up, Direction::Right);
    }
    let events = play_turn(&mut world, Direction::Up, Direction::Right);

    assert!(events.contains(&Event::SnakeTerminated {
        snake: FIRST,
        at: Cell::new(3, 3),
    }));
    assert_ne!(status(&world, SECOND), SnakeStatus::Terminated);
    assert_eq!(body_cells(&world, SECOND)[0], Cell::new(3, 8));
    assert_eq!(
        query::outcome(&world),
        Some(MatchOutcome::Winner(SECOND))
    );
}

#[test]
fn both_into_wall_terminate_on_same_frame() {
    let config = MatchConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut world = World::new(&config, &mut rng).expect("default match generates");
    let mut events = Vec::new();

    steer(&mut world, FIRST, Direction::Left, &mut events);
    steer(&mut world, SECOND, Direction::Right, &mut events);
    tick(&mut world, &mut events);

    assert_eq!(status(&world, FIRST), SnakeStatus::Terminated);
    assert_eq!(status(&world, SECOND), SnakeStatus::Terminated);
    assert_eq!(query::outcome(&world), Some(MatchOutcome::Draw));

    let before = events.len();
    steer(&mut world, FIRST, Direction::Up, &mut events);
    steer(&mut world, SECOND, Direction::Down, &mut events);
    tick(&mut world, &mut events);
    assert!(!world.can_advance_turn());
    assert!(!events[before..]
        .iter()
        .any(|event| matches!(event, Event::TurnStarted { .. })));
}

#[test]
fn generated_match_settles_after_single_turn() {
    let config = MatchConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut world = World::new(&config, &mut rng).expect("default match generates");
    let mut events = Vec::new();

    for snake in &config.snakes {
        let obstacles = query::obstacles(&world);
        let free = Direction::ALL
            .into_iter()
            .find(|direction| !obstacles.is_blocked(snake.spawn.step(*direction)))
            .expect("spawn has an open neighbor");
        steer(&mut world, snake.id, free, &mut events);
    }

    for _ in 0..60 {
        tick(&mut world, &mut events);
    }

    for snake in query::snake_view(&world).iter() {
        assert_eq!(snake.status, SnakeStatus::Idle);
        assert_eq!(snake.turn_count, 1);
        assert_eq!(snake.body.len(), 2);
    }
    assert_eq!(query::outcome(&world), None);
    let commits = events
        .iter()
        .filter(|event| matches!(event, Event::StepCompleted { .. }))
        .count();
    assert_eq!(commits, 2);
}

#[test]
fn held_directions_chain_turns() {
    let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
    let mut events = Vec::new();

    for _ in 0..60 {
        steer(&mut world, FIRST, Direction::Up, &mut events);
        steer(&mut world, SECOND, Direction::Down, &mut events);
        tick(&mut world, &mut events);
    }

    for snake in query::snake_view(&world).iter() {
        assert_eq!(snake.turn_count, 5);
        assert_ne!(snake.status, SnakeStatus::Terminated);
    }
    assert_eq!(query::outcome(&world), None);
}

#[test]
fn body_length_follows_growth_rule() {
    let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
    let mut lengths = Vec::new();
    let mut growth = Vec::new();

    for _ in 0..8 {
        let events = play_turn(&mut world, Direction::Up, Direction::Down);
        lengths.push(body_cells(&world, FIRST).len());
        growth.extend(events.iter().filter_map(|event| match event {
            Event::StepCompleted { snake, grew, .. } if *snake == FIRST => Some(*grew),
            _ => None,
        }));
    }

    assert_eq!(lengths, vec![2, 3, 4, 5, 6, 6, 7, 7]);
    assert_eq!(
        growth,
        vec![true, true, true, true, true, false, true, false]
    );
    assert_eq!(
        body_cells(&world, FIRST),
        vec![
            Cell::new(3, 1),
            Cell::new(4, 1),
            Cell::new(5, 1),
            Cell::new(6, 1),
            Cell::new(7, 1),
            Cell::new(8, 1),
            Cell::new(9, 1),
        ]
    );
}

#[test]
fn zero_dt_starts_turn_without_motion() {
    let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
    let mut events = Vec::new();
    steer(&mut world, FIRST, Direction::Up, &mut events);
    steer(&mut world, SECOND, Direction::Down, &mut events);

    apply(&mut world, Command::Tick { dt: Duration::ZERO }, &mut events);

    let first = query::snake(&world, FIRST).expect("first snake");
    assert_eq!(first.status, SnakeStatus::Moving);
    assert_eq!(first.body[0].position, Cell::new(11, 1).center());
}

#[test]
fn unknown_snake_is_reported() {
    let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
    let mut events = Vec::new();

    steer(&mut world, SnakeId::new(7), Direction::Up, &mut events);

    assert_eq!(
        events,
        vec![Event::DirectionRejected {
            snake: SnakeId::new(7)
        }]
    );
}

#[test]
fn same_seed_builds_same_match() {
    let config = MatchConfig::default();
    let first = World::new(&config, &mut ChaCha8Rng::seed_from_u64(99)).expect("match");
    let second = World::new(&config, &mut ChaCha8Rng::seed_from_u64(99)).expect("match");

    assert_eq!(query::obstacles(&first), query::obstacles(&second));
    assert_eq!(query::grid(&first), config.grid());
}
