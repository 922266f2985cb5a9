#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for Snake Duel.
//!
//! The [`World`] owns both snakes and the obstacle map. Adapters steer snakes
//! and drive frames through [`apply`], then read back immutable snapshots via
//! the [`query`] module.

mod collision;
mod config;
mod snake;

use std::time::Duration;

use rand::Rng;
use snake_duel_core::{
    Cell, Command, Direction, Event, GridSize, MatchOutcome, ObstacleMap, SnakeId, SnakeStatus,
};
use snake_duel_system_map_generation::{GenerationError, MapGenerator};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{collision::CollisionFrame, snake::Snake};

pub use config::{MatchConfig, SnakeConfig};
pub use snake::grows_on_turn;

/// Reasons a match cannot be created.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MatchError {
    /// A snake was configured with a speed that never reaches its target.
    #[error("snake {snake} has invalid speed {speed}; speeds must be positive")]
    InvalidSpeed {
        /// Identifier of the misconfigured snake.
        snake: u32,
        /// Configured speed in cells per second.
        speed: f32,
    },
    /// Both snakes share the same identifier.
    #[error("both snakes use identifier {0}")]
    DuplicateSnakeId(u32),
    /// Both snakes were configured to spawn on the same cell.
    #[error("both snakes spawn at {cell}")]
    SpawnsOverlap {
        /// Shared spawn cell.
        cell: Cell,
    },
    /// A supplied obstacle map does not match the configured grid.
    #[error(
        "obstacle map is {actual_rows}x{actual_columns} but the match expects {rows}x{columns}"
    )]
    GridMismatch {
        /// Configured row count.
        rows: u32,
        /// Configured column count.
        columns: u32,
        /// Row count of the supplied map.
        actual_rows: u32,
        /// Column count of the supplied map.
        actual_columns: u32,
    },
    /// A spawn cell is covered by an obstacle.
    #[error("spawn cell {cell} is blocked by an obstacle")]
    SpawnBlocked {
        /// Blocked spawn cell.
        cell: Cell,
    },
    /// The obstacle generator could not produce a layout.
    #[error("map generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Represents the authoritative Snake Duel match state.
#[derive(Debug)]
pub struct World {
    grid: GridSize,
    obstacles: ObstacleMap,
    snakes: Vec<Snake>,
    outcome: Option<MatchOutcome>,
}

impl World {
    /// Creates a match on a freshly generated obstacle layout.
    pub fn new<R>(config: &MatchConfig, rng: &mut R) -> Result<Self, MatchError>
    where
        R: Rng,
    {
        config.validate()?;
        let generator = MapGenerator::new(config.generator_config())?;
        let obstacles = generator.generate(rng)?;
        Self::with_obstacles(config, obstacles)
    }

    /// Creates a match on a caller-supplied obstacle layout.
    pub fn with_obstacles(config: &MatchConfig, obstacles: ObstacleMap) -> Result<Self, MatchError> {
        config.validate()?;

        let grid = config.grid();
        if obstacles.grid() != grid {
            return Err(MatchError::GridMismatch {
                rows: grid.rows(),
                columns: grid.columns(),
                actual_rows: obstacles.grid().rows(),
                actual_columns: obstacles.grid().columns(),
            });
        }

        for cell in config.spawns() {
            if obstacles.is_blocked(cell) {
                return Err(MatchError::SpawnBlocked { cell });
            }
        }

        info!(
            rows = grid.rows(),
            columns = grid.columns(),
            obstacles = obstacles.len(),
            "match created"
        );

        Ok(Self {
            grid,
            obstacles,
            snakes: config.snakes.iter().map(Snake::spawn).collect(),
            outcome: None,
        })
    }

    /// Buffers the next direction for a snake, replacing any earlier one.
    ///
    /// Returns `false` when no snake carries the identifier.
    pub fn set_direction(&mut self, id: SnakeId, direction: Direction) -> bool {
        match self.snakes.iter_mut().find(|snake| snake.id() == id) {
            Some(snake) => {
                snake.set_direction(direction);
                true
            }
            None => {
                warn!(snake = id.get(), ?direction, "direction for unknown snake");
                false
            }
        }
    }

    /// Reports whether the next discrete turn may begin.
    #[must_use]
    pub fn can_advance_turn(&self) -> bool {
        self.outcome.is_none() && self.snakes.iter().all(Snake::is_ready)
    }

    /// Advances the match by one frame.
    ///
    /// Starts a new turn when every snake is ready, resolves collisions for it
    /// and then interpolates every snake.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        if self.can_advance_turn() {
            self.start_turn(out_events);
        }

        for snake in &mut self.snakes {
            if let Some(commit) = snake.advance_motion(dt) {
                out_events.push(Event::StepCompleted {
                    snake: snake.id(),
                    head: commit.head,
                    grew: commit.grew,
                });
            }
        }
    }

    fn start_turn(&mut self, out_events: &mut Vec<Event>) {
        let frame = CollisionFrame::capture(&self.snakes);

        let targets: Vec<Cell> = self
            .snakes
            .iter_mut()
            .map(|snake| {
                let from = snake.head();
                let to = snake.begin_turn();
                debug!(
                    snake = snake.id().get(),
                    turn = snake.turn_count(),
                    %from,
                    %to,
                    "turn started"
                );
                out_events.push(Event::TurnStarted {
                    snake: snake.id(),
                    turn: snake.turn_count(),
                    from,
                    to,
                });
                to
            })
            .collect();

        let collisions = frame.resolve(&self.obstacles, &targets);
        for ((snake, at), collided) in self.snakes.iter_mut().zip(targets).zip(collisions) {
            if collided {
                snake.terminate();
                info!(snake = snake.id().get(), %at, "snake terminated");
                out_events.push(Event::SnakeTerminated {
                    snake: snake.id(),
                    at,
                });
            }
        }

        self.settle_outcome(out_events);
    }

    fn settle_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self
            .snakes
            .iter()
            .all(|snake| snake.status() != SnakeStatus::Terminated)
        {
            return;
        }

        let survivors: Vec<SnakeId> = self
            .snakes
            .iter()
            .filter(|snake| snake.status() != SnakeStatus::Terminated)
            .map(Snake::id)
            .collect();
        let outcome = match survivors.as_slice() {
            [winner] => MatchOutcome::Winner(*winner),
            _ => MatchOutcome::Draw,
        };

        info!(?outcome, "match ended");
        self.outcome = Some(outcome);
        out_events.push(Event::MatchEnded { outcome });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetDirection { snake, direction } => {
            if world.set_direction(snake, direction) {
                out_events.push(Event::DirectionQueued { snake, direction });
            } else {
                out_events.push(Event::DirectionRejected { snake });
            }
        }
        Command::Tick { dt } => world.advance(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use snake_duel_core::{GridSize, MatchOutcome, ObstacleMap, SnakeId, SnakeSnapshot, SnakeView};

    /// Dimensions of the playing field.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Provides read-only access to the static obstacle layout.
    #[must_use]
    pub fn obstacles(world: &World) -> &ObstacleMap {
        &world.obstacles
    }

    /// Captures a read-only view of both snakes.
    #[must_use]
    pub fn snake_view(world: &World) -> SnakeView {
        SnakeView::from_snapshots(world.snakes.iter().map(|snake| snake.snapshot()).collect())
    }

    /// Captures the snake with the provided identifier.
    #[must_use]
    pub fn snake(world: &World, id: SnakeId) -> Option<SnakeSnapshot> {
        world
            .snakes
            .iter()
            .find(|snake| snake.id() == id)
            .map(|snake| snake.snapshot())
    }

    /// Result of the match, `None` while both snakes are still in play.
    #[must_use]
    pub fn outcome(world: &World) -> Option<MatchOutcome> {
        world.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snake_duel_core::SnakeColor;

    fn config_with_spawns(first: Cell, second: Cell) -> MatchConfig {
        let mut config = MatchConfig::default();
        config.snakes[0].spawn = first;
        config.snakes[1].spawn = second;
        config
    }

    fn open_world(first: Cell, second: Cell) -> World {
        let config = config_with_spawns(first, second);
        World::with_obstacles(&config, ObstacleMap::bordered(config.grid()))
            .expect("open world is valid")
    }

    #[test]
    fn apply_queues_known_directions_and_rejects_unknown_ids() {
        let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetDirection {
                snake: SnakeId::new(0),
                direction: Direction::Up,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetDirection {
                snake: SnakeId::new(42),
                direction: Direction::Up,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::DirectionQueued {
                    snake: SnakeId::new(0),
                    direction: Direction::Up,
                },
                Event::DirectionRejected {
                    snake: SnakeId::new(42)
                },
            ]
        );
    }

    #[test]
    fn turn_waits_for_both_snakes() {
        let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
        let mut events = Vec::new();

        assert!(world.set_direction(SnakeId::new(0), Direction::Up));
        assert!(!world.can_advance_turn());
        world.advance(Duration::from_millis(16), &mut events);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }]
        );

        assert!(world.set_direction(SnakeId::new(1), Direction::Down));
        assert!(world.can_advance_turn());
    }

    #[test]
    fn tick_starts_turn_for_every_snake() {
        let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
        let mut events = Vec::new();
        let _ = world.set_direction(SnakeId::new(0), Direction::Up);
        let _ = world.set_direction(SnakeId::new(1), Direction::Left);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::ZERO,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { dt: Duration::ZERO },
                Event::TurnStarted {
                    snake: SnakeId::new(0),
                    turn: 1,
                    from: Cell::new(11, 1),
                    to: Cell::new(10, 1),
                },
                Event::TurnStarted {
                    snake: SnakeId::new(1),
                    turn: 1,
                    from: Cell::new(1, 12),
                    to: Cell::new(1, 11),
                },
            ]
        );
        assert!(!world.can_advance_turn());
    }

    #[test]
    fn wall_collision_hands_victory_to_survivor() {
        let mut world = open_world(Cell::new(11, 1), Cell::new(1, 12));
        let mut events = Vec::new();
        let _ = world.set_direction(SnakeId::new(0), Direction::Down);
        let _ = world.set_direction(SnakeId::new(1), Direction::Down);

        world.advance(Duration::from_millis(16), &mut events);

        assert!(events.contains(&Event::SnakeTerminated {
            snake: SnakeId::new(0),
            at: Cell::new(12, 1),
        }));
        assert_eq!(
            events.last(),
            Some(&Event::MatchEnded {
                outcome: MatchOutcome::Winner(SnakeId::new(1)),
            })
        );
        assert_eq!(
            query::outcome(&world),
            Some(MatchOutcome::Winner(SnakeId::new(1)))
        );
    }

    #[test]
    fn creation_rejects_inconsistent_layouts() {
        let config = MatchConfig::default();

        let mismatch = World::with_obstacles(&config, ObstacleMap::bordered(GridSize::new(5, 5)));
        assert!(matches!(mismatch, Err(MatchError::GridMismatch { .. })));

        let mut covered = ObstacleMap::bordered(config.grid());
        let _ = covered.block(Cell::new(11, 1));
        assert_eq!(
            World::with_obstacles(&config, covered).err(),
            Some(MatchError::SpawnBlocked {
                cell: Cell::new(11, 1)
            })
        );

        let overlapping = config_with_spawns(Cell::new(4, 4), Cell::new(4, 4));
        assert_eq!(
            World::with_obstacles(&overlapping, ObstacleMap::bordered(overlapping.grid())).err(),
            Some(MatchError::SpawnsOverlap {
                cell: Cell::new(4, 4)
            })
        );
    }

    #[test]
    fn shared_spawn_is_reported_alike_by_both_constructors() {
        let overlapping = config_with_spawns(Cell::new(4, 4), Cell::new(4, 4));
        let expected = Some(MatchError::SpawnsOverlap {
            cell: Cell::new(4, 4),
        });

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(World::new(&overlapping, &mut rng).err(), expected);
        assert_eq!(
            World::with_obstacles(&overlapping, ObstacleMap::bordered(overlapping.grid())).err(),
            expected
        );
    }

    #[test]
    fn snake_view_carries_configured_appearance() {
        let world = open_world(Cell::new(11, 1), Cell::new(1, 12));
        let view = query::snake_view(&world);

        let first = view.get(SnakeId::new(0)).expect("first snake");
        assert_eq!(first.color, SnakeColor::from_rgb(0x48, 0x76, 0xec));
        assert_eq!(first.facing, Direction::Up);
        assert_eq!(first.status, SnakeStatus::Idle);
        assert_eq!(first.body.len(), 1);
        assert_eq!(query::snake(&world, SnakeId::new(1)).map(|s| s.facing), Some(Direction::Down));
        assert!(query::snake(&world, SnakeId::new(9)).is_none());
    }
}
