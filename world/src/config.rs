//! Match configuration supplied by adapters when a match is created.

use serde::{Deserialize, Serialize};
use snake_duel_core::{Cell, Direction, GridSize, SnakeColor, SnakeId};
use snake_duel_system_map_generation::{self as map_generation, DEFAULT_ATTEMPT_BUDGET};

use crate::MatchError;

const DEFAULT_ROWS: u32 = 13;
const DEFAULT_COLUMNS: u32 = 14;
const DEFAULT_INNER_OBSTACLES: u32 = 16;
const DEFAULT_SPEED: f32 = 5.0;

/// Parameters of a single snake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Identifier used by input adapters to steer the snake.
    pub id: SnakeId,
    /// Appearance passed through to renderers.
    pub color: SnakeColor,
    /// Cell the snake occupies when the match starts.
    pub spawn: Cell,
    /// Interpolation speed measured in cells per second.
    pub speed: f32,
    /// Heading used to orient the eyes before the first turn.
    pub facing: Direction,
}

/// Parameters that describe a complete match.
///
/// The default reproduces the classic two-player layout: a 13x14 field with
/// sixteen interior obstacles, the first snake in the lower-left corner facing
/// up and the second in the upper-right corner facing down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of rows, including the wall ring.
    pub rows: u32,
    /// Number of columns, including the wall ring.
    pub columns: u32,
    /// Interior obstacles requested from the generator.
    pub inner_obstacle_count: u32,
    /// Whole-layout attempts before generation gives up.
    pub generation_attempts: u32,
    /// The two competing snakes.
    pub snakes: [SnakeConfig; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            inner_obstacle_count: DEFAULT_INNER_OBSTACLES,
            generation_attempts: DEFAULT_ATTEMPT_BUDGET,
            snakes: [
                SnakeConfig {
                    id: SnakeId::new(0),
                    color: SnakeColor::from_rgb(0x48, 0x76, 0xec),
                    spawn: Cell::new(DEFAULT_ROWS as i32 - 2, 1),
                    speed: DEFAULT_SPEED,
                    facing: Direction::Up,
                },
                SnakeConfig {
                    id: SnakeId::new(1),
                    color: SnakeColor::from_rgb(0xf9, 0x48, 0x48),
                    spawn: Cell::new(1, DEFAULT_COLUMNS as i32 - 2),
                    speed: DEFAULT_SPEED,
                    facing: Direction::Down,
                },
            ],
        }
    }
}

impl MatchConfig {
    /// Dimensions of the playing field.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        GridSize::new(self.rows, self.columns)
    }

    /// Spawn cells of both snakes in configuration order.
    #[must_use]
    pub fn spawns(&self) -> [Cell; 2] {
        [self.snakes[0].spawn, self.snakes[1].spawn]
    }

    /// Configuration handed to the obstacle generator.
    #[must_use]
    pub fn generator_config(&self) -> map_generation::Config {
        map_generation::Config::new(self.grid(), self.inner_obstacle_count, self.spawns())
            .with_attempt_budget(self.generation_attempts)
    }

    /// Checks the snake parameters shared by every way of creating a match.
    pub fn validate(&self) -> Result<(), MatchError> {
        for snake in &self.snakes {
            if !snake.speed.is_finite() || snake.speed <= 0.0 {
                return Err(MatchError::InvalidSpeed {
                    snake: snake.id.get(),
                    speed: snake.speed,
                });
            }
        }

        let [first, second] = &self.snakes;
        if first.id == second.id {
            return Err(MatchError::DuplicateSnakeId(first.id.get()));
        }
        if first.spawn == second.spawn {
            return Err(MatchError::SpawnsOverlap { cell: first.spawn });
        }

        Ok(())
    }
}
