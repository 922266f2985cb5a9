#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised, point-symmetric obstacle layouts with a connectivity guarantee.
//!
//! Every layout is walled in along the outer ring and scattered with interior
//! obstacles placed in mirrored pairs, so neither spawn is favoured. A layout
//! is only accepted when a flood fill from the first spawn reaches the second;
//! otherwise the attempt is thrown away and generation starts over until the
//! configured attempt budget runs out.

mod reachability;

use rand::Rng;
use snake_duel_core::{Cell, GridSize, ObstacleMap};
use thiserror::Error;
use tracing::{debug, trace, warn};

pub use reachability::is_reachable;

/// Number of full generate-and-verify attempts made before giving up.
pub const DEFAULT_ATTEMPT_BUDGET: u32 = 100;

/// Reasons a layout cannot be produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The grid has no cell inside its walls.
    #[error("a {rows}x{columns} grid has no interior cells")]
    GridTooSmall {
        /// Configured row count.
        rows: u32,
        /// Configured column count.
        columns: u32,
    },
    /// A spawn lies on the wall ring or outside the grid.
    #[error("spawn cell {cell} does not lie inside the walls")]
    SpawnOutsideInterior {
        /// Offending spawn cell.
        cell: Cell,
    },
    /// Both snakes were configured to spawn on the same cell.
    #[error("both snakes spawn at {cell}")]
    SpawnsOverlap {
        /// Shared spawn cell.
        cell: Cell,
    },
    /// The attempt budget was configured as zero.
    #[error("the generation attempt budget must be positive")]
    ZeroAttemptBudget,
    /// Every attempt produced a layout that separated the spawns.
    #[error("no connected layout found after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts that were made.
        attempts: u32,
    },
}

/// Configuration parameters required to construct the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    grid: GridSize,
    inner_obstacle_count: u32,
    spawns: [Cell; 2],
    attempt_budget: u32,
}

impl Config {
    /// Creates a new configuration using the default attempt budget.
    #[must_use]
    pub const fn new(grid: GridSize, inner_obstacle_count: u32, spawns: [Cell; 2]) -> Self {
        Self {
            grid,
            inner_obstacle_count,
            spawns,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
        }
    }

    /// Replaces the number of whole-layout attempts.
    #[must_use]
    pub const fn with_attempt_budget(mut self, attempt_budget: u32) -> Self {
        self.attempt_budget = attempt_budget;
        self
    }

    /// Dimensions of the generated layout.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Requested number of interior obstacles, placed in mirrored pairs.
    #[must_use]
    pub const fn inner_obstacle_count(&self) -> u32 {
        self.inner_obstacle_count
    }

    /// Spawn cells that must stay free and connected.
    #[must_use]
    pub const fn spawns(&self) -> [Cell; 2] {
        self.spawns
    }

    /// Number of whole-layout attempts before generation fails.
    #[must_use]
    pub const fn attempt_budget(&self) -> u32 {
        self.attempt_budget
    }
}

/// Generator producing validated obstacle layouts.
#[derive(Clone, Debug)]
pub struct MapGenerator {
    config: Config,
}

impl MapGenerator {
    /// Creates a generator after validating the layout geometry.
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        let grid = config.grid;
        if grid.rows() < 3 || grid.columns() < 3 {
            return Err(GenerationError::GridTooSmall {
                rows: grid.rows(),
                columns: grid.columns(),
            });
        }

        for cell in config.spawns {
            if !grid.is_interior(cell) {
                return Err(GenerationError::SpawnOutsideInterior { cell });
            }
        }

        let [first, second] = config.spawns;
        if first == second {
            return Err(GenerationError::SpawnsOverlap { cell: first });
        }

        if config.attempt_budget == 0 {
            return Err(GenerationError::ZeroAttemptBudget);
        }

        Ok(Self { config })
    }

    /// Configuration the generator was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Produces a layout in which the two spawns are connected.
    ///
    /// Fails with [`GenerationError::AttemptsExhausted`] once every attempt in
    /// the budget produced a disconnected layout.
    pub fn generate<R>(&self, rng: &mut R) -> Result<ObstacleMap, GenerationError>
    where
        R: Rng,
    {
        let [first, second] = self.config.spawns;

        for attempt in 1..=self.config.attempt_budget {
            let map = self.scatter(rng);
            if is_reachable(&map, first, second) {
                debug!(
                    attempt,
                    obstacles = map.len(),
                    "generated connected obstacle layout"
                );
                return Ok(map);
            }
            debug!(attempt, "discarding layout that separates the spawns");
        }

        warn!(
            attempts = self.config.attempt_budget,
            "exhausted obstacle layout attempts"
        );
        Err(GenerationError::AttemptsExhausted {
            attempts: self.config.attempt_budget,
        })
    }

    fn scatter<R>(&self, rng: &mut R) -> ObstacleMap
    where
        R: Rng,
    {
        let grid = self.config.grid;
        let mut map = ObstacleMap::bordered(grid);
        let rows = grid.rows() as i32;
        let columns = grid.columns() as i32;
        let retries = grid.cell_count();

        for pair in 0..self.config.inner_obstacle_count / 2 {
            let placed = (0..retries).any(|_| {
                let cell = Cell::new(rng.gen_range(1..rows - 1), rng.gen_range(1..columns - 1));
                if !self.accepts(&map, cell) {
                    return false;
                }
                let _ = map.block(cell);
                let _ = map.block(grid.mirror(cell));
                true
            });

            if !placed {
                trace!(pair, "skipping obstacle pair after exhausting placement retries");
            }
        }

        map
    }

    fn accepts(&self, map: &ObstacleMap, cell: Cell) -> bool {
        let mirror = self.config.grid.mirror(cell);
        let spawns = &self.config.spawns;
        !map.is_blocked(cell)
            && !map.is_blocked(mirror)
            && !spawns.contains(&cell)
            && !spawns.contains(&mirror)
    }
}
