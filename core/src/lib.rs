#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Duel engine.
//!
//! This crate defines the value types and the message surface that connect
//! adapters with the authoritative world. Input adapters submit [`Command`]
//! values, the world executes them through its `apply` entry point and reports
//! what happened as [`Event`] values. Renderers read immutable snapshots such
//! as [`SnakeView`] and [`ObstacleMap`]; every continuous coordinate is
//! expressed in cell units where `index + 0.5` is the center of a cell.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Buffers the next direction for a snake. The last write before a turn wins.
    SetDirection {
        /// Identifier of the snake being steered.
        snake: SnakeId,
        /// Direction the snake should take on its next turn.
        direction: Direction,
    },
    /// Advances the simulation by one rendered frame.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a direction was buffered for the snake's next turn.
    DirectionQueued {
        /// Identifier of the steered snake.
        snake: SnakeId,
        /// Direction that will be consumed by the next turn.
        direction: Direction,
    },
    /// Reports that a direction targeted a snake the world does not know.
    DirectionRejected {
        /// Identifier supplied by the input adapter.
        snake: SnakeId,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Announces that a snake committed a discrete step.
    TurnStarted {
        /// Identifier of the snake that started moving.
        snake: SnakeId,
        /// Turn number reached by the snake, starting at one.
        turn: u32,
        /// Cell the head occupied before the turn.
        from: Cell,
        /// Cell the head moves toward.
        to: Cell,
    },
    /// Reports that a snake collided and left play.
    SnakeTerminated {
        /// Identifier of the snake that collided.
        snake: SnakeId,
        /// Cell the head attempted to enter.
        at: Cell,
    },
    /// Confirms that a snake's head arrived at its target cell.
    StepCompleted {
        /// Identifier of the snake that finished the step.
        snake: SnakeId,
        /// Cell now occupied by the head.
        head: Cell,
        /// Whether the tail was retained on this turn.
        grew: bool,
    },
    /// Announces that at least one snake terminated and the match is decided.
    MatchEnded {
        /// Final result of the match.
        outcome: MatchOutcome,
    },
}

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    /// Every snake terminated on the same turn.
    Draw,
    /// Exactly one snake survived.
    Winner(SnakeId),
}

/// Errors produced when decoding directions from adapter input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// The numeric code lies outside `0..=3`.
    #[error("direction code {0} is not one of 0 (up), 1 (right), 2 (down) or 3 (left)")]
    UnknownCode(u8),
}

/// Cardinal movement directions available to snakes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction ordered by its numeric code.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Decodes the numeric code used by input adapters (0=Up, 1=Right, 2=Down, 3=Left).
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// Numeric code of the direction.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Unit offset applied to a cell, expressed as `(row, column)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or(DirectionError::UnknownCode(value))
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: i32,
    column: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Horizontal coordinate of the cell center.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.column as f32 + 0.5
    }

    /// Vertical coordinate of the cell center.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.row as f32 + 0.5
    }

    /// Continuous position of the cell center.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.x(), self.y())
    }

    /// Neighbouring cell one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (row, column) = direction.offset();
        Self::new(self.row + row, self.column + column)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Continuous coordinate measured in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from its horizontal and vertical components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves toward `target` by at most `amount`, never overshooting it.
    #[must_use]
    pub fn moved_toward(self, target: Position, amount: f32) -> Self {
        let distance = self.distance_to(target);
        if distance <= amount || distance == 0.0 {
            return target;
        }

        let ratio = amount / distance;
        Self::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        )
    }
}

/// Unique identifier assigned to a snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(u32);

impl SnakeId {
    /// Creates a new snake identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visual appearance applied to a snake. Opaque to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnakeColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl SnakeColor {
    /// Creates a new snake color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Discrete lifecycle state of a snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnakeStatus {
    /// Waiting for the next turn.
    Idle,
    /// Interpolating toward the target cell of the current turn.
    Moving,
    /// Collided with an obstacle or a snake body. Absorbing.
    Terminated,
}

/// Dimensions of the playing field measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row() >= 0
            && cell.column() >= 0
            && (cell.row() as u32) < self.rows
            && (cell.column() as u32) < self.columns
    }

    /// Reports whether the cell lies on the outermost ring of the grid.
    #[must_use]
    pub fn is_border(&self, cell: Cell) -> bool {
        self.contains(cell)
            && (cell.row() == 0
                || cell.column() == 0
                || cell.row() as u32 == self.rows - 1
                || cell.column() as u32 == self.columns - 1)
    }

    /// Reports whether the cell lies inside the grid but off the border.
    #[must_use]
    pub fn is_interior(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.is_border(cell)
    }

    /// Point-symmetric counterpart of the cell about the grid center.
    #[must_use]
    pub fn mirror(&self, cell: Cell) -> Cell {
        Cell::new(
            self.rows as i32 - 1 - cell.row(),
            self.columns as i32 - 1 - cell.column(),
        )
    }

    /// Row-major index of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Static set of impassable cells produced once per match.
///
/// Cells outside the grid are reported as blocked so that a head leaving the
/// field always collides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMap {
    grid: GridSize,
    blocked: Vec<bool>,
}

impl ObstacleMap {
    /// Creates an obstacle map without any blocked cell.
    #[must_use]
    pub fn empty(grid: GridSize) -> Self {
        Self {
            grid,
            blocked: vec![false; grid.cell_count()],
        }
    }

    /// Creates an obstacle map whose outer ring is entirely blocked.
    #[must_use]
    pub fn bordered(grid: GridSize) -> Self {
        let mut map = Self::empty(grid);
        for row in 0..grid.rows() as i32 {
            for column in 0..grid.columns() as i32 {
                let cell = Cell::new(row, column);
                if grid.is_border(cell) {
                    let _ = map.block(cell);
                }
            }
        }
        map
    }

    /// Dimensions of the underlying grid.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Marks the cell as blocked, returning whether it was previously free.
    ///
    /// Cells outside the grid are ignored.
    pub fn block(&mut self, cell: Cell) -> bool {
        match self.grid.index(cell) {
            Some(index) => !std::mem::replace(&mut self.blocked[index], true),
            None => false,
        }
    }

    /// Reports whether the cell is impassable.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.grid
            .index(cell)
            .map_or(true, |index| self.blocked[index])
    }

    /// Blocked cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let columns = self.grid.columns().max(1) as usize;
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .map(move |(index, _)| Cell::new((index / columns) as i32, (index % columns) as i32))
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocked.iter().filter(|blocked| **blocked).count()
    }

    /// Reports whether no cell is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single body segment captured for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnapshot {
    /// Discrete cell the segment belongs to.
    pub cell: Cell,
    /// Continuous position, lagging the cell while the snake moves.
    pub position: Position,
}

/// Immutable representation of a single snake used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeSnapshot {
    /// Unique identifier assigned to the snake.
    pub id: SnakeId,
    /// Appearance configured for the snake.
    pub color: SnakeColor,
    /// Lifecycle state of the snake.
    pub status: SnakeStatus,
    /// Last committed direction, used to orient the eyes.
    pub facing: Direction,
    /// Number of turns committed so far.
    pub turn_count: u32,
    /// Body segments ordered from head to tail.
    pub body: Vec<SegmentSnapshot>,
}

impl SnakeSnapshot {
    /// Head segment of the snake.
    #[must_use]
    pub fn head(&self) -> Option<&SegmentSnapshot> {
        self.body.first()
    }
}

/// Read-only snapshot describing every snake in the match.
#[derive(Clone, Debug, Default)]
pub struct SnakeView {
    snapshots: Vec<SnakeSnapshot>,
}

impl SnakeView {
    /// Creates a new snake view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SnakeSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SnakeSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the snake with the provided identifier.
    #[must_use]
    pub fn get(&self, id: SnakeId) -> Option<&SnakeSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }
}
