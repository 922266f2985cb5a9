//! Discrete turn state machine driving a single snake.

use std::time::Duration;

use snake_duel_core::{
    Cell, Direction, Position, SegmentSnapshot, SnakeColor, SnakeId, SnakeSnapshot, SnakeStatus,
};

use crate::config::SnakeConfig;

/// Remaining head distance below which a step is considered complete.
const ARRIVAL_EPSILON: f32 = 1e-2;

/// Reports whether a snake keeps its tail on the provided turn.
///
/// Turns are numbered from one. The first five turns always grow the snake,
/// afterwards only every third turn does (7, 10, 13, ...).
#[must_use]
pub fn grows_on_turn(turn: u32) -> bool {
    turn <= 5 || turn % 3 == 1
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    cell: Cell,
    position: Position,
}

impl Segment {
    fn at(cell: Cell) -> Self {
        Self {
            cell,
            position: cell.center(),
        }
    }
}

/// Result of a step that reached its target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StepCommit {
    pub(crate) head: Cell,
    pub(crate) grew: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Snake {
    id: SnakeId,
    color: SnakeColor,
    speed: f32,
    facing: Direction,
    status: SnakeStatus,
    body: Vec<Segment>,
    pending_direction: Option<Direction>,
    target: Option<Cell>,
    turn_count: u32,
}

impl Snake {
    pub(crate) fn spawn(config: &SnakeConfig) -> Self {
        Self {
            id: config.id,
            color: config.color,
            speed: config.speed,
            facing: config.facing,
            status: SnakeStatus::Idle,
            body: vec![Segment::at(config.spawn)],
            pending_direction: None,
            target: None,
            turn_count: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_body(config: &SnakeConfig, cells: &[Cell], turn_count: u32) -> Self {
        let mut snake = Self::spawn(config);
        snake.body = cells.iter().copied().map(Segment::at).collect();
        snake.turn_count = turn_count;
        snake
    }

    pub(crate) const fn id(&self) -> SnakeId {
        self.id
    }

    pub(crate) const fn status(&self) -> SnakeStatus {
        self.status
    }

    pub(crate) const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub(crate) fn head(&self) -> Cell {
        self.body[0].cell
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.pending_direction = Some(direction);
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.status == SnakeStatus::Idle && self.pending_direction.is_some()
    }

    /// Cells that stay occupied through a turn with the provided growth.
    ///
    /// A tail that is dropped at the end of the turn is not solid.
    pub(crate) fn solid_cells(&self, grows: bool) -> impl Iterator<Item = Cell> + '_ {
        let solid = if grows {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body[..solid].iter().map(|segment| segment.cell)
    }

    /// Commits the pending direction and returns the cell the head moves toward.
    ///
    /// # Panics
    ///
    /// Panics when the snake is not idle or has no pending direction; the
    /// world only begins turns once every snake is ready.
    pub(crate) fn begin_turn(&mut self) -> Cell {
        assert_eq!(
            self.status,
            SnakeStatus::Idle,
            "snake {} began a turn while not idle",
            self.id.get()
        );
        let Some(direction) = self.pending_direction.take() else {
            panic!(
                "snake {} began a turn without a pending direction",
                self.id.get()
            );
        };

        let head = self.body[0];
        let target = head.cell.step(direction);

        self.facing = direction;
        self.turn_count = self.turn_count.saturating_add(1);
        self.status = SnakeStatus::Moving;
        self.target = Some(target);
        self.body.insert(1, head);

        target
    }

    pub(crate) fn terminate(&mut self) {
        self.status = SnakeStatus::Terminated;
        self.target = None;
    }

    /// Interpolates the head toward its target, committing the step once it
    /// has arrived.
    pub(crate) fn advance_motion(&mut self, dt: Duration) -> Option<StepCommit> {
        if self.status != SnakeStatus::Moving {
            return None;
        }
        let target = self.target?;
        let grows = grows_on_turn(self.turn_count);

        if self.body[0].position.distance_to(target.center()) <= ARRIVAL_EPSILON {
            self.body[0] = Segment::at(target);
            self.target = None;
            self.status = SnakeStatus::Idle;
            if !grows {
                let _ = self.body.pop();
            }
            return Some(StepCommit {
                head: target,
                grew: grows,
            });
        }

        let amount = self.speed * dt.as_secs_f32();
        let head = &mut self.body[0];
        head.position = head.position.moved_toward(target.center(), amount);

        if !grows {
            if let [.., ahead, tail] = self.body.as_mut_slice() {
                tail.position = tail.position.moved_toward(ahead.cell.center(), amount);
            }
        }

        None
    }

    pub(crate) fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            id: self.id,
            color: self.color,
            status: self.status,
            facing: self.facing,
            turn_count: self.turn_count,
            body: self
                .body
                .iter()
                .map(|segment| SegmentSnapshot {
                    cell: segment.cell,
                    position: segment.position,
                })
                .collect(),
        }
    }
}
