//! Breadth-first reachability search over a static obstacle layout.

use std::collections::VecDeque;

use snake_duel_core::{Cell, Direction, ObstacleMap};

/// Reports whether `to` can be reached from `from` through free cells.
///
/// Movement is restricted to the four orthogonal neighbours. A start equal to
/// the destination is always reachable; a blocked start or destination never
/// is.
#[must_use]
pub fn is_reachable(map: &ObstacleMap, from: Cell, to: Cell) -> bool {
    if from == to {
        return true;
    }

    if map.is_blocked(from) || map.is_blocked(to) {
        return false;
    }

    let grid = map.grid();
    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();

    if let Some(start) = grid.index(from) {
        visited[start] = true;
        queue.push_back(from);
    }

    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let neighbor = cell.step(direction);
            if map.is_blocked(neighbor) {
                continue;
            }

            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            if neighbor == to {
                return true;
            }

            visited[neighbor_index] = true;
            queue.push_back(neighbor);
        }
    }

    false
}
