//! Symmetric collision resolution for simultaneous turns.

use std::collections::HashSet;

use snake_duel_core::{Cell, ObstacleMap};

use crate::snake::{grows_on_turn, Snake};

/// Cells occupied by every snake before a turn begins.
///
/// The frame is captured before any snake moves so that both heads are judged
/// against the same board regardless of iteration order.
#[derive(Debug, Default)]
pub(crate) struct CollisionFrame {
    solid: HashSet<Cell>,
}

impl CollisionFrame {
    pub(crate) fn capture(snakes: &[Snake]) -> Self {
        let mut solid = HashSet::new();
        for snake in snakes {
            let grows = grows_on_turn(snake.turn_count().saturating_add(1));
            solid.extend(snake.solid_cells(grows));
        }
        Self { solid }
    }

    /// Flags every target that ends its snake's run.
    ///
    /// A target collides when it is an obstacle, lies on a body cell that
    /// survives the turn, or is shared with another snake's target.
    pub(crate) fn resolve(&self, obstacles: &ObstacleMap, targets: &[Cell]) -> Vec<bool> {
        targets
            .iter()
            .enumerate()
            .map(|(index, target)| {
                obstacles.is_blocked(*target)
                    || self.solid.contains(target)
                    || targets
                        .iter()
                        .enumerate()
                        .any(|(other, cell)| other != index && cell == target)
            })
            .collect()
    }
}
