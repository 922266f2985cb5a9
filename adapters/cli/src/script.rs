//! Scripted steering used in place of live keyboard input.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use snake_duel_core::Direction;

/// Sequence of directions issued to one snake, one per turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Script {
    directions: Vec<Direction>,
}

impl FromStr for Script {
    type Err = anyhow::Error;

    /// Accepts numeric codes (`0` up, `1` right, `2` down, `3` left) or the
    /// letters `u`, `r`, `d`, `l`. Whitespace and commas are ignored.
    fn from_str(value: &str) -> Result<Self> {
        let mut directions = Vec::new();
        for symbol in value.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            let direction = match symbol.to_ascii_lowercase() {
                'u' => Direction::Up,
                'r' => Direction::Right,
                'd' => Direction::Down,
                'l' => Direction::Left,
                digit @ '0'..='9' => {
                    let code = digit as u8 - b'0';
                    Direction::try_from(code)
                        .with_context(|| format!("invalid direction in script {value:?}"))?
                }
                other => bail!("unexpected symbol {other:?} in script {value:?}"),
            };
            directions.push(direction);
        }
        Ok(Self { directions })
    }
}

/// Tracks how far a snake has progressed through its script.
#[derive(Clone, Debug)]
pub(crate) struct Steering {
    script: Script,
    next: usize,
    hold: bool,
}

impl Steering {
    pub(crate) fn new(script: Script, hold: bool) -> Self {
        Self {
            script,
            next: 0,
            hold,
        }
    }

    /// Direction to issue this frame, if any.
    ///
    /// Once the script runs out a held steering keeps repeating its last entry.
    pub(crate) fn current(&self) -> Option<Direction> {
        match self.script.directions.get(self.next) {
            Some(direction) => Some(*direction),
            None if self.hold => self.script.directions.last().copied(),
            None => None,
        }
    }

    pub(crate) fn turn_started(&mut self) {
        self.next = self.next.saturating_add(1);
    }
}
