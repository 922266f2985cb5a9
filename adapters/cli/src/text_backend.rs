//! Headless rendering backend that prints scenes as text.

use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use snake_duel_core::{MatchOutcome, SnakeStatus};
use snake_duel_rendering::{FrameControl, Presentation, RenderingBackend, Scene};

const EMPTY: char = '.';
const OBSTACLE: char = '#';

/// Backend that simulates a bounded number of frames and prints the result.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextBackend {
    frames: u32,
    frame_duration: Duration,
}

impl TextBackend {
    pub(crate) const fn new(frames: u32, frame_duration: Duration) -> Self {
        Self {
            frames,
            frame_duration,
        }
    }
}

impl RenderingBackend for TextBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl + 'static,
    {
        let Presentation { title, mut scene } = presentation;

        let mut simulated = 0;
        while simulated < self.frames {
            simulated += 1;
            if update_scene(self.frame_duration, &mut scene) == FrameControl::Exit {
                break;
            }
        }

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{title} after {simulated} frames")
            .and_then(|()| write!(stdout, "{}", render_text(&scene)))
            .and_then(|()| writeln!(stdout, "{}", describe(&scene)))
            .context("failed to write scene to stdout")
    }
}

/// Rasterises the scene onto a character grid.
///
/// Obstacles are `#`, snake heads use an uppercase letter per snake and the
/// body the matching lowercase letter. Terminated heads are drawn as `x`.
pub(crate) fn render_text(scene: &Scene) -> String {
    let rows = scene.height() as usize;
    let columns = scene.width() as usize;
    let mut canvas = vec![vec![EMPTY; columns]; rows];

    let mut plot = |x: f32, y: f32, symbol: char| {
        if x < 0.0 || y < 0.0 {
            return;
        }
        if let Some(cell) = canvas
            .get_mut(y.floor() as usize)
            .and_then(|row| row.get_mut(x.floor() as usize))
        {
            *cell = symbol;
        }
    };

    for square in &scene.obstacles {
        plot(square.origin.x, square.origin.y, OBSTACLE);
    }

    for (index, snake) in scene.snakes.iter().enumerate() {
        let letter = char::from(b'a' + (index % 26) as u8);
        for segment in snake.segments.iter().skip(1).rev() {
            plot(segment.center.x, segment.center.y, letter);
        }
        if let Some(head) = snake.segments.first() {
            let symbol = match snake.status {
                SnakeStatus::Terminated => 'x',
                SnakeStatus::Idle | SnakeStatus::Moving => letter.to_ascii_uppercase(),
            };
            plot(head.center.x, head.center.y, symbol);
        }
    }

    let mut text = String::with_capacity(rows * (columns + 1));
    for row in canvas {
        text.extend(row);
        text.push('\n');
    }
    text
}

fn describe(scene: &Scene) -> String {
    match scene.outcome {
        None => "match still running".to_owned(),
        Some(MatchOutcome::Draw) => "match ended in a draw".to_owned(),
        Some(MatchOutcome::Winner(id)) => format!("snake {} wins", id.get()),
    }
}
