#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Snake Duel match.

mod script;
mod text_backend;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_duel_core::{Command, Event, SnakeId, SnakeStatus};
use snake_duel_rendering::{FrameControl, Presentation, RenderingBackend, Scene};
use snake_duel_world::{apply, query, MatchConfig, World};
use tracing::info;

use crate::{
    script::{Script, Steering},
    text_backend::TextBackend,
};

#[derive(Parser, Debug)]
#[command(name = "snake-duel", about = "Play a scripted two-player snake match")]
struct Args {
    /// TOML file overriding the default match configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the obstacle layout; a random seed is logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated duration of one frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Directions for the first snake, one per turn (codes 0-3 or u/r/d/l)
    #[arg(long, default_value = "u")]
    first: Script,

    /// Directions for the second snake, one per turn (codes 0-3 or u/r/d/l)
    #[arg(long, default_value = "d")]
    second: Script,

    /// Keep repeating the last scripted direction once a script runs out
    #[arg(long)]
    hold: bool,
}

/// Entry point for the Snake Duel command-line interface.
fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "generating match");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let world = World::new(&config, &mut rng).context("failed to create match")?;
    let scene = Scene::new(
        query::obstacles(&world),
        &query::snake_view(&world),
        query::outcome(&world),
    );

    let ids = [config.snakes[0].id, config.snakes[1].id];
    let steering = [
        Steering::new(args.first, args.hold),
        Steering::new(args.second, args.hold),
    ];
    let driver = Driver::new(world, ids, steering);

    TextBackend::new(args.frames, Duration::from_millis(args.frame_ms)).run(
        Presentation::new(format!("snake duel (seed {seed})"), scene),
        driver.into_update(),
    )
}

fn load_config(path: Option<&PathBuf>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Feeds scripted directions into the world and mirrors it into the scene.
///
/// Directions are only issued to idle snakes, once per pending turn.
struct Driver {
    world: World,
    ids: [SnakeId; 2],
    steering: [Steering; 2],
    events: Vec<Event>,
}

impl Driver {
    fn new(world: World, ids: [SnakeId; 2], steering: [Steering; 2]) -> Self {
        Self {
            world,
            ids,
            steering,
            events: Vec::new(),
        }
    }

    fn frame(&mut self, dt: Duration, scene: &mut Scene) -> FrameControl {
        self.events.clear();
        for (id, steering) in self.ids.iter().zip(&self.steering) {
            let idle = query::snake(&self.world, *id)
                .is_some_and(|snake| snake.status == SnakeStatus::Idle);
            if !idle {
                continue;
            }
            if let Some(direction) = steering.current() {
                apply(
                    &mut self.world,
                    Command::SetDirection {
                        snake: *id,
                        direction,
                    },
                    &mut self.events,
                );
            }
        }
        apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        for event in &self.events {
            if let Event::TurnStarted { snake, .. } = event {
                if let Some(index) = self.ids.iter().position(|id| id == snake) {
                    self.steering[index].turn_started();
                }
            }
        }

        scene.refresh(&query::snake_view(&self.world), query::outcome(&self.world));
        let settled = scene
            .snakes
            .iter()
            .all(|snake| snake.status != SnakeStatus::Moving);
        if scene.outcome.is_some() && settled {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        }
    }

    fn into_update(mut self) -> impl FnMut(Duration, &mut Scene) -> FrameControl + 'static {
        move |dt, scene| self.frame(dt, scene)
    }
}
