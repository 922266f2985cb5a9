#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Duel adapters.
//!
//! Every coordinate produced here is expressed in cell units with the origin
//! at the top-left corner of the grid; backends choose the pixel scale.

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_duel_core::{
    Cell, Direction, GridSize, MatchOutcome, ObstacleMap, Position, SnakeColor, SnakeId,
    SnakeSnapshot, SnakeStatus, SnakeView,
};
use std::time::Duration;

/// Radius of the circle drawn for each body segment.
pub const BODY_RADIUS: f32 = 0.4;
/// Width of the rectangle joining consecutive segments.
pub const LINK_WIDTH: f32 = 0.8;
/// Segments closer than this are drawn without a link.
pub const LINK_EPSILON: f32 = 1e-2;
/// Distance of each eye from the head center along both axes.
pub const EYE_OFFSET: f32 = 0.15;
/// Radius of each eye.
pub const EYE_RADIUS: f32 = 0.05;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<SnakeColor> for Color {
    fn from(color: SnakeColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Fixed colors for obstacles, eyes and terminated snakes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill of obstacle squares.
    pub obstacle: Color,
    /// Body fill of a terminated snake.
    pub terminated: Color,
    /// Fill of the eyes.
    pub eye: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            obstacle: Color::from_rgb_u8(0xb3, 0x72, 0x26),
            terminated: Color::from_rgb_u8(0x80, 0x80, 0x80),
            eye: Color::from_rgb_u8(0, 0, 0),
        }
    }
}

/// Filled circle expressed in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Center of the circle.
    pub center: Vec2,
    /// Radius of the circle.
    pub radius: f32,
}

/// Axis-aligned filled rectangle expressed in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Rect {
    /// Rectangle joining two segment centers, or `None` when they coincide.
    ///
    /// Segments never sit diagonally from each other, so the link runs along
    /// whichever axis separates them.
    #[must_use]
    pub fn link(from: Vec2, to: Vec2) -> Option<Self> {
        let delta = (to - from).abs();
        if delta.x < LINK_EPSILON && delta.y < LINK_EPSILON {
            return None;
        }

        let half_width = LINK_WIDTH / 2.0;
        let rect = if delta.x < LINK_EPSILON {
            Self {
                origin: Vec2::new(from.x - half_width, from.y.min(to.y)),
                size: Vec2::new(LINK_WIDTH, delta.y),
            }
        } else {
            Self {
                origin: Vec2::new(from.x.min(to.x), from.y - half_width),
                size: Vec2::new(delta.x, LINK_WIDTH),
            }
        };
        Some(rect)
    }
}

/// Eye offsets from the head center, in units of [`EYE_OFFSET`].
#[must_use]
pub const fn eye_offsets(facing: Direction) -> [(f32, f32); 2] {
    match facing {
        Direction::Up => [(-1.0, -1.0), (1.0, -1.0)],
        Direction::Right => [(1.0, -1.0), (1.0, 1.0)],
        Direction::Down => [(1.0, 1.0), (-1.0, 1.0)],
        Direction::Left => [(-1.0, 1.0), (-1.0, -1.0)],
    }
}

fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x(), position.y())
}

/// Drawable geometry of a single snake.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakePresentation {
    /// Identifier of the snake.
    pub id: SnakeId,
    /// Body fill, already greyed out for terminated snakes.
    pub color: Color,
    /// Lifecycle state carried through from the world.
    pub status: SnakeStatus,
    /// One circle per body segment, head first.
    pub segments: Vec<Circle>,
    /// Rectangles joining consecutive segments.
    pub links: Vec<Rect>,
    /// The two eyes drawn on the head.
    pub eyes: [Circle; 2],
}

impl SnakePresentation {
    /// Builds the geometry of a snake, returning `None` for an empty body.
    #[must_use]
    pub fn from_snapshot(snapshot: &SnakeSnapshot, palette: &Palette) -> Option<Self> {
        let head = to_vec2(snapshot.head()?.position);

        let centers: Vec<Vec2> = snapshot
            .body
            .iter()
            .map(|segment| to_vec2(segment.position))
            .collect();
        let segments = centers
            .iter()
            .map(|center| Circle {
                center: *center,
                radius: BODY_RADIUS,
            })
            .collect();
        let links = centers
            .windows(2)
            .filter_map(|pair| Rect::link(pair[0], pair[1]))
            .collect();
        let eyes = eye_offsets(snapshot.facing).map(|(dx, dy)| Circle {
            center: head + Vec2::new(dx, dy) * EYE_OFFSET,
            radius: EYE_RADIUS,
        });

        let color = match snapshot.status {
            SnakeStatus::Terminated => palette.terminated,
            SnakeStatus::Idle | SnakeStatus::Moving => Color::from(snapshot.color),
        };

        Some(Self {
            id: snapshot.id,
            color,
            status: snapshot.status,
            segments,
            links,
            eyes,
        })
    }
}

/// Scene description combining the grid, the obstacles and both snakes.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the playing field.
    pub grid: GridSize,
    /// Colors applied to static content.
    pub palette: Palette,
    /// Unit squares covering every obstacle cell.
    pub obstacles: Vec<Rect>,
    /// Snakes ordered by identifier.
    pub snakes: Vec<SnakePresentation>,
    /// Result of the match once it is decided.
    pub outcome: Option<MatchOutcome>,
}

impl Scene {
    /// Creates a scene from world snapshots.
    #[must_use]
    pub fn new(obstacles: &ObstacleMap, snakes: &SnakeView, outcome: Option<MatchOutcome>) -> Self {
        let palette = Palette::default();
        let mut scene = Self {
            grid: obstacles.grid(),
            palette,
            obstacles: obstacles.cells().map(obstacle_square).collect(),
            snakes: Vec::new(),
            outcome: None,
        };
        scene.refresh(snakes, outcome);
        scene
    }

    /// Replaces the dynamic content with fresh snapshots.
    pub fn refresh(&mut self, snakes: &SnakeView, outcome: Option<MatchOutcome>) {
        self.snakes = snakes
            .iter()
            .filter_map(|snapshot| SnakePresentation::from_snapshot(snapshot, &self.palette))
            .collect();
        self.outcome = outcome;
    }

    /// Total width of the scene in cell units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.grid.columns() as f32
    }

    /// Total height of the scene in cell units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.grid.rows() as f32
    }
}

fn obstacle_square(cell: Cell) -> Rect {
    Rect {
        origin: Vec2::new(cell.column() as f32, cell.row() as f32),
        size: Vec2::ONE,
    }
}

/// What the backend should do after a frame was updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Stop the frame loop and return from [`RenderingBackend::run`].
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Snake Duel scenes.
pub trait RenderingBackend {
    /// Runs the frame loop until the update closure asks to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and refreshes the scene from the world before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl + 'static;
}
