#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Star Sentry adapters.
//!
//! The simulation side populates a [`Scene`] every frame and a
//! [`RenderingBackend`] draws it. Backends never reach into the world; the
//! scene carries everything they need in screen-space terms.

use anyhow::Result as AnyResult;
use glam::Vec2;
use star_sentry_core::{Direction, GamePhase, HudSnapshot, TargetId, TargetKind, Viewport};
use std::time::Duration;

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

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the adapter detected a primary-action press on this frame.
    pub primary_pressed: bool,
    /// Whether the adapter detected a secondary-action press on this frame.
    pub secondary_pressed: bool,
    /// Steering keys held down for the duration of this frame.
    pub held: HeldDirections,
    /// Drawable surface dimensions measured on this frame, in pixels.
    pub viewport: Viewport,
}

/// Level-triggered steering state sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HeldDirections {
    /// Whether the up key is held.
    pub up: bool,
    /// Whether the down key is held.
    pub down: bool,
    /// Whether the left key is held.
    pub left: bool,
    /// Whether the right key is held.
    pub right: bool,
}

impl HeldDirections {
    /// Returns `true` when any steering key is held.
    #[must_use]
    pub const fn any(self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Iterates over the held directions in a fixed order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        [
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.left, Direction::Left),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .filter_map(|(held, direction)| held.then_some(direction))
    }
}

/// Single projected star ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPresentation {
    /// Screen-space position of the star dot.
    pub position: Vec2,
    /// Dot radius in pixels.
    pub size: f32,
    /// Brightness within `[0, 1]`; the backend maps it to alpha.
    pub brightness: f32,
}

impl StarPresentation {
    /// Creates a new star presentation descriptor.
    #[must_use]
    pub const fn new(position: Vec2, size: f32, brightness: f32) -> Self {
        Self {
            position,
            size,
            brightness,
        }
    }
}

/// Laser beam drawn from a cannon muzzle to the projectile's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamPresentation {
    /// Muzzle the projectile launched from.
    pub origin: Vec2,
    /// Current head of the beam.
    pub head: Vec2,
}

impl BeamPresentation {
    /// Creates a new beam presentation descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, head: Vec2) -> Self {
        Self { origin, head }
    }
}

/// Single target silhouette, either live or mid-explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPresentation {
    /// Identifier allocated to the target by the world.
    pub id: TargetId,
    /// Kind of the target; drives the silhouette the backend draws.
    pub kind: TargetKind,
    /// Screen-space center of the silhouette.
    pub position: Vec2,
    /// Silhouette size in pixels.
    pub size: f32,
    /// Accumulated rotation in radians.
    pub rotation: f32,
    /// Explosion progress within `[0, 1]` once destroyed, `None` while live.
    pub explosion: Option<f32>,
}

impl TargetPresentation {
    /// Creates a new target presentation descriptor.
    #[must_use]
    pub const fn new(
        id: TargetId,
        kind: TargetKind,
        position: Vec2,
        size: f32,
        rotation: f32,
        explosion: Option<f32>,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            rotation,
            explosion,
        }
    }
}

/// Scene description combining the starfield, beams, targets and HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport the scene was populated for.
    pub viewport: Viewport,
    /// Cockpit readouts mirrored from the world.
    pub hud: HudSnapshot,
    /// Projected starfield, back to front.
    pub stars: Vec<StarPresentation>,
    /// Laser beams currently in flight.
    pub beams: Vec<BeamPresentation>,
    /// Targets crossing the playfield.
    pub targets: Vec<TargetPresentation>,
    /// Aim reticle position while the engines are on.
    pub reticle: Option<Vec2>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        viewport: Viewport,
        hud: HudSnapshot,
        stars: Vec<StarPresentation>,
        beams: Vec<BeamPresentation>,
        targets: Vec<TargetPresentation>,
        reticle: Option<Vec2>,
    ) -> Self {
        Self {
            viewport,
            hud,
            stars,
            beams,
            targets,
            reticle,
        }
    }

    /// Creates an empty idle scene for the provided viewport.
    #[must_use]
    pub fn empty(viewport: Viewport) -> Self {
        Self::new(
            viewport,
            HudSnapshot::new(GamePhase::Idle, 0, 0),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Whether the frame loop should keep running after the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present the frame and continue with the next one.
    Continue,
    /// Present the frame, then shut the backend down cleanly.
    Exit,
}

/// Timing and control data returned by the per-frame update closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Loop directive decided by the simulation side.
    pub control: FrameControl,
    /// Time spent applying commands and advancing the world.
    pub simulation: Duration,
    /// Time spent rebuilding the scene from world queries.
    pub scene_population: Duration,
}

impl FrameReport {
    /// Creates a frame report from its channels.
    #[must_use]
    pub const fn new(
        control: FrameControl,
        simulation: Duration,
        scene_population: Duration,
    ) -> Self {
        Self {
            control,
            simulation,
            scene_population,
        }
    }
}

/// Rendering backend capable of presenting Star Sentry scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests an exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, mutates the scene in place,
    /// and reports loop control plus timing data for the frame metrics.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameReport + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_moves_channels_toward_white() {
        let color = Color::from_rgb_u8(100, 0, 255);
        let lightened = color.lighten(0.5);

        assert!(lightened.red > color.red);
        assert!(lightened.green > color.green);
        assert_eq!(lightened.blue, 1.0);
        assert_eq!(lightened.alpha, color.alpha);

        let clamped = color.lighten(2.0);
        assert_eq!(clamped.red, 1.0);
        assert_eq!(clamped.green, 1.0);
    }

    #[test]
    fn with_alpha_keeps_the_rgb_channels() {
        let faded = Color::from_rgb_u8(20, 40, 60).with_alpha(0.25);
        assert_eq!(faded.alpha, 0.25);
        assert_eq!(faded.red, 20.0 / 255.0);
    }

    #[test]
    fn held_directions_iterate_in_a_fixed_order() {
        let held = HeldDirections {
            up: true,
            down: false,
            left: true,
            right: false,
        };

        let directions: Vec<Direction> = held.directions().collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Left]);
        assert!(held.any());
        assert!(!HeldDirections::default().any());
    }

    #[test]
    fn empty_scenes_idle_with_no_inhabitants() {
        let viewport = Viewport::new(640.0, 480.0);
        let scene = Scene::empty(viewport);

        assert_eq!(scene.viewport, viewport);
        assert_eq!(scene.hud.phase, GamePhase::Idle);
        assert!(scene.stars.is_empty());
        assert!(scene.beams.is_empty());
        assert!(scene.targets.is_empty());
        assert!(scene.reticle.is_none());
    }

    #[test]
    fn scene_new_preserves_every_channel() {
        let viewport = Viewport::new(800.0, 600.0);
        let hud = HudSnapshot::new(GamePhase::Running, 4, 32);
        let stars = vec![StarPresentation::new(Vec2::new(10.0, 20.0), 1.5, 0.8)];
        let beams = vec![BeamPresentation::new(
            Vec2::new(370.0, 600.0),
            Vec2::new(385.0, 450.0),
        )];
        let targets = vec![TargetPresentation::new(
            TargetId::new(3),
            TargetKind::Craft,
            Vec2::new(120.0, 90.0),
            24.0,
            0.4,
            Some(0.5),
        )];

        let scene = Scene::new(
            viewport,
            hud,
            stars.clone(),
            beams.clone(),
            targets.clone(),
            Some(Vec2::new(400.0, 300.0)),
        );

        assert_eq!(scene.hud, hud);
        assert_eq!(scene.stars, stars);
        assert_eq!(scene.beams, beams);
        assert_eq!(scene.targets, targets);
        assert_eq!(scene.reticle, Some(Vec2::new(400.0, 300.0)));
    }
}
