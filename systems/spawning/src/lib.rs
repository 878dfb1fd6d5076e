#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting target spawn commands.
//!
//! The spawner owns the only randomness in the session. Every decision it
//! makes is a draw from an injected [`UniformSource`], so a seeded source
//! replays the exact same stream of targets for the exact same tick script.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use star_sentry_core::{
    Command, Event, GamePhase, TargetDescriptor, TargetKind, Velocity, Viewport, WorldPoint,
};

/// Distance outside the chosen viewport edge where targets materialise.
const EDGE_OFFSET: f32 = 50.0;

/// Smallest per-tick speed a target can spawn with.
const MIN_SPEED: f32 = 1.0;

/// Width of the uniform speed range above [`MIN_SPEED`].
const SPEED_SPREAD: f32 = 1.5;

/// Width of the uniform rotation speed range, centered on zero.
const ROTATION_SPREAD: f32 = 0.1;

/// Source of uniformly distributed values in the half-open `[0, 1)` range.
pub trait UniformSource {
    /// Draws the next unit-interval value.
    fn next_unit(&mut self) -> f32;
}

/// ChaCha-backed uniform source that replays one stream per seed.
#[derive(Clone, Debug)]
pub struct SeededUniform {
    rng: ChaCha8Rng,
}

impl SeededUniform {
    /// Creates a source whose draw stream is fully determined by the seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl UniformSource for SeededUniform {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    min_gap: Duration,
    max_gap: Duration,
}

impl Config {
    /// Creates a configuration from a half-open spawn gap range.
    #[must_use]
    pub const fn new(min_gap: Duration, max_gap: Duration) -> Self {
        Self { min_gap, max_gap }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(2))
    }
}

/// Viewport edge a target can enter from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    fn select(unit: f32) -> Self {
        match (unit * 4.0) as u32 {
            0 => Self::Top,
            1 => Self::Right,
            2 => Self::Bottom,
            _ => Self::Left,
        }
    }

    /// Resolves the entry point and inward velocity for this edge.
    ///
    /// `along` places the entry on the edge, `speed` drives the inward
    /// component and `drift` rides the perpendicular one.
    fn entry(
        self,
        viewport: Viewport,
        along: f32,
        speed: f32,
        drift: f32,
    ) -> (WorldPoint, Velocity) {
        match self {
            Self::Top => (
                WorldPoint::new(along * viewport.width, -EDGE_OFFSET),
                Velocity::new(drift, speed),
            ),
            Self::Right => (
                WorldPoint::new(viewport.width + EDGE_OFFSET, along * viewport.height),
                Velocity::new(-speed, drift),
            ),
            Self::Bottom => (
                WorldPoint::new(along * viewport.width, viewport.height + EDGE_OFFSET),
                Velocity::new(drift, -speed),
            ),
            Self::Left => (
                WorldPoint::new(-EDGE_OFFSET, along * viewport.height),
                Velocity::new(speed, drift),
            ),
        }
    }
}

/// Pure system that deterministically emits spawn commands while running.
#[derive(Debug)]
pub struct Spawning<R> {
    min_gap: Duration,
    max_gap: Duration,
    accumulator: Duration,
    rng: R,
}

impl<R: UniformSource> Spawning<R> {
    /// Creates a new spawning system from a configuration and a draw source.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            min_gap: config.min_gap,
            max_gap: config.max_gap,
            accumulator: Duration::ZERO,
            rng,
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// At most one target spawns per call. Phases other than `Running`
    /// reset the gap accumulator so a resumed session starts a fresh gap.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        viewport: Viewport,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if !viewport.has_area() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let gap = self.draw_gap();
        if self.accumulator > gap {
            self.accumulator = Duration::ZERO;
            let descriptor = self.draw_descriptor(viewport);
            out.push(Command::SpawnTarget { descriptor });
        }
    }

    /// Draws a fresh spawn gap from the configured range.
    fn draw_gap(&mut self) -> Duration {
        let span = self.max_gap.saturating_sub(self.min_gap);
        self.min_gap.saturating_add(span.mul_f32(self.rng.next_unit()))
    }

    /// Draws one target, consuming the source in a fixed order: kind, edge,
    /// position along the edge, speed, perpendicular drift, size, rotation
    /// speed, wave phase.
    fn draw_descriptor(&mut self, viewport: Viewport) -> TargetDescriptor {
        let kind = if self.rng.next_unit() < 0.5 {
            TargetKind::Rock
        } else {
            TargetKind::Craft
        };
        let edge = Edge::select(self.rng.next_unit());
        let along = self.rng.next_unit();
        let speed = MIN_SPEED + self.rng.next_unit() * SPEED_SPREAD;
        let drift = (self.rng.next_unit() - 0.5) * speed;
        let (min_size, max_size) = kind.size_range();
        let size = min_size + self.rng.next_unit() * (max_size - min_size);
        let rotation_speed = (self.rng.next_unit() - 0.5) * ROTATION_SPREAD;
        let wave_phase = self.rng.next_unit() * TAU;
        let (position, velocity) = edge.entry(viewport, along, speed, drift);

        TargetDescriptor::new(kind, position, velocity, size, rotation_speed, wave_phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a scripted list of draws, panicking once exhausted.
    struct ScriptedUniform {
        values: Vec<f32>,
        index: usize,
    }

    impl ScriptedUniform {
        fn new(values: Vec<f32>) -> Self {
            Self { values, index: 0 }
        }
    }

    impl UniformSource for ScriptedUniform {
        fn next_unit(&mut self) -> f32 {
            let value = self.values[self.index];
            self.index += 1;
            value
        }
    }

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn edge_selection_covers_all_four_quadrants() {
        assert_eq!(Edge::select(0.0), Edge::Top);
        assert_eq!(Edge::select(0.26), Edge::Right);
        assert_eq!(Edge::select(0.51), Edge::Bottom);
        assert_eq!(Edge::select(0.76), Edge::Left);
        assert_eq!(Edge::select(0.999_999), Edge::Left);
    }

    #[test]
    fn scripted_draws_map_to_the_documented_order() {
        let script = vec![0.7, 0.3, 0.5, 0.0, 0.75, 0.0, 0.5, 0.25];
        let mut spawning = Spawning::new(Config::default(), ScriptedUniform::new(script));

        let descriptor = spawning.draw_descriptor(VIEWPORT);

        assert_eq!(descriptor.kind, TargetKind::Craft);
        assert_eq!(descriptor.position, WorldPoint::new(850.0, 300.0));
        assert_eq!(descriptor.velocity, Velocity::new(-1.0, 0.25));
        assert_eq!(descriptor.size, 15.0);
        assert_eq!(descriptor.rotation_speed, 0.0);
        assert!((descriptor.wave_phase - TAU * 0.25).abs() < 1e-6);
    }

    #[test]
    fn gap_draws_stay_inside_the_configured_range() {
        let script = vec![0.0, 0.999];
        let mut spawning = Spawning::new(Config::default(), ScriptedUniform::new(script));

        assert_eq!(spawning.draw_gap(), Duration::from_secs(1));
        let near_top = spawning.draw_gap();
        assert!(near_top > Duration::from_secs(1));
        assert!(near_top < Duration::from_secs(2));
    }
}
