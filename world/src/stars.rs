//! Starfield pool management and perspective projection.

use star_sentry_core::{StarProjection, Viewport, WorldPoint};

/// Number of stars kept in the pool once the viewport gains area.
pub(crate) const STAR_COUNT: usize = 800;

/// Depth units shed per tick while the engines are off.
pub(crate) const IDLE_STAR_SPEED: f32 = 0.5;

/// Depth units shed per tick once the engines have started.
pub(crate) const ENGINE_STAR_SPEED: f32 = 20.0;

/// Largest projected dot size, reached as a star passes the cockpit.
const PROJECTED_SIZE_SCALE: f32 = 3.0;

const STAR_FIELD_SEED: u64 = 0x9d3c_5a17_44b2_0e6f;

/// One star inside the cockpit depth field.
#[derive(Clone, Copy, Debug)]
struct Star {
    x: f32,
    y: f32,
    z: f32,
}

/// Deterministic generator yielding uniform values in `[0, 1)`.
#[derive(Clone, Debug)]
pub(crate) struct UnitRandom {
    state: u64,
}

impl UnitRandom {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advances the generator and scales the top 24 bits into `[0, 1)`.
    pub(crate) fn next_unit(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        ((self.state >> 40) as f32) / ((1u32 << 24) as f32)
    }
}

/// Fixed pool of stars recycled through the depth range forever.
#[derive(Debug)]
pub(crate) struct StarField {
    stars: Vec<Star>,
    rng: UnitRandom,
}

impl StarField {
    /// Creates an empty field waiting for the first sized viewport.
    pub(crate) const fn new() -> Self {
        Self {
            stars: Vec::new(),
            rng: UnitRandom::new(STAR_FIELD_SEED),
        }
    }

    /// Returns `true` once the pool has been filled.
    pub(crate) fn is_populated(&self) -> bool {
        !self.stars.is_empty()
    }

    /// Number of stars currently pooled.
    pub(crate) fn len(&self) -> usize {
        self.stars.len()
    }

    /// Fills the pool with stars scattered through the viewport's depth range.
    ///
    /// The plane coordinates are centered on the view axis and the depth is
    /// drawn from `(0, max_depth]` so no star starts on the camera plane.
    pub(crate) fn populate(&mut self, viewport: Viewport) {
        let Self { stars, rng } = self;
        stars.clear();
        stars.reserve(STAR_COUNT);
        let max_depth = viewport.width;
        for _ in 0..STAR_COUNT {
            stars.push(Star {
                x: (rng.next_unit() - 0.5) * viewport.width,
                y: (rng.next_unit() - 0.5) * viewport.height,
                z: (1.0 - rng.next_unit()) * max_depth,
            });
        }
    }

    /// Moves every star toward the cockpit, recycling those that pass it.
    ///
    /// Recycled stars re-enter at the full depth with a fresh plane position,
    /// so the pool size never changes.
    pub(crate) fn advance(&mut self, speed: f32, viewport: Viewport) {
        let Self { stars, rng } = self;
        let max_depth = viewport.width;
        for star in stars.iter_mut() {
            star.z -= speed;
            if star.z <= 0.0 {
                star.x = (rng.next_unit() - 0.5) * viewport.width;
                star.y = (rng.next_unit() - 0.5) * viewport.height;
                star.z = max_depth;
            }
        }
    }

    /// Projects the pool onto the screen plane around `view_center`.
    ///
    /// Stars projecting outside the viewport, or deeper than the current
    /// maximum depth after a shrink, are skipped rather than drawn dark.
    pub(crate) fn projections(
        &self,
        viewport: Viewport,
        view_center: WorldPoint,
    ) -> Vec<StarProjection> {
        let max_depth = viewport.width;
        if max_depth <= 0.0 {
            return Vec::new();
        }

        let mut projections = Vec::with_capacity(self.stars.len());
        for star in &self.stars {
            if star.z <= 0.0 {
                continue;
            }

            let position = WorldPoint::new(
                (star.x / star.z) * viewport.width + view_center.x,
                (star.y / star.z) * viewport.height + view_center.y,
            );
            if !viewport.contains(position) {
                continue;
            }

            let closeness = 1.0 - star.z / max_depth;
            if closeness <= 0.0 {
                continue;
            }

            projections.push(StarProjection::new(
                position,
                closeness * PROJECTED_SIZE_SCALE,
                closeness.min(1.0),
            ));
        }
        projections
    }
}
