//! Target kinematics, wave ride, and explosion lifecycle.

use std::time::Duration;

use star_sentry_core::{
    Health, TargetDescriptor, TargetId, TargetKind, Velocity, Viewport, WorldPoint,
};

/// Pixels a live target may drift past the viewport before removal.
pub(crate) const CONTAINMENT_MARGIN: f32 = 100.0;

/// Simulated time a destroyed target keeps exploding before leaving the pool.
pub(crate) const EXPLOSION_WINDOW: Duration = Duration::from_millis(300);

/// Target stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TargetState {
    /// Identifier allocated by the world for the target.
    pub(crate) id: TargetId,
    /// Kind profile the target was spawned with.
    pub(crate) kind: TargetKind,
    /// Constant drift applied while the target is live.
    pub(crate) velocity: Velocity,
    /// Collision and rendering size in pixels.
    pub(crate) size: f32,
    /// Accumulated silhouette rotation in radians.
    pub(crate) rotation: f32,
    /// Hits the target can still absorb.
    pub(crate) health: Health,
    base: WorldPoint,
    rotation_speed: f32,
    wave_phase: f32,
    wave_axis: Velocity,
    traveled: f32,
    hit_at: Option<Duration>,
}

impl TargetState {
    /// Materialises a target from a spawner descriptor.
    ///
    /// The wave axis is fixed at spawn time because the drift velocity never
    /// changes afterwards; rocks get a zero axis since their amplitude is 0.
    pub(crate) fn from_descriptor(id: TargetId, descriptor: TargetDescriptor) -> Self {
        let wave_axis = if descriptor.kind.wave_amplitude() > 0.0 {
            descriptor.velocity.unit_perpendicular()
        } else {
            Velocity::ZERO
        };
        Self {
            id,
            kind: descriptor.kind,
            velocity: descriptor.velocity,
            size: descriptor.size,
            rotation: 0.0,
            health: descriptor.kind.initial_health(),
            base: descriptor.position,
            rotation_speed: descriptor.rotation_speed,
            wave_phase: descriptor.wave_phase,
            wave_axis,
            traveled: 0.0,
            hit_at: None,
        }
    }

    /// Returns `true` while the target can still absorb hits.
    pub(crate) fn is_live(&self) -> bool {
        self.hit_at.is_none()
    }

    /// Advances one tick of drift, spin, and traveled distance.
    pub(crate) fn advance(&mut self) {
        self.base.x += self.velocity.dx;
        self.base.y += self.velocity.dy;
        self.traveled += self.velocity.magnitude();
        self.rotation += self.rotation_speed;
    }

    /// Display position including the perpendicular wave ride.
    pub(crate) fn position(&self) -> WorldPoint {
        let swing = self.kind.wave_amplitude()
            * (self.kind.wave_frequency() * self.traveled + self.wave_phase).sin();
        WorldPoint::new(
            self.base.x + self.wave_axis.dx * swing,
            self.base.y + self.wave_axis.dy * swing,
        )
    }

    /// Freezes the target and stamps the moment it was destroyed.
    pub(crate) fn mark_hit(&mut self, clock: Duration) {
        self.hit_at = Some(clock);
    }

    /// Explosion progress in `[0, 1]`, or `None` while the target is live.
    pub(crate) fn explosion_progress(&self, clock: Duration) -> Option<f32> {
        let hit_at = self.hit_at?;
        let elapsed = clock.saturating_sub(hit_at);
        Some((elapsed.as_secs_f32() / EXPLOSION_WINDOW.as_secs_f32()).min(1.0))
    }

    /// Returns `true` once the explosion window has fully elapsed.
    pub(crate) fn explosion_finished(&self, clock: Duration) -> bool {
        self.hit_at
            .map_or(false, |hit_at| clock.saturating_sub(hit_at) > EXPLOSION_WINDOW)
    }

    /// Returns `true` while the display position stays within the margin.
    pub(crate) fn is_contained(&self, viewport: Viewport) -> bool {
        viewport.contains_with_margin(self.position(), CONTAINMENT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{TargetState, EXPLOSION_WINDOW};
    use star_sentry_core::{
        Health, TargetDescriptor, TargetId, TargetKind, Velocity, Viewport, WorldPoint,
    };

    fn rock_descriptor() -> TargetDescriptor {
        TargetDescriptor::new(
            TargetKind::Rock,
            WorldPoint::new(-50.0, 120.0),
            Velocity::new(2.0, 0.5),
            30.0,
            0.04,
            0.0,
        )
    }

    #[test]
    fn rocks_drift_straight_without_wave_offset() {
        let mut target = TargetState::from_descriptor(TargetId::new(0), rock_descriptor());

        for _ in 0..10 {
            target.advance();
        }

        let position = target.position();
        assert!((position.x - -30.0).abs() < 1e-4);
        assert!((position.y - 125.0).abs() < 1e-4);
        assert!((target.rotation - 0.4).abs() < 1e-4);
    }

    #[test]
    fn craft_ride_the_wave_perpendicular_to_their_path() {
        let descriptor = TargetDescriptor::new(
            TargetKind::Craft,
            WorldPoint::new(0.0, 200.0),
            Velocity::new(1.0, 0.0),
            20.0,
            0.0,
            0.25,
        );
        let mut target = TargetState::from_descriptor(TargetId::new(1), descriptor);

        for _ in 0..40 {
            target.advance();
        }

        // Velocity (1, 0) makes the wave axis (0, 1); traveled distance is 40.
        let expected_swing = 50.0 * (0.02_f32 * 40.0 + 0.25).sin();
        let position = target.position();
        assert!((position.x - 40.0).abs() < 1e-3);
        assert!((position.y - (200.0 + expected_swing)).abs() < 1e-3);
    }

    #[test]
    fn hit_targets_freeze_and_report_explosion_progress() {
        let mut target = TargetState::from_descriptor(TargetId::new(2), rock_descriptor());
        target.health = Health::new(0);
        target.mark_hit(Duration::from_secs(5));

        assert!(!target.is_live());
        assert_eq!(target.explosion_progress(Duration::from_secs(5)), Some(0.0));

        let midway = Duration::from_secs(5) + EXPLOSION_WINDOW / 2;
        let progress = target
            .explosion_progress(midway)
            .expect("hit target reports progress");
        assert!((progress - 0.5).abs() < 1e-3);

        assert!(!target.explosion_finished(Duration::from_secs(5) + EXPLOSION_WINDOW));
        assert!(target.explosion_finished(
            Duration::from_secs(5) + EXPLOSION_WINDOW + Duration::from_millis(1)
        ));
    }

    #[test]
    fn containment_uses_the_margin_around_the_viewport() {
        let viewport = Viewport::new(400.0, 300.0);
        let descriptor = TargetDescriptor::new(
            TargetKind::Rock,
            WorldPoint::new(-99.0, 150.0),
            Velocity::new(-2.0, 0.0),
            25.0,
            0.0,
            0.0,
        );
        let mut target = TargetState::from_descriptor(TargetId::new(3), descriptor);

        assert!(target.is_contained(viewport));
        target.advance();
        assert!(!target.is_contained(viewport));
    }
}
