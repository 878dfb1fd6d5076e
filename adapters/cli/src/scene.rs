//! Rebuilds the presentation scene from world queries once per frame.

use glam::Vec2;
use star_sentry_core::WorldPoint;
use star_sentry_rendering::{BeamPresentation, Scene, StarPresentation, TargetPresentation};
use star_sentry_world::{query, World};

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Refreshes every scene channel in place from the current world state.
///
/// The scene's vectors are reused across frames, so population clears them
/// instead of reallocating.
pub(crate) fn populate(world: &World, scene: &mut Scene) {
    scene.viewport = query::viewport(world);
    scene.hud = query::hud(world);

    scene.stars.clear();
    scene.stars.extend(
        query::star_projections(world)
            .into_iter()
            .map(|star| StarPresentation::new(to_vec2(star.position), star.size, star.brightness)),
    );

    scene.beams.clear();
    scene
        .beams
        .extend(query::projectile_view(world).iter().map(|projectile| {
            BeamPresentation::new(to_vec2(projectile.start), to_vec2(projectile.position))
        }));

    scene.targets.clear();
    scene
        .targets
        .extend(query::target_view(world).iter().map(|target| {
            TargetPresentation::new(
                target.id,
                target.kind,
                to_vec2(target.position),
                target.size,
                target.rotation,
                target.explosion_progress,
            )
        }));

    scene.reticle = query::phase(world)
        .is_engine_on()
        .then(|| to_vec2(query::aim_point(world)));
}
