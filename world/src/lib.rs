#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Star Sentry.
//!
//! The world owns every mutable piece of the simulation: the session phase,
//! the score and ammunition counters, the damped aim offset, the starfield
//! pool, and the projectile and target pools. Adapters and systems never
//! touch state directly; they submit [`Command`] values through [`apply`] and
//! read back snapshots through the [`query`] module.

use std::time::Duration;

use star_sentry_core::{
    AimOffset, Command, Event, GamePhase, ProjectileId, TargetDescriptor, TargetId, Viewport,
    WorldPoint, WELCOME_BANNER,
};

mod stars;
mod targets;

use stars::StarField;
use targets::TargetState;

const DEFAULT_STARTING_AMMO: u32 = 50;

/// Interpolation progress a projectile gains per tick.
const PROJECTILE_STEP: f32 = 0.05;

/// Horizontal distance from the viewport center to each cannon muzzle.
const CANNON_SPACING: f32 = 30.0;

/// Laser bolt in flight between a cannon muzzle and its captured aim point.
#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    start: WorldPoint,
    target: WorldPoint,
    progress: f32,
}

impl Projectile {
    fn position(&self) -> WorldPoint {
        self.start.lerp(self.target, self.progress)
    }
}

/// Represents the authoritative Star Sentry world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    phase: GamePhase,
    viewport: Viewport,
    clock: Duration,
    score: u32,
    ammo: u32,
    starting_ammo: u32,
    aim: AimOffset,
    aim_held: bool,
    stars: StarField,
    projectiles: Vec<Projectile>,
    targets: Vec<TargetState>,
    next_projectile_id: ProjectileId,
    next_target_id: TargetId,
}

impl World {
    /// Creates a new Star Sentry world idling before its first session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::Idle,
            viewport: Viewport::default(),
            clock: Duration::ZERO,
            score: 0,
            ammo: DEFAULT_STARTING_AMMO,
            starting_ammo: DEFAULT_STARTING_AMMO,
            aim: AimOffset::ZERO,
            aim_held: false,
            stars: StarField::new(),
            projectiles: Vec::new(),
            targets: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            next_target_id: TargetId::new(0),
        }
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn set_viewport(&mut self, viewport: Viewport, out_events: &mut Vec<Event>) {
        if viewport == self.viewport {
            return;
        }

        self.viewport = viewport;
        if viewport.has_area() && !self.stars.is_populated() {
            self.stars.populate(viewport);
        }
        out_events.push(Event::ViewportResized { viewport });
    }

    fn fire(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Running || self.ammo == 0 || !self.viewport.has_area() {
            return;
        }

        let aim_point = self.aim.aim_point(self.viewport);
        let center = self.viewport.center();
        let height = self.viewport.height;
        let left = self.launch_projectile(
            WorldPoint::new(center.x - CANNON_SPACING, height),
            aim_point,
        );
        let right = self.launch_projectile(
            WorldPoint::new(center.x + CANNON_SPACING, height),
            aim_point,
        );

        self.ammo -= 1;
        out_events.push(Event::VolleyFired {
            left,
            right,
            ammo_remaining: self.ammo,
        });

        if self.ammo == 0 {
            let final_score = self.score;
            self.set_phase(GamePhase::GameOver, out_events);
            out_events.push(Event::GameEnded { final_score });
        }
    }

    fn launch_projectile(&mut self, start: WorldPoint, target: WorldPoint) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.projectiles.push(Projectile {
            id,
            start,
            target,
            progress: 0.0,
        });
        id
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase == GamePhase::Paused {
            return;
        }

        self.clock = self.clock.saturating_add(dt);

        if self.stars.is_populated() {
            let speed = if self.phase.is_engine_on() {
                stars::ENGINE_STAR_SPEED
            } else {
                stars::IDLE_STAR_SPEED
            };
            self.stars.advance(speed, self.viewport);
        }

        if self.phase.is_simulating() {
            self.decay_aim();
            self.advance_projectiles(out_events);
            self.advance_targets(out_events);
        }

        out_events.push(Event::TimeAdvanced { dt });
    }

    fn decay_aim(&mut self) {
        if self.aim_held {
            self.aim_held = false;
            return;
        }
        self.aim = self.aim.decayed();
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        for projectile in self.projectiles.iter_mut() {
            projectile.progress += PROJECTILE_STEP;
        }

        let mut missed: Vec<ProjectileId> = Vec::new();
        self.projectiles.retain(|projectile| {
            if projectile.progress >= 1.0 {
                missed.push(projectile.id);
                false
            } else {
                true
            }
        });
        for projectile in missed {
            out_events.push(Event::ProjectileMissed { projectile });
        }
    }

    fn advance_targets(&mut self, out_events: &mut Vec<Event>) {
        for target in self.targets.iter_mut() {
            if target.is_live() {
                target.advance();
            }
        }

        let viewport = self.viewport;
        let clock = self.clock;
        let mut removals: Vec<Event> = Vec::new();
        self.targets.retain(|target| {
            if target.is_live() {
                if target.is_contained(viewport) {
                    return true;
                }
                removals.push(Event::TargetExited { target: target.id });
                false
            } else if target.explosion_finished(clock) {
                removals.push(Event::ExplosionFinished { target: target.id });
                false
            } else {
                true
            }
        });
        out_events.extend(removals);
    }

    fn spawn_target(&mut self, descriptor: TargetDescriptor, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Running {
            return;
        }

        let id = self.next_target_id;
        self.next_target_id = TargetId::new(id.get().wrapping_add(1));
        self.targets.push(TargetState::from_descriptor(id, descriptor));
        out_events.push(Event::TargetSpawned {
            target: id,
            kind: descriptor.kind,
        });
    }

    fn record_impact(
        &mut self,
        projectile: ProjectileId,
        target: TargetId,
        out_events: &mut Vec<Event>,
    ) {
        if !self.phase.is_simulating() {
            return;
        }

        let Some(projectile_index) = self
            .projectiles
            .iter()
            .position(|candidate| candidate.id == projectile)
        else {
            return;
        };
        let Some(target_index) = self
            .targets
            .iter()
            .position(|candidate| candidate.id == target)
        else {
            return;
        };
        if !self.targets[target_index].is_live() {
            return;
        }

        let _ = self.projectiles.remove(projectile_index);

        let remaining = {
            let state = &mut self.targets[target_index];
            state.health = state.health.after_hit();
            state.health
        };
        out_events.push(Event::TargetStruck {
            projectile,
            target,
            remaining_health: remaining,
        });

        if remaining.is_depleted() {
            let clock = self.clock;
            let state = &mut self.targets[target_index];
            state.mark_hit(clock);
            let kind = state.kind;
            let points = kind.points();
            self.score = self.score.saturating_add(points);
            out_events.push(Event::TargetDestroyed {
                target,
                kind,
                points,
            });
        }
    }

    fn reset_session(&mut self) {
        self.phase = GamePhase::Idle;
        self.clock = Duration::ZERO;
        self.score = 0;
        self.ammo = self.starting_ammo;
        self.aim = AimOffset::ZERO;
        self.aim_held = false;
        self.projectiles.clear();
        self.targets.clear();
        self.next_projectile_id = ProjectileId::new(0);
        self.next_target_id = TargetId::new(0);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Ill-timed commands (firing while idle, pausing while game-over, steering
/// while paused) are policy-clamped no-ops rather than errors.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetViewport { viewport } => world.set_viewport(viewport, out_events),
        Command::ConfigureLoadout { starting_ammo } => {
            if world.phase == GamePhase::Idle {
                world.starting_ammo = starting_ammo;
                world.ammo = starting_ammo;
            }
        }
        Command::StartEngines => {
            if world.phase == GamePhase::Idle {
                world.set_phase(GamePhase::Running, out_events);
            }
        }
        Command::Fire => world.fire(out_events),
        Command::Pause => {
            if world.phase == GamePhase::Running {
                world.set_phase(GamePhase::Paused, out_events);
            }
        }
        Command::Resume => {
            if world.phase == GamePhase::Paused {
                world.set_phase(GamePhase::Running, out_events);
            }
        }
        Command::Abort => {
            if matches!(world.phase, GamePhase::Paused | GamePhase::GameOver) {
                out_events.push(Event::SessionEnded {
                    final_score: world.score,
                });
            }
        }
        Command::NudgeAim { direction } => {
            if world.phase.is_simulating() {
                world.aim = world.aim.nudged(direction);
                world.aim_held = true;
            }
        }
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::SpawnTarget { descriptor } => world.spawn_target(descriptor, out_events),
        Command::RecordImpact { projectile, target } => {
            world.record_impact(projectile, target, out_events);
        }
        Command::ResetSession => world.reset_session(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use star_sentry_core::{
        AimOffset, GamePhase, HudSnapshot, ProjectileSnapshot, ProjectileView, StarProjection,
        TargetSnapshot, TargetView, Viewport, WorldPoint,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Viewport the simulation currently plays out in.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Points scored so far this session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Volleys remaining this session.
    #[must_use]
    pub fn ammo(world: &World) -> u32 {
        world.ammo
    }

    /// Simulated time accumulated since the world was created.
    #[must_use]
    pub fn simulation_clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures the HUD readouts in one snapshot.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot::new(world.phase, world.score, world.ammo)
    }

    /// Current damped aim offset.
    #[must_use]
    pub fn aim_offset(world: &World) -> AimOffset {
        world.aim
    }

    /// Point the cannons currently converge on.
    #[must_use]
    pub fn aim_point(world: &World) -> WorldPoint {
        world.aim.aim_point(world.viewport)
    }

    /// Number of stars currently pooled.
    #[must_use]
    pub fn star_count(world: &World) -> usize {
        world.stars.len()
    }

    /// Projects the starfield around the aim-shifted view center.
    #[must_use]
    pub fn star_projections(world: &World) -> Vec<StarProjection> {
        let view_center = world.aim.view_center(world.viewport);
        world.stars.projections(world.viewport, view_center)
    }

    /// Captures a read-only view of all projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                start: projectile.start,
                position: projectile.position(),
                target: projectile.target,
                progress: projectile.progress,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of all targets in the pool.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        let clock = world.clock;
        let snapshots: Vec<TargetSnapshot> = world
            .targets
            .iter()
            .map(|target| TargetSnapshot {
                id: target.id,
                kind: target.kind,
                position: target.position(),
                velocity: target.velocity,
                size: target.size,
                rotation: target.rotation,
                health: target.health,
                explosion_progress: target.explosion_progress(clock),
            })
            .collect();
        TargetView::from_snapshots(snapshots)
    }
}
