#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Star Sentry engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches. The cockpit
//! math several crates must agree on (aim damping, projectile interpolation,
//! containment margins) lives here so it exists exactly once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Star Sentry cockpit online.";

/// Phases the cockpit session moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Engines off; the starfield drifts and only starting is possible.
    Idle,
    /// Engines on; the full simulation advances.
    Running,
    /// Simulation frozen in place until resumed or aborted.
    Paused,
    /// Ammunition spent; in-flight entities play out, firing is refused.
    GameOver,
}

impl GamePhase {
    /// Returns `true` once the engines have been started this session.
    #[must_use]
    pub const fn is_engine_on(self) -> bool {
        matches!(self, Self::Running | Self::Paused | Self::GameOver)
    }

    /// Returns `true` while entity kinematics advance on each tick.
    #[must_use]
    pub const fn is_simulating(self) -> bool {
        matches!(self, Self::Running | Self::GameOver)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Publishes the viewport dimensions the simulation plays out in.
    SetViewport {
        /// Viewport dimensions measured in pixels.
        viewport: Viewport,
    },
    /// Adjusts the ammunition granted when a session begins.
    ConfigureLoadout {
        /// Volleys available once the engines start.
        starting_ammo: u32,
    },
    /// Starts the engines, leaving the idle drift.
    StartEngines,
    /// Fires one volley from the twin cannons toward the current aim point.
    Fire,
    /// Freezes the running simulation.
    Pause,
    /// Resumes a paused simulation.
    Resume,
    /// Ends the session and hands control back to the host.
    Abort,
    /// Steers the aim offset one step in the provided direction.
    NudgeAim {
        /// Direction of the steering input.
        direction: Direction,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Materialises a spawner-decided target at the viewport edge.
    SpawnTarget {
        /// Kinematic and profile data decided by the spawner.
        descriptor: TargetDescriptor,
    },
    /// Applies a collision resolved by the combat system.
    RecordImpact {
        /// Projectile consumed by the impact.
        projectile: ProjectileId,
        /// Target absorbing the impact.
        target: TargetId,
    },
    /// Returns the world to its pre-session state, keeping the star pool.
    ResetSession,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
    /// Confirms that the viewport dimensions changed.
    ViewportResized {
        /// Viewport dimensions now in effect.
        viewport: Viewport,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a volley left the twin cannons.
    VolleyFired {
        /// Projectile launched from the left cannon.
        left: ProjectileId,
        /// Projectile launched from the right cannon.
        right: ProjectileId,
        /// Ammunition remaining after the volley was spent.
        ammo_remaining: u32,
    },
    /// Reports that a projectile reached its aim point without striking.
    ProjectileMissed {
        /// Projectile that retired without effect.
        projectile: ProjectileId,
    },
    /// Confirms that a target materialised at the viewport edge.
    TargetSpawned {
        /// Identifier allocated to the new target.
        target: TargetId,
        /// Kind of the spawned target.
        kind: TargetKind,
    },
    /// Confirms that a projectile struck a target.
    TargetStruck {
        /// Projectile consumed by the strike.
        projectile: ProjectileId,
        /// Target that absorbed the strike.
        target: TargetId,
        /// Health the target retains after the strike.
        remaining_health: Health,
    },
    /// Announces that a target's health reached zero.
    TargetDestroyed {
        /// Target that was destroyed.
        target: TargetId,
        /// Kind of the destroyed target.
        kind: TargetKind,
        /// Points awarded for the destruction.
        points: u32,
    },
    /// Reports that a live target drifted past the containment margin.
    TargetExited {
        /// Target that left the playfield.
        target: TargetId,
    },
    /// Reports that a destroyed target finished exploding and left the pool.
    ExplosionFinished {
        /// Target whose explosion window elapsed.
        target: TargetId,
    },
    /// Announces that the last volley was spent and the session ended.
    GameEnded {
        /// Score held at the moment ammunition ran out.
        final_score: u32,
    },
    /// Announces that the player aborted back to the host.
    SessionEnded {
        /// Score held at the moment of the abort.
        final_score: u32,
    },
}

/// Steering directions understood by the aim controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Steer the reticle up.
    Up,
    /// Steer the reticle down.
    Down,
    /// Steer the reticle left.
    Left,
    /// Steer the reticle right.
    Right,
}

/// Kinds of targets crossing the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Tumbling asteroid worth one point.
    Rock,
    /// Weaving hostile craft worth two points.
    Craft,
}

impl TargetKind {
    /// Returns the health a freshly spawned target of this kind carries.
    #[must_use]
    pub const fn initial_health(self) -> Health {
        match self {
            Self::Rock => Health::new(1),
            Self::Craft => Health::new(2),
        }
    }

    /// Returns the points awarded when a target of this kind is destroyed.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Rock => 1,
            Self::Craft => 2,
        }
    }

    /// Returns the half-open size range targets of this kind spawn within.
    #[must_use]
    pub const fn size_range(self) -> (f32, f32) {
        match self {
            Self::Rock => (20.0, 50.0),
            Self::Craft => (15.0, 35.0),
        }
    }

    /// Returns the amplitude of the perpendicular wave ride in pixels.
    ///
    /// Rocks travel straight, so their amplitude is zero.
    #[must_use]
    pub const fn wave_amplitude(self) -> f32 {
        match self {
            Self::Rock => 0.0,
            Self::Craft => 50.0,
        }
    }

    /// Returns the wave frequency applied over traveled distance.
    #[must_use]
    pub const fn wave_frequency(self) -> f32 {
        0.02
    }
}

/// Number of hits a target can still absorb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u8);

impl Health {
    /// Creates a health value from a raw hit count.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the raw number of hits left.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` once no hits remain.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after absorbing a single hit.
    #[must_use]
    pub const fn after_hit(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// Identifier allocated to a projectile for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a projectile identifier from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifier allocated to a target for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a target identifier from its raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Position measured in viewport pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate in pixels.
    pub x: f32,
    /// Vertical coordinate in pixels.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a point from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Computes the Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Interpolates toward `target`; progress 0 yields `self`, 1 yields `target`.
    #[must_use]
    pub fn lerp(self, target: Self, progress: f32) -> Self {
        Self {
            x: self.x + (target.x - self.x) * progress,
            y: self.y + (target.y - self.y) * progress,
        }
    }
}

/// Displacement applied to a body on every simulated tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal displacement per tick.
    pub dx: f32,
    /// Vertical displacement per tick.
    pub dy: f32,
}

impl Velocity {
    /// Velocity that leaves a body in place.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Creates a velocity from per-tick displacements.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Returns the length of the displacement applied each tick.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Returns the unit vector perpendicular to the velocity.
    ///
    /// A still body has no meaningful perpendicular, so zero velocity maps
    /// to the zero vector rather than a NaN-laden division.
    #[must_use]
    pub fn unit_perpendicular(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= f32::EPSILON {
            return Self::ZERO;
        }
        Self {
            dx: -self.dy / magnitude,
            dy: self.dx / magnitude,
        }
    }
}

/// Viewport dimensions the simulation plays out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width measured in pixels.
    pub width: f32,
    /// Height measured in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport from pixel dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the geometric center of the viewport.
    #[must_use]
    pub const fn center(self) -> WorldPoint {
        WorldPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns `true` once both dimensions are positive.
    #[must_use]
    pub fn has_area(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns `true` when the point lies inside the viewport bounds.
    #[must_use]
    pub fn contains(self, point: WorldPoint) -> bool {
        self.contains_with_margin(point, 0.0)
    }

    /// Returns `true` when the point lies within `margin` pixels of the bounds.
    #[must_use]
    pub fn contains_with_margin(self, point: WorldPoint, margin: f32) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// Damped steering offset shared by the cockpit view and the aim point.
///
/// Steering up shifts the star stream down while the reticle climbs. The two
/// derived points below encode that parallax split in one place so the world,
/// the scene population, and the tests never disagree on signs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AimOffset {
    x: f32,
    y: f32,
}

impl AimOffset {
    /// Offset with the reticle at rest on the viewport center.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Pixels added to an axis per steering input.
    pub const STEP: f32 = 10.0;

    /// Largest magnitude either axis may reach.
    pub const LIMIT: f32 = 300.0;

    /// Damping factor applied each tick while no input is held.
    pub const DECAY: f32 = 0.98;

    /// Magnitude below which a damped axis snaps back to exactly zero.
    pub const REST_THRESHOLD: f32 = 0.1;

    /// Creates an offset from raw axis values.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Retrieves the horizontal axis value.
    #[must_use]
    pub const fn x(self) -> f32 {
        self.x
    }

    /// Retrieves the vertical axis value.
    #[must_use]
    pub const fn y(self) -> f32 {
        self.y
    }

    /// Applies one steering input, clamping each axis to [`Self::LIMIT`].
    #[must_use]
    pub fn nudged(self, direction: Direction) -> Self {
        let (dx, dy) = match direction {
            Direction::Up => (0.0, Self::STEP),
            Direction::Down => (0.0, -Self::STEP),
            Direction::Left => (Self::STEP, 0.0),
            Direction::Right => (-Self::STEP, 0.0),
        };
        Self {
            x: (self.x + dx).clamp(-Self::LIMIT, Self::LIMIT),
            y: (self.y + dy).clamp(-Self::LIMIT, Self::LIMIT),
        }
    }

    /// Applies one tick of damping, snapping near-rest axes to zero.
    #[must_use]
    pub fn decayed(self) -> Self {
        Self {
            x: Self::decay_axis(self.x),
            y: Self::decay_axis(self.y),
        }
    }

    fn decay_axis(value: f32) -> f32 {
        let damped = value * Self::DECAY;
        if damped.abs() < Self::REST_THRESHOLD {
            0.0
        } else {
            damped
        }
    }

    /// Returns the point the cannons converge on: center minus the offset.
    #[must_use]
    pub fn aim_point(self, viewport: Viewport) -> WorldPoint {
        let center = viewport.center();
        WorldPoint::new(center.x - self.x, center.y - self.y)
    }

    /// Returns the starfield projection origin: center plus the offset.
    #[must_use]
    pub fn view_center(self, viewport: Viewport) -> WorldPoint {
        let center = viewport.center();
        WorldPoint::new(center.x + self.x, center.y + self.y)
    }
}

/// Spawn-time description of a target, decided entirely by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetDescriptor {
    /// Kind of target to materialise.
    pub kind: TargetKind,
    /// Entry position just outside the viewport edge.
    pub position: WorldPoint,
    /// Constant per-tick velocity carrying the target across the playfield.
    pub velocity: Velocity,
    /// Collision and rendering size in pixels.
    pub size: f32,
    /// Spin applied to the silhouette each tick, in radians.
    pub rotation_speed: f32,
    /// Phase offset of the perpendicular wave ride, in radians.
    pub wave_phase: f32,
}

impl TargetDescriptor {
    /// Creates a descriptor from spawner decisions.
    #[must_use]
    pub const fn new(
        kind: TargetKind,
        position: WorldPoint,
        velocity: Velocity,
        size: f32,
        rotation_speed: f32,
        wave_phase: f32,
    ) -> Self {
        Self {
            kind,
            position,
            velocity,
            size,
            rotation_speed,
            wave_phase,
        }
    }
}

/// Immutable representation of a projectile in flight used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Cannon muzzle the projectile launched from.
    pub start: WorldPoint,
    /// Interpolated position for the current tick.
    pub position: WorldPoint,
    /// Aim point captured at fire time.
    pub target: WorldPoint,
    /// Interpolation progress within `[0, 1)`.
    pub progress: f32,
}

/// Immutable collection of projectile snapshots ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    projectiles: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut projectiles: Vec<ProjectileSnapshot>) -> Self {
        projectiles.sort_by_key(|projectile| projectile.id);
        Self { projectiles }
    }

    /// Iterates over the projectiles ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.projectiles.iter()
    }

    /// Returns the number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Returns `true` when no projectiles are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

/// Immutable representation of a target used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Identifier allocated to the target by the world.
    pub id: TargetId,
    /// Kind of the target.
    pub kind: TargetKind,
    /// Display position including the wave ride.
    pub position: WorldPoint,
    /// Constant per-tick velocity.
    pub velocity: Velocity,
    /// Collision and rendering size in pixels.
    pub size: f32,
    /// Accumulated silhouette rotation in radians.
    pub rotation: f32,
    /// Hits the target can still absorb.
    pub health: Health,
    /// Explosion progress within `[0, 1]` once destroyed, `None` while live.
    pub explosion_progress: Option<f32>,
}

impl TargetSnapshot {
    /// Returns `true` while the target can still be struck.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.explosion_progress.is_none()
    }
}

/// Immutable collection of target snapshots ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetView {
    targets: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut targets: Vec<TargetSnapshot>) -> Self {
        targets.sort_by_key(|target| target.id);
        Self { targets }
    }

    /// Iterates over the targets ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.targets.iter()
    }

    /// Returns the number of targets in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` when the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Screen-space projection of one star, ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarProjection {
    /// Projected position in viewport pixels.
    pub position: WorldPoint,
    /// Projected dot size in pixels.
    pub size: f32,
    /// Brightness within `[0, 1]`; nearer stars glow brighter.
    pub brightness: f32,
}

impl StarProjection {
    /// Creates a projection from screen-space values.
    #[must_use]
    pub const fn new(position: WorldPoint, size: f32, brightness: f32) -> Self {
        Self {
            position,
            size,
            brightness,
        }
    }
}

/// Cockpit readouts surfaced by the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Current phase of the session.
    pub phase: GamePhase,
    /// Points scored so far.
    pub score: u32,
    /// Volleys still available.
    pub ammo: u32,
}

impl HudSnapshot {
    /// Creates a HUD snapshot from the current session counters.
    #[must_use]
    pub const fn new(phase: GamePhase, score: u32, ammo: u32) -> Self {
        Self { phase, score, ammo }
    }
}
