#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves projectile impacts from world snapshots.
//!
//! Pairing is deterministic: projectiles are walked in ascending id order and
//! each one strikes the lowest-id live target whose hit radius it sits inside.
//! Hits claimed earlier in the same tick shrink a target's remaining health,
//! so a depleted target stops absorbing before the world ever sees a command.

use star_sentry_core::{Command, GamePhase, ProjectileView, TargetId, TargetView, WorldPoint};

/// Multiplier applied to a target's size to obtain its hit radius.
const HIT_RADIUS_SCALE: f32 = 1.5;

/// Collision system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Combat {
    candidate_workspace: Vec<TargetCandidate>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::RecordImpact` entries for this tick's collisions.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        projectiles: &ProjectileView,
        targets: &TargetView,
        out: &mut Vec<Command>,
    ) {
        if !phase.is_simulating() {
            return;
        }

        if projectiles.is_empty() || targets.is_empty() {
            return;
        }

        self.prepare_candidates(targets);
        if self.candidate_workspace.is_empty() {
            return;
        }

        for projectile in projectiles.iter() {
            for candidate in self.candidate_workspace.iter_mut() {
                if candidate.hits_left == 0 {
                    continue;
                }

                if candidate.is_struck_by(projectile.position) {
                    candidate.hits_left -= 1;
                    out.push(Command::RecordImpact {
                        projectile: projectile.id,
                        target: candidate.id,
                    });
                    break;
                }
            }
        }
    }

    fn prepare_candidates(&mut self, targets: &TargetView) {
        self.candidate_workspace.clear();
        let (lower, _) = targets.iter().size_hint();
        self.candidate_workspace.reserve(lower);

        for snapshot in targets.iter() {
            if !snapshot.is_live() {
                continue;
            }

            self.candidate_workspace.push(TargetCandidate {
                id: snapshot.id,
                position: snapshot.position,
                size: snapshot.size,
                hits_left: snapshot.health.get(),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TargetCandidate {
    id: TargetId,
    position: WorldPoint,
    size: f32,
    hits_left: u8,
}

impl TargetCandidate {
    /// Strictly-inside check; a projectile exactly on the radius misses.
    fn is_struck_by(&self, position: WorldPoint) -> bool {
        position.distance_to(self.position) < HIT_RADIUS_SCALE * self.size
    }
}
