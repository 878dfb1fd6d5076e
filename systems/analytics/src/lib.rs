#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that folds world events into session stats.
//!
//! The fold is append-only: feeding the same event stream in the same order
//! always lands on the same counters, so the end-of-session report is as
//! reproducible as the simulation itself.

use star_sentry_core::{Event, TargetKind};

/// Pure analytics system that accumulates per-session cockpit statistics.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
}

impl Analytics {
    /// Creates a new analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Folds a batch of world events into the running statistics.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::VolleyFired { .. } => {
                    self.stats.volleys += 1;
                    self.stats.projectiles += 2;
                }
                Event::TargetStruck { .. } => self.stats.impacts += 1,
                Event::ProjectileMissed { .. } => self.stats.misses += 1,
                Event::TargetDestroyed { kind, points, .. } => {
                    match kind {
                        TargetKind::Rock => self.stats.rocks_destroyed += 1,
                        TargetKind::Craft => self.stats.craft_destroyed += 1,
                    }
                    self.stats.points += points;
                }
                Event::TargetExited { .. } => self.stats.escapes += 1,
                Event::GameEnded { final_score } | Event::SessionEnded { final_score } => {
                    self.stats.final_score = Some(*final_score);
                }
                _ => {}
            }
        }
    }
}

/// Session counters accumulated from the world's event stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Volleys fired by the player.
    pub volleys: u32,
    /// Projectiles launched; every volley contributes two.
    pub projectiles: u32,
    /// Projectiles that struck a target.
    pub impacts: u32,
    /// Projectiles that retired at their aim point without striking.
    pub misses: u32,
    /// Rocks destroyed this session.
    pub rocks_destroyed: u32,
    /// Craft destroyed this session.
    pub craft_destroyed: u32,
    /// Live targets that drifted off the playfield unharmed.
    pub escapes: u32,
    /// Points awarded across all destructions.
    pub points: u32,
    /// Score carried by the latest game-ended or session-ended report.
    pub final_score: Option<u32>,
}

impl SessionStats {
    /// Total number of destroyed targets across both kinds.
    #[must_use]
    pub const fn destroyed(&self) -> u32 {
        self.rocks_destroyed + self.craft_destroyed
    }

    /// Hit rate across launched projectiles, or `None` before the first volley.
    #[must_use]
    pub fn accuracy(&self) -> Option<f32> {
        if self.projectiles == 0 {
            return None;
        }
        Some(self.impacts as f32 / self.projectiles as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::{Analytics, SessionStats};
    use star_sentry_core::{Event, Health, ProjectileId, TargetId, TargetKind};

    #[test]
    fn volleys_count_two_projectiles_each() {
        let mut analytics = Analytics::new();
        analytics.handle(&[
            Event::VolleyFired {
                left: ProjectileId::new(0),
                right: ProjectileId::new(1),
                ammo_remaining: 49,
            },
            Event::VolleyFired {
                left: ProjectileId::new(2),
                right: ProjectileId::new(3),
                ammo_remaining: 48,
            },
        ]);

        assert_eq!(analytics.stats().volleys, 2);
        assert_eq!(analytics.stats().projectiles, 4);
    }

    #[test]
    fn destructions_split_by_kind_and_sum_points() {
        let mut analytics = Analytics::new();
        analytics.handle(&[
            Event::TargetDestroyed {
                target: TargetId::new(0),
                kind: TargetKind::Rock,
                points: 1,
            },
            Event::TargetDestroyed {
                target: TargetId::new(1),
                kind: TargetKind::Craft,
                points: 2,
            },
            Event::TargetStruck {
                projectile: ProjectileId::new(9),
                target: TargetId::new(2),
                remaining_health: Health::new(1),
            },
        ]);

        let stats = analytics.stats();
        assert_eq!(stats.rocks_destroyed, 1);
        assert_eq!(stats.craft_destroyed, 1);
        assert_eq!(stats.destroyed(), 2);
        assert_eq!(stats.points, 3);
        assert_eq!(stats.impacts, 1);
    }

    #[test]
    fn accuracy_requires_launched_projectiles() {
        let stats = SessionStats::default();
        assert_eq!(stats.accuracy(), None);

        let stats = SessionStats {
            projectiles: 4,
            impacts: 1,
            ..SessionStats::default()
        };
        assert_eq!(stats.accuracy(), Some(0.25));
    }

    #[test]
    fn the_latest_final_score_wins() {
        let mut analytics = Analytics::new();
        analytics.handle(&[Event::GameEnded { final_score: 3 }]);
        analytics.handle(&[Event::SessionEnded { final_score: 5 }]);

        assert_eq!(analytics.stats().final_score, Some(5));
    }
}
