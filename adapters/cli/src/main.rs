#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Star Sentry cockpit.
//!
//! The binary owns the frame pipeline: raw input from the rendering backend is
//! mapped onto world commands, the world ticks, the spawning and combat
//! systems answer the emitted events, analytics folds the same events, and the
//! resulting state is projected into the scene the backend draws. When the
//! session ends the loop prints the tallies and exits.

mod input;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use star_sentry_core::{Command, Event};
use star_sentry_rendering::{
    Color, FrameControl, FrameReport, Presentation, RenderingBackend, Scene,
};
use star_sentry_rendering_macroquad::MacroquadBackend;
use star_sentry_system_analytics::{Analytics, SessionStats};
use star_sentry_system_combat::Combat;
use star_sentry_system_spawning::{Config as SpawnConfig, SeededUniform, Spawning};
use star_sentry_world::{apply, query, World};
use std::fmt::Write as _;
use std::time::Instant;

/// Command-line options for a cockpit session.
#[derive(Debug, Parser)]
#[command(name = "star-sentry", about = "Star Sentry cockpit arcade shooter")]
struct Args {
    /// Seed for the spawn stream; omit to draw one from OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Volleys loaded when the engines start.
    #[arg(long, default_value_t = 50)]
    ammo: u32,

    /// Disable vsync and present frames as fast as the host allows.
    #[arg(long)]
    no_vsync: bool,

    /// Print frame timing metrics to stdout once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Star Sentry command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut world = World::new();
    let mut events: Vec<Event> = Vec::new();
    apply(
        &mut world,
        Command::ConfigureLoadout {
            starting_ammo: args.ammo,
        },
        &mut events,
    );

    println!("{}", query::welcome_banner(&world));
    println!("spawn seed: {seed}");

    let mut spawning = Spawning::new(SpawnConfig::default(), SeededUniform::seeded(seed));
    let mut combat = Combat::new();
    let mut analytics = Analytics::new();

    let presentation = Presentation::new(
        "Star Sentry",
        Color::from_rgb_u8(4, 6, 12),
        Scene::empty(query::viewport(&world)),
    );
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps);

    let mut system_commands: Vec<Command> = Vec::new();
    let mut session_over = false;

    backend
        .run(presentation, move |frame_dt, frame_input, scene| {
            let simulation_start = Instant::now();
            events.clear();

            for command in
                input::map_frame_input(frame_input, query::phase(&world), query::viewport(&world))
            {
                apply(&mut world, command, &mut events);
            }

            apply(&mut world, Command::Tick { dt: frame_dt }, &mut events);

            system_commands.clear();
            spawning.handle(
                &events,
                query::phase(&world),
                query::viewport(&world),
                &mut system_commands,
            );
            for command in system_commands.drain(..) {
                apply(&mut world, command, &mut events);
            }

            combat.handle(
                query::phase(&world),
                &query::projectile_view(&world),
                &query::target_view(&world),
                &mut system_commands,
            );
            for command in system_commands.drain(..) {
                apply(&mut world, command, &mut events);
            }

            analytics.handle(&events);
            if !session_over && contains_session_end(&events) {
                session_over = true;
                println!("{}", session_report(analytics.stats()));
            }
            let simulation = simulation_start.elapsed();

            let population_start = Instant::now();
            scene::populate(&world, scene);
            let scene_population = population_start.elapsed();

            let control = if session_over {
                FrameControl::Exit
            } else {
                FrameControl::Continue
            };
            FrameReport::new(control, simulation, scene_population)
        })
        .context("rendering backend failed")?;

    Ok(())
}

fn contains_session_end(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::SessionEnded { .. }))
}

/// Formats the end-of-session tallies printed when the player aborts.
fn session_report(stats: &SessionStats) -> String {
    let mut report = String::from("=== Session Report ===\n");
    match stats.final_score {
        Some(score) => {
            let _ = writeln!(report, "final score: {score}");
        }
        None => {
            let _ = writeln!(report, "final score: n/a");
        }
    }
    let _ = writeln!(report, "volleys:     {}", stats.volleys);
    let _ = writeln!(report, "projectiles: {}", stats.projectiles);
    let _ = writeln!(report, "impacts:     {}", stats.impacts);
    let _ = writeln!(report, "misses:      {}", stats.misses);
    match stats.accuracy() {
        Some(accuracy) => {
            let _ = writeln!(report, "accuracy:    {:.1}%", accuracy * 100.0);
        }
        None => {
            let _ = writeln!(report, "accuracy:    n/a");
        }
    }
    let _ = writeln!(
        report,
        "destroyed:   {} ({} rocks, {} craft)",
        stats.destroyed(),
        stats.rocks_destroyed,
        stats.craft_destroyed
    );
    let _ = write!(report, "escapes:     {}", stats.escapes);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_reports_cover_every_counter() {
        let stats = SessionStats {
            volleys: 2,
            projectiles: 4,
            impacts: 1,
            misses: 3,
            rocks_destroyed: 1,
            craft_destroyed: 0,
            escapes: 1,
            points: 1,
            final_score: Some(1),
        };

        let report = session_report(&stats);

        assert!(report.starts_with("=== Session Report ==="));
        assert!(report.contains("final score: 1"));
        assert!(report.contains("volleys:     2"));
        assert!(report.contains("projectiles: 4"));
        assert!(report.contains("impacts:     1"));
        assert!(report.contains("misses:      3"));
        assert!(report.contains("accuracy:    25.0%"));
        assert!(report.contains("destroyed:   1 (1 rocks, 0 craft)"));
        assert!(report.contains("escapes:     1"));
    }

    #[test]
    fn empty_sessions_report_no_accuracy() {
        let report = session_report(&SessionStats::default());

        assert!(report.contains("final score: n/a"));
        assert!(report.contains("accuracy:    n/a"));
    }

    #[test]
    fn only_session_ends_stop_the_loop() {
        assert!(!contains_session_end(&[Event::GameEnded { final_score: 4 }]));
        assert!(contains_session_end(&[Event::SessionEnded { final_score: 4 }]));
    }
}
