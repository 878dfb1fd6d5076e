#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Star Sentry.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml`.
//!
//! All cockpit styling lives here: the simulation side hands over a [`Scene`]
//! of positions and the adapter decides colors, silhouettes and HUD
//! typography. Rocks and craft are drawn procedurally with id-seeded
//! outlines, so a target keeps the same silhouette from frame to frame.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use star_sentry_core::{GamePhase, HudSnapshot, TargetId, TargetKind, Viewport};
use star_sentry_rendering::{
    BeamPresentation, Color, FrameControl, FrameInput, FrameReport, HeldDirections, Presentation,
    RenderingBackend, Scene, StarPresentation, TargetPresentation,
};
use std::{
    collections::VecDeque,
    f32::consts::TAU,
    time::{Duration, Instant},
};

/// Nominal velocity readout shown on the HUD while the engines are on.
const ENGINE_ON_VELOCITY_READOUT: f32 = 800.0;

/// Distance from the reticle center to the outer end of each crosshair arm.
const RETICLE_ARM: f32 = 14.0;
/// Distance from the reticle center to the inner end of each crosshair arm.
const RETICLE_GAP: f32 = 4.0;
/// Radius of the reticle ring.
const RETICLE_RING: f32 = 9.0;

/// Snapshot of the keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Space` triggers the primary cockpit action (start, fire, resume).
    primary: bool,
    /// `Escape` triggers the secondary cockpit action (pause, abort).
    secondary: bool,
    /// `Up` arrow held to steer the aim.
    steer_up: bool,
    /// `Down` arrow held to steer the aim.
    steer_down: bool,
    /// `Left` arrow held to steer the aim.
    steer_left: bool,
    /// `Right` arrow held to steer the aim.
    steer_right: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let primary = is_key_pressed(KeyCode::Space);
        let secondary = is_key_pressed(KeyCode::Escape);
        let steer_up = is_key_down(KeyCode::Up);
        let steer_down = is_key_down(KeyCode::Down);
        let steer_left = is_key_down(KeyCode::Left);
        let steer_right = is_key_down(KeyCode::Right);

        Self {
            primary,
            secondary,
            steer_up,
            steer_down,
            steer_left,
            steer_right,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Durations measured for a single rendered frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            self.simulation_accum = Duration::ZERO;
            self.scene_population_accum = Duration::ZERO;
            self.render_accum = Duration::ZERO;
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let frames = self.frames;
        let avg_simulation = if frames == 0 {
            Duration::ZERO
        } else {
            self.simulation_accum / frames
        };
        let avg_scene_population = if frames == 0 {
            Duration::ZERO
        } else {
            self.scene_population_accum / frames
        };
        let avg_render = if frames == 0 {
            Duration::ZERO
        } else {
            self.render_accum / frames
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation,
            avg_scene_population,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameReport + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let palette = cockpit_palette();
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input =
                    gather_frame_input_from_observations(keyboard, screen_width, screen_height);

                let report = update_scene(frame_dt, frame_input, &mut scene);

                let render_start = Instant::now();
                draw_stars(&scene.stars, &palette);
                draw_beams(&scene.beams, &palette);
                draw_targets(&scene.targets, &palette);
                draw_reticle(scene.reticle, &palette);
                draw_hud(scene.hud, &palette);
                draw_overlay(scene.hud, screen_width, screen_height, &palette);
                let render_duration = render_start.elapsed();

                let frame_breakdown = FrameBreakdown {
                    frame: frame_dt,
                    simulation: report.simulation,
                    scene_population: report.scene_population,
                    render: render_duration,
                };

                let fps_metrics = fps_counter.record_frame(frame_breakdown);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;

                if report.control == FrameControl::Exit {
                    break;
                }
            }
        });

        Ok(())
    }
}

fn gather_frame_input_from_observations(
    keyboard: KeyboardShortcuts,
    screen_width: f32,
    screen_height: f32,
) -> FrameInput {
    FrameInput {
        primary_pressed: keyboard.primary,
        secondary_pressed: keyboard.secondary,
        held: HeldDirections {
            up: keyboard.steer_up,
            down: keyboard.steer_down,
            left: keyboard.steer_left,
            right: keyboard.steer_right,
        },
        viewport: Viewport::new(screen_width.max(0.0), screen_height.max(0.0)),
    }
}

struct CockpitPalette {
    star: Color,
    beam: Color,
    beam_head: Color,
    rock_fill: Color,
    rock_outline: Color,
    craft_hull: Color,
    craft_dome: Color,
    craft_window: Color,
    explosion: Color,
    reticle: Color,
    hud: Color,
}

fn cockpit_palette() -> CockpitPalette {
    let beam = Color::new(1.0, 0.28, 0.2, 0.9);
    let rock = Color::from_rgb_u8(142, 122, 100);
    let craft = Color::from_rgb_u8(96, 118, 148);

    CockpitPalette {
        star: Color::from_rgb_u8(235, 244, 255),
        beam,
        beam_head: beam.lighten(0.5),
        rock_fill: rock,
        rock_outline: rock.lighten(0.35),
        craft_hull: craft,
        craft_dome: craft.lighten(0.55),
        craft_window: Color::from_rgb_u8(255, 232, 150),
        explosion: Color::from_rgb_u8(255, 132, 40),
        reticle: Color::new(0.45, 1.0, 0.6, 0.9),
        hud: Color::new(0.55, 1.0, 0.75, 0.95),
    }
}

fn draw_stars(stars: &[StarPresentation], palette: &CockpitPalette) {
    for star in stars {
        let tint = to_macroquad_color(palette.star.with_alpha(star.brightness.clamp(0.0, 1.0)));
        macroquad::shapes::draw_circle(star.position.x, star.position.y, star.size, tint);
    }
}

fn draw_beams(beams: &[BeamPresentation], palette: &CockpitPalette) {
    let beam = to_macroquad_color(palette.beam);
    let head = to_macroquad_color(palette.beam_head);

    for segment in beams {
        macroquad::shapes::draw_line(
            segment.origin.x,
            segment.origin.y,
            segment.head.x,
            segment.head.y,
            2.0,
            beam,
        );
        macroquad::shapes::draw_circle(segment.head.x, segment.head.y, 3.0, head);
    }
}

fn draw_targets(targets: &[TargetPresentation], palette: &CockpitPalette) {
    for target in targets {
        match target.explosion {
            Some(progress) => draw_explosion(target, progress, palette),
            None => match target.kind {
                TargetKind::Rock => draw_rock(target, palette),
                TargetKind::Craft => draw_craft(target, palette),
            },
        }
    }
}

/// Returns the vertex count of a rock silhouette, stable per target.
fn rock_sides(id: TargetId) -> u32 {
    7 + id.get() % 4
}

/// Returns a pseudo-random unit value derived from a target id and vertex index.
fn rock_profile(id: TargetId, vertex: u32) -> f32 {
    let seed = id
        .get()
        .wrapping_mul(2_654_435_761)
        .wrapping_add(vertex.wrapping_mul(40_503));
    (seed % 1_000) as f32 / 1_000.0
}

/// Builds the jagged outline ring of a rock around its display position.
fn rock_outline(id: TargetId, center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
    let sides = rock_sides(id);
    let base_radius = size * 0.5;

    (0..sides)
        .map(|vertex| {
            let angle = rotation + vertex as f32 * TAU / sides as f32;
            let scale = 0.72 + 0.28 * rock_profile(id, vertex);
            center + Vec2::new(angle.cos(), angle.sin()) * (base_radius * scale)
        })
        .collect()
}

fn ring_segments(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    ring.iter()
        .copied()
        .zip(ring.iter().copied().cycle().skip(1))
}

fn draw_rock(target: &TargetPresentation, palette: &CockpitPalette) {
    let ring = rock_outline(target.id, target.position, target.size, target.rotation);
    if ring.len() < 3 {
        return;
    }

    let center = MacroquadVec2::new(target.position.x, target.position.y);
    let fill = to_macroquad_color(palette.rock_fill);
    for (first, second) in ring_segments(&ring) {
        macroquad::shapes::draw_triangle(
            center,
            MacroquadVec2::new(first.x, first.y),
            MacroquadVec2::new(second.x, second.y),
            fill,
        );
    }

    let outline = to_macroquad_color(palette.rock_outline);
    for (first, second) in ring_segments(&ring) {
        macroquad::shapes::draw_line(first.x, first.y, second.x, second.y, 1.5, outline);
    }
}

/// Computes the rotated hull quad of a craft from its heading and size.
fn hull_corners(center: Vec2, rotation: f32, size: f32) -> [Vec2; 4] {
    let direction = Vec2::new(rotation.cos(), rotation.sin());
    let perpendicular = Vec2::new(-direction.y, direction.x);
    let half_length = direction * (size * 0.5);
    let half_width = perpendicular * (size * 0.18);

    [
        center - half_length + half_width,
        center - half_length - half_width,
        center + half_length - half_width,
        center + half_length + half_width,
    ]
}

fn draw_craft(target: &TargetPresentation, palette: &CockpitPalette) {
    let [p1, p2, p3, p4] = hull_corners(target.position, target.rotation, target.size)
        .map(|corner| MacroquadVec2::new(corner.x, corner.y));
    let hull = to_macroquad_color(palette.craft_hull);
    macroquad::shapes::draw_triangle(p1, p2, p3, hull);
    macroquad::shapes::draw_triangle(p1, p3, p4, hull);

    let window = to_macroquad_color(palette.craft_window);
    let window_radius = (target.size * 0.07).max(1.0);
    let direction = Vec2::new(target.rotation.cos(), target.rotation.sin());
    for offset in [-0.32_f32, 0.32] {
        let lit = target.position + direction * (target.size * offset);
        macroquad::shapes::draw_circle(lit.x, lit.y, window_radius, window);
    }

    let dome = to_macroquad_color(palette.craft_dome);
    let dome_radius = target.size * 0.28;
    macroquad::shapes::draw_circle(target.position.x, target.position.y, dome_radius, dome);
}

/// Returns the disc radius and alpha of an explosion at the given progress.
fn explosion_disc(size: f32, progress: f32) -> (f32, f32) {
    let progress = progress.clamp(0.0, 1.0);
    (size * (1.0 + 2.0 * progress), 1.0 - progress)
}

fn draw_explosion(target: &TargetPresentation, progress: f32, palette: &CockpitPalette) {
    let (radius, alpha) = explosion_disc(target.size, progress);
    if alpha <= f32::EPSILON {
        return;
    }

    let flash = palette.explosion.lighten((1.0 - progress) * 0.6);
    let disc = to_macroquad_color(flash.with_alpha(alpha));
    macroquad::shapes::draw_circle(target.position.x, target.position.y, radius, disc);

    let core = to_macroquad_color(palette.explosion.lighten(0.85).with_alpha(alpha));
    let core_radius = radius * 0.45;
    macroquad::shapes::draw_circle(target.position.x, target.position.y, core_radius, core);
}

fn draw_reticle(reticle: Option<Vec2>, palette: &CockpitPalette) {
    let Some(center) = reticle else {
        return;
    };

    let color = to_macroquad_color(palette.reticle);
    for direction in [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -1.0),
    ] {
        let inner = center + direction * RETICLE_GAP;
        let outer = center + direction * RETICLE_ARM;
        macroquad::shapes::draw_line(inner.x, inner.y, outer.x, outer.y, 1.5, color);
    }
    macroquad::shapes::draw_circle_lines(center.x, center.y, RETICLE_RING, 1.5, color);
}

/// Returns the HUD velocity readout for the current phase.
fn hud_velocity(phase: GamePhase) -> f32 {
    if phase.is_engine_on() {
        ENGINE_ON_VELOCITY_READOUT
    } else {
        0.0
    }
}

fn draw_hud(hud: HudSnapshot, palette: &CockpitPalette) {
    let color = to_macroquad_color(palette.hud);
    macroquad::text::draw_text(&format!("AMMO {}", hud.ammo), 16.0, 28.0, 24.0, color);
    macroquad::text::draw_text(&format!("SCORE {}", hud.score), 16.0, 52.0, 24.0, color);
    let velocity = format!("VEL {:.2}", hud_velocity(hud.phase));
    macroquad::text::draw_text(&velocity, 16.0, 76.0, 24.0, color);
}

struct Overlay {
    heading: String,
    detail: String,
}

/// Returns the full-screen overlay text for phases that display one.
fn phase_overlay(hud: HudSnapshot) -> Option<Overlay> {
    match hud.phase {
        GamePhase::Running => None,
        GamePhase::Idle => Some(Overlay {
            heading: String::from("PRESS SPACE TO START ENGINES"),
            detail: String::from("ARROW KEYS STEER   SPACE FIRES   ESC PAUSES"),
        }),
        GamePhase::Paused => Some(Overlay {
            heading: String::from("GAME PAUSED"),
            detail: String::from("SPACE RESUMES   ESC ABORTS"),
        }),
        GamePhase::GameOver => Some(Overlay {
            heading: String::from("GAME OVER"),
            detail: format!("FINAL SCORE {}   ESC ABORTS", hud.score),
        }),
    }
}

fn draw_overlay(hud: HudSnapshot, screen_width: f32, screen_height: f32, palette: &CockpitPalette) {
    let Some(overlay) = phase_overlay(hud) else {
        return;
    };

    let color = to_macroquad_color(palette.hud);
    let center_x = screen_width * 0.5;
    let heading_baseline = screen_height * 0.42;
    draw_centered_text(&overlay.heading, center_x, heading_baseline, 48.0, color);
    draw_centered_text(&overlay.detail, center_x, heading_baseline + 42.0, 24.0, color);
}

fn draw_centered_text(
    text: &str,
    center_x: f32,
    baseline_y: f32,
    font_size: f32,
    color: macroquad::color::Color,
) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let left = center_x - dimensions.width * 0.5;
    macroquad::text::draw_text(text, left, baseline_y, font_size, color);
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
