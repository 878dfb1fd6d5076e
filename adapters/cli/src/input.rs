//! Maps raw adapter input onto world commands using the phase table.

use star_sentry_core::{Command, GamePhase, Viewport};
use star_sentry_rendering::FrameInput;

/// Translates one frame of adapter input into world commands.
///
/// This is the only place input semantics live. The adapter forwards raw key
/// state without interpretation and the world still enforces its own refusals
/// on top, so a stale mapping degrades into no-ops instead of corruption.
pub(crate) fn map_frame_input(
    input: FrameInput,
    phase: GamePhase,
    world_viewport: Viewport,
) -> Vec<Command> {
    let mut commands = Vec::new();

    if input.viewport != world_viewport {
        commands.push(Command::SetViewport {
            viewport: input.viewport,
        });
    }

    if input.primary_pressed {
        match phase {
            GamePhase::Idle => commands.push(Command::StartEngines),
            GamePhase::Running => commands.push(Command::Fire),
            GamePhase::Paused => commands.push(Command::Resume),
            GamePhase::GameOver => {}
        }
    }

    if input.secondary_pressed {
        match phase {
            GamePhase::Running => commands.push(Command::Pause),
            GamePhase::Paused | GamePhase::GameOver => commands.push(Command::Abort),
            GamePhase::Idle => {}
        }
    }

    if phase.is_simulating() {
        for direction in input.held.directions() {
            commands.push(Command::NudgeAim { direction });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_sentry_core::Direction;
    use star_sentry_rendering::HeldDirections;

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn frame(primary: bool, secondary: bool, held: HeldDirections) -> FrameInput {
        FrameInput {
            primary_pressed: primary,
            secondary_pressed: secondary,
            held,
            viewport: VIEWPORT,
        }
    }

    #[test]
    fn primary_follows_the_phase_table() {
        let input = frame(true, false, HeldDirections::default());

        assert_eq!(
            map_frame_input(input, GamePhase::Idle, VIEWPORT),
            vec![Command::StartEngines]
        );
        assert_eq!(
            map_frame_input(input, GamePhase::Running, VIEWPORT),
            vec![Command::Fire]
        );
        assert_eq!(
            map_frame_input(input, GamePhase::Paused, VIEWPORT),
            vec![Command::Resume]
        );
        assert!(map_frame_input(input, GamePhase::GameOver, VIEWPORT).is_empty());
    }

    #[test]
    fn secondary_pauses_then_aborts() {
        let input = frame(false, true, HeldDirections::default());

        assert_eq!(
            map_frame_input(input, GamePhase::Running, VIEWPORT),
            vec![Command::Pause]
        );
        assert_eq!(
            map_frame_input(input, GamePhase::Paused, VIEWPORT),
            vec![Command::Abort]
        );
        assert_eq!(
            map_frame_input(input, GamePhase::GameOver, VIEWPORT),
            vec![Command::Abort]
        );
        assert!(map_frame_input(input, GamePhase::Idle, VIEWPORT).is_empty());
    }

    #[test]
    fn held_directions_steer_only_while_simulating() {
        let held = HeldDirections {
            up: true,
            left: true,
            ..HeldDirections::default()
        };
        let input = frame(false, false, held);

        let running = map_frame_input(input, GamePhase::Running, VIEWPORT);
        assert_eq!(
            running,
            vec![
                Command::NudgeAim {
                    direction: Direction::Up
                },
                Command::NudgeAim {
                    direction: Direction::Left
                },
            ]
        );

        assert!(!map_frame_input(input, GamePhase::GameOver, VIEWPORT).is_empty());
        assert!(map_frame_input(input, GamePhase::Paused, VIEWPORT).is_empty());
        assert!(map_frame_input(input, GamePhase::Idle, VIEWPORT).is_empty());
    }

    #[test]
    fn viewport_drift_emits_a_resize_first() {
        let mut input = frame(true, false, HeldDirections::default());
        input.viewport = Viewport::new(1024.0, 768.0);

        let commands = map_frame_input(input, GamePhase::Running, VIEWPORT);
        assert_eq!(
            commands,
            vec![
                Command::SetViewport {
                    viewport: Viewport::new(1024.0, 768.0)
                },
                Command::Fire,
            ]
        );
    }

    #[test]
    fn quiet_frames_map_to_no_commands() {
        let input = frame(false, false, HeldDirections::default());

        assert!(map_frame_input(input, GamePhase::Running, VIEWPORT).is_empty());
        assert!(map_frame_input(input, GamePhase::Idle, VIEWPORT).is_empty());
    }
}
