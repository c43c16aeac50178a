use super::game_state::SnakeGameState;
use super::types::Direction;

/// Keys the game reacts to, independent of the windowing toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Turn(Direction),
    TogglePause,
}

/// Translates key presses into game actions. Reversals are not filtered
/// here: the tick refuses to adopt them.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputMapper;

impl InputMapper {
    pub fn map(key: KeyInput) -> InputAction {
        match key {
            KeyInput::ArrowUp => InputAction::Turn(Direction::Up),
            KeyInput::ArrowDown => InputAction::Turn(Direction::Down),
            KeyInput::ArrowLeft => InputAction::Turn(Direction::Left),
            KeyInput::ArrowRight => InputAction::Turn(Direction::Right),
            KeyInput::Space => InputAction::TogglePause,
        }
    }

    /// Applies an action to the state. Turns only register while the game is
    /// running; returns whether anything changed.
    pub fn apply(action: InputAction, state: &mut SnakeGameState) -> bool {
        match action {
            InputAction::Turn(direction) => {
                if !state.is_playing() || state.is_game_over() {
                    return false;
                }
                state.set_pending_direction(direction);
                true
            }
            InputAction::TogglePause => {
                if state.is_game_over() {
                    return false;
                }
                state.toggle_pause();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;
    use crate::games::snake::{GameMode, SnakeSettings};

    fn create_state() -> (SnakeGameState, SessionRng) {
        let mut rng = SessionRng::new(42);
        let state = SnakeGameState::new(SnakeSettings::default(), GameMode::WrapAround, &mut rng);
        (state, rng)
    }

    #[test]
    fn test_map_arrows_and_space() {
        assert_eq!(InputMapper::map(KeyInput::ArrowUp), InputAction::Turn(Direction::Up));
        assert_eq!(InputMapper::map(KeyInput::ArrowLeft), InputAction::Turn(Direction::Left));
        assert_eq!(InputMapper::map(KeyInput::Space), InputAction::TogglePause);
    }

    #[test]
    fn test_turn_overwrites_pending() {
        let (mut state, _) = create_state();
        assert!(InputMapper::apply(InputAction::Turn(Direction::Up), &mut state));
        assert!(InputMapper::apply(InputAction::Turn(Direction::Left), &mut state));
        assert_eq!(state.pending_direction(), Direction::Left);
    }

    #[test]
    fn test_opposite_turn_is_buffered_but_not_adopted() {
        let (mut state, mut rng) = create_state();
        InputMapper::apply(InputAction::Turn(Direction::Left), &mut state);
        assert_eq!(state.pending_direction(), Direction::Left);

        state.step(&mut rng);
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn test_turn_ignored_while_paused() {
        let (mut state, _) = create_state();
        InputMapper::apply(InputAction::TogglePause, &mut state);
        assert!(!state.is_playing());
        assert!(!InputMapper::apply(InputAction::Turn(Direction::Up), &mut state));
        assert_eq!(state.pending_direction(), Direction::Right);

        InputMapper::apply(InputAction::TogglePause, &mut state);
        assert!(state.is_playing());
    }
}
