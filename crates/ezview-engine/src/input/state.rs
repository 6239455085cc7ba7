use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for the viewer window.
///
/// Press edges are written to an `InputFrame`; holding a key (including
/// platform key-repeat) never produces a second edge until it is released.
#[derive(Debug, Default)]
pub struct InputState {
    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event and records press edges in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            // Release events are not delivered while unfocused.
            InputEvent::Focused(false) => self.keys_down.clear(),
            InputEvent::Focused(true) => {}

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) && !repeat {
                        frame.keys_pressed.push(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn held_key_yields_single_press_edge() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        st.apply_event(&mut fr, key(Key::ArrowUp, KeyState::Pressed, false));
        st.apply_event(&mut fr, key(Key::ArrowUp, KeyState::Pressed, true));
        st.apply_event(&mut fr, key(Key::ArrowUp, KeyState::Pressed, true));

        assert_eq!(fr.keys_pressed, vec![Key::ArrowUp]);
        assert!(st.keys_down.contains(&Key::ArrowUp));
    }

    #[test]
    fn repeated_discrete_presses_each_count() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        for _ in 0..2 {
            st.apply_event(&mut fr, key(Key::ArrowUp, KeyState::Pressed, false));
            st.apply_event(&mut fr, key(Key::ArrowUp, KeyState::Released, false));
        }

        assert_eq!(fr.keys_pressed, vec![Key::ArrowUp, Key::ArrowUp]);
        assert!(st.keys_down.is_empty());
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, key(Key::W, KeyState::Released, false));
        assert!(fr.keys_pressed.is_empty());
        assert!(st.keys_down.is_empty());
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, key(Key::D, KeyState::Pressed, false));
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(st.keys_down.is_empty());

        // The next press after refocus is a fresh edge.
        fr.clear();
        st.apply_event(&mut fr, InputEvent::Focused(true));
        st.apply_event(&mut fr, key(Key::D, KeyState::Pressed, false));
        assert_eq!(fr.keys_pressed, vec![Key::D]);
    }
}
