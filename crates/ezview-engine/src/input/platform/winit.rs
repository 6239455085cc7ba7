use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

// Physical keys, so WASD/X/Y stay in place on non-QWERTY layouts.
fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,

            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,

            KeyCode::KeyA => Key::A,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyX => Key::X,
            KeyCode::KeyY => Key::Y,

            other => Key::Unknown(other as u32),
        },

        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_bound_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowUp)), Key::ArrowUp);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyX)), Key::X);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
    }

    #[test]
    fn unbound_keys_are_unknown() {
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown(_)));
    }

    #[test]
    fn focus_event_passes_through() {
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(true)),
            Some(InputEvent::Focused(true))
        );
    }
}
