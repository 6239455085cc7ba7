use super::types::Key;

/// Key press edges not yet handed to the app.
///
/// `InputState` holds what is currently down; `InputFrame` records the
/// presses that happened since the app last consumed them.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Press edges in arrival order. A key appears once per discrete press,
    /// so pressing twice before the app runs yields two entries.
    pub keys_pressed: Vec<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
    }
}
