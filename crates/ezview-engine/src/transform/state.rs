use std::f32::consts::FRAC_PI_2;

use crate::input::Key;

/// Increment applied by each discrete key press.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformStep {
    /// Added to / subtracted from `scale` by Up / Down.
    pub scale: f32,
    /// Radians added / subtracted by Right / Left.
    pub rotation: f32,
    /// Added to `shear_x` / `shear_y` by X / Y.
    pub shear: f32,
    /// Added to / subtracted from the pan offsets by WASD.
    pub pan: f32,
}

impl Default for TransformStep {
    fn default() -> Self {
        Self {
            scale: 0.1,
            rotation: FRAC_PI_2,
            shear: 0.1,
            pan: 0.1,
        }
    }
}

/// A single key-bound adjustment of the transform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransformAction {
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    ShearX,
    ShearY,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
}

impl TransformAction {
    /// Key binding table. Escape and unbound keys return `None`.
    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::ArrowUp => Self::ZoomIn,
            Key::ArrowDown => Self::ZoomOut,
            Key::ArrowLeft => Self::RotateLeft,
            Key::ArrowRight => Self::RotateRight,
            Key::X => Self::ShearX,
            Key::Y => Self::ShearY,
            Key::A => Self::PanLeft,
            Key::D => Self::PanRight,
            Key::W => Self::PanUp,
            Key::S => Self::PanDown,
            Key::Escape | Key::Unknown(_) => return None,
        })
    }

    /// Past-tense description for the log.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoomed in",
            Self::ZoomOut => "zoomed out",
            Self::RotateLeft => "rotated left",
            Self::RotateRight => "rotated right",
            Self::ShearX => "sheared x-axis",
            Self::ShearY => "sheared y-axis",
            Self::PanLeft => "translated left",
            Self::PanRight => "translated right",
            Self::PanUp => "translated up",
            Self::PanDown => "translated down",
        }
    }
}

/// Live affine transform parameters for the displayed image.
///
/// All fields are unbounded: rotation wraps through trig periodicity, and a
/// zero or negative scale simply produces a degenerate or mirrored quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    /// Z rotation in radians.
    pub rotation: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub scale: f32,
    /// Couples Y displacement into X.
    pub shear_x: f32,
    /// Couples X displacement into Y.
    pub shear_y: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
            shear_x: 0.0,
            shear_y: 0.0,
        }
    }
}

impl TransformState {
    /// Applies one action using the increments in `step`.
    pub fn apply(&mut self, action: TransformAction, step: &TransformStep) {
        match action {
            TransformAction::ZoomIn => self.scale += step.scale,
            TransformAction::ZoomOut => self.scale -= step.scale,
            TransformAction::RotateLeft => self.rotation -= step.rotation,
            TransformAction::RotateRight => self.rotation += step.rotation,
            TransformAction::ShearX => self.shear_x += step.shear,
            TransformAction::ShearY => self.shear_y += step.shear,
            TransformAction::PanLeft => self.pan_x -= step.pan,
            TransformAction::PanRight => self.pan_x += step.pan,
            TransformAction::PanUp => self.pan_y += step.pan,
            TransformAction::PanDown => self.pan_y -= step.pan,
        }
    }

    /// Applies the action bound to `key`, if any. Returns the applied action.
    pub fn handle_key(&mut self, key: Key, step: &TransformStep) -> Option<TransformAction> {
        let action = TransformAction::from_key(key)?;
        self.apply(action, step);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> TransformStep {
        TransformStep::default()
    }

    #[test]
    fn defaults_are_identity_equivalent() {
        let t = TransformState::default();
        assert_eq!(t.rotation, 0.0);
        assert_eq!((t.pan_x, t.pan_y), (0.0, 0.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!((t.shear_x, t.shear_y), (0.0, 0.0));
    }

    #[test]
    fn up_adds_exactly_one_increment() {
        let mut t = TransformState::default();
        t.handle_key(Key::ArrowUp, &step());
        assert_eq!(t.scale, 1.0 + 0.1);
        t.handle_key(Key::ArrowDown, &step());
        t.handle_key(Key::ArrowDown, &step());
        assert!((t.scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rotation_steps_are_quarter_turns() {
        let mut t = TransformState::default();
        t.handle_key(Key::ArrowRight, &step());
        assert_eq!(t.rotation, FRAC_PI_2);
        t.handle_key(Key::ArrowLeft, &step());
        t.handle_key(Key::ArrowLeft, &step());
        assert_eq!(t.rotation, -FRAC_PI_2);
    }

    #[test]
    fn wasd_pans_and_xy_shear() {
        let mut t = TransformState::default();
        for k in [Key::D, Key::D, Key::A, Key::W, Key::S, Key::S, Key::X, Key::Y, Key::Y] {
            t.handle_key(k, &step());
        }
        assert!((t.pan_x - 0.1).abs() < 1e-6);
        assert!((t.pan_y + 0.1).abs() < 1e-6);
        assert!((t.shear_x - 0.1).abs() < 1e-6);
        assert!((t.shear_y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn scale_may_go_negative() {
        let mut t = TransformState::default();
        for _ in 0..15 {
            t.apply(TransformAction::ZoomOut, &step());
        }
        assert!(t.scale < 0.0);
    }

    #[test]
    fn escape_and_unknown_are_not_transform_keys() {
        let mut t = TransformState::default();
        assert_eq!(t.handle_key(Key::Escape, &step()), None);
        assert_eq!(t.handle_key(Key::Unknown(42), &step()), None);
        assert_eq!(t, TransformState::default());
    }

    #[test]
    fn custom_step_is_honoured() {
        let mut t = TransformState::default();
        let s = TransformStep { pan: 0.5, ..TransformStep::default() };
        t.apply(TransformAction::PanRight, &s);
        assert_eq!(t.pan_x, 0.5);
    }
}
