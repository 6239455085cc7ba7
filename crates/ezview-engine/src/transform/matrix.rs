use glam::{Mat4, Vec3, Vec4};

use super::state::TransformState;

/// Width / height of the framebuffer; `1.0` while either side is zero
/// (minimized window).
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    width as f32 / height as f32
}

/// Orthographic projection whose visible extent is `[-aspect, aspect] × [-1, 1]`.
///
/// Depth `[-1, 1]` maps to wgpu's `[0, 1]` clip range, so the quad at `z = 0`
/// lands at depth `0.5`.
pub fn projection_matrix(aspect: f32) -> Mat4 {
    Mat4::orthographic_rh(-aspect, aspect, -1.0, 1.0, -1.0, 1.0)
}

/// Shear matrix: off-diagonal terms of an otherwise identity 2×2 block.
///
/// `x' = x + shear_x * y`, `y' = shear_y * x + y`.
pub fn shear_matrix(shear_x: f32, shear_y: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, shear_y, 0.0, 0.0),
        Vec4::new(shear_x, 1.0, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}

impl TransformState {
    /// Model matrix for the quad.
    ///
    /// Built as: identity, rotate about Z, translate in place by the pan,
    /// then left-multiply by scale and finally by shear. The pan therefore
    /// moves along the rotated axes.
    pub fn model_matrix(&self) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m *= Mat4::from_rotation_z(self.rotation);
        m *= Mat4::from_translation(Vec3::new(self.pan_x, self.pan_y, 0.0));
        m = Mat4::from_scale(Vec3::new(self.scale, self.scale, 1.0)) * m;
        shear_matrix(self.shear_x, self.shear_y) * m
    }

    /// Model-view-projection matrix for a framebuffer with the given aspect ratio.
    pub fn mvp(&self, aspect: f32) -> Mat4 {
        projection_matrix(aspect) * self.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec2;

    use super::*;

    const EPS: f32 = 1e-5;

    fn apply(m: Mat4, x: f32, y: f32) -> Vec2 {
        let p = m * Vec4::new(x, y, 0.0, 1.0);
        Vec2::new(p.x / p.w, p.y / p.w)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.abs_diff_eq(b, EPS)
    }

    // ── model ─────────────────────────────────────────────────────────────

    #[test]
    fn default_model_is_identity() {
        assert!(TransformState::default().model_matrix().abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn quarter_turn_maps_x_axis_to_y_axis() {
        let t = TransformState { rotation: FRAC_PI_2, ..TransformState::default() };
        assert!(close(apply(t.model_matrix(), 1.0, 0.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn scale_two_quad_has_side_four() {
        let t = TransformState { scale: 2.0, ..TransformState::default() };
        let m = t.model_matrix();
        let lo = apply(m, -1.0, -1.0);
        let hi = apply(m, 1.0, 1.0);
        assert!(close(hi - lo, Vec2::new(4.0, 4.0)));
        assert!(close(lo, Vec2::new(-2.0, -2.0)));
    }

    #[test]
    fn pan_translates_origin() {
        let t = TransformState { pan_x: 0.3, pan_y: -0.2, ..TransformState::default() };
        assert!(close(apply(t.model_matrix(), 0.0, 0.0), Vec2::new(0.3, -0.2)));
    }

    #[test]
    fn pan_follows_rotated_axes() {
        let t = TransformState {
            rotation: FRAC_PI_2,
            pan_x: 0.5,
            ..TransformState::default()
        };
        assert!(close(apply(t.model_matrix(), 0.0, 0.0), Vec2::new(0.0, 0.5)));
    }

    #[test]
    fn scale_applies_after_pan() {
        let t = TransformState { pan_x: 0.5, scale: 2.0, ..TransformState::default() };
        assert!(close(apply(t.model_matrix(), 0.0, 0.0), Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn shear_couples_axes() {
        let sx = TransformState { shear_x: 0.5, ..TransformState::default() };
        assert!(close(apply(sx.model_matrix(), 0.0, 1.0), Vec2::new(0.5, 1.0)));
        assert!(close(apply(sx.model_matrix(), 1.0, 0.0), Vec2::new(1.0, 0.0)));

        let sy = TransformState { shear_y: 0.5, ..TransformState::default() };
        assert!(close(apply(sy.model_matrix(), 1.0, 0.0), Vec2::new(1.0, 0.5)));
        assert!(close(apply(sy.model_matrix(), 0.0, 1.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn shear_applies_after_scale() {
        let t = TransformState { scale: 2.0, shear_x: 1.0, ..TransformState::default() };
        // scale: (0,1) -> (0,2); shear: x += 1 * 2
        assert!(close(apply(t.model_matrix(), 0.0, 1.0), Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn full_turn_is_identity() {
        let t = TransformState { rotation: 4.0 * FRAC_PI_2, ..TransformState::default() };
        assert!(close(apply(t.model_matrix(), 1.0, 0.0), Vec2::new(1.0, 0.0)));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_maps_extent_to_ndc_corners() {
        let p = projection_matrix(1.5);
        assert!(close(apply(p, 1.5, 1.0), Vec2::new(1.0, 1.0)));
        assert!(close(apply(p, -1.5, -1.0), Vec2::new(-1.0, -1.0)));
        assert!(close(apply(p, 0.0, 0.0), Vec2::ZERO));
    }

    #[test]
    fn projection_keeps_quad_inside_depth_range() {
        let z = (projection_matrix(1.0) * Vec4::new(0.0, 0.0, 0.0, 1.0)).z;
        assert!((0.0..=1.0).contains(&z));
    }

    #[test]
    fn mvp_is_projection_times_model() {
        let t = TransformState {
            rotation: 0.3,
            pan_x: 0.1,
            scale: 1.2,
            shear_y: 0.4,
            ..TransformState::default()
        };
        let expected = projection_matrix(2.0) * t.model_matrix();
        assert!(t.mvp(2.0).abs_diff_eq(expected, EPS));
    }

    #[test]
    fn aspect_ratio_guards_zero() {
        assert_eq!(aspect_ratio(640, 480), 640.0 / 480.0);
        assert_eq!(aspect_ratio(640, 0), 1.0);
        assert_eq!(aspect_ratio(0, 480), 1.0);
    }
}
