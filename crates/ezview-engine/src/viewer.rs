//! Image viewer application.
//!
//! Wires a decoded [`Image`] into the runtime: one window, one textured quad,
//! and keyboard-driven affine transforms.

use anyhow::Result;
use ezview_ppm::Image;
use winit::dpi::LogicalSize;

use crate::core::{App, AppControl, FrameCtx};
use crate::device::GpuInit;
use crate::input::{InputFrame, Key};
use crate::render::{ImageQuadRenderer, RenderCtx};
use crate::transform::{TransformState, TransformStep};
use crate::window::{Runtime, RuntimeConfig};

/// Viewer window and interaction settings.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Background visible around the quad.
    pub clear_color: wgpu::Color,
    pub step: TransformStep,
    pub gpu: GpuInit,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "ezview".to_string(),
            width: 640,
            height: 480,
            clear_color: wgpu::Color::BLACK,
            step: TransformStep::default(),
            gpu: GpuInit::default(),
        }
    }
}

/// Opens the viewer window for `image` and blocks until it is closed.
pub fn run(image: Image, config: ViewerConfig) -> Result<()> {
    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(f64::from(config.width), f64::from(config.height)),
    };
    let gpu_init = config.gpu.clone();

    log::info!(
        "opening {}x{} window for {}x{} image",
        config.width,
        config.height,
        image.width,
        image.height
    );

    Runtime::run(runtime, gpu_init, ImageViewer::new(image, config))
}

/// What the viewer should do after a batch of key presses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum KeyOutcome {
    Continue,
    Close,
}

/// Applies key presses in order. Escape stops processing and requests close.
fn apply_keys(transform: &mut TransformState, step: &TransformStep, keys: &[Key]) -> KeyOutcome {
    for &key in keys {
        if key == Key::Escape {
            return KeyOutcome::Close;
        }
        match transform.handle_key(key, step) {
            Some(action) => log::info!("{}", action.describe()),
            None => log::trace!("unbound key {key}"),
        }
    }
    KeyOutcome::Continue
}

/// [`App`] that displays one image on a transformable quad.
pub struct ImageViewer {
    image: Image,
    config: ViewerConfig,
    transform: TransformState,
    renderer: ImageQuadRenderer,
}

impl ImageViewer {
    pub fn new(image: Image, config: ViewerConfig) -> Self {
        Self {
            image,
            config,
            transform: TransformState::default(),
            renderer: ImageQuadRenderer::new(),
        }
    }
}

impl App for ImageViewer {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.renderer.set_image(ctx, &self.image)
    }

    fn on_input(&mut self, input: &InputFrame) -> AppControl {
        match apply_keys(&mut self.transform, &self.config.step, &input.keys_pressed) {
            KeyOutcome::Continue => AppControl::Continue,
            KeyOutcome::Close => {
                log::info!("closing");
                AppControl::Exit
            }
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let mvp = self.transform.mvp(ctx.aspect_ratio());
        let renderer = &mut self.renderer;

        ctx.render(self.config.clear_color, |rctx, target| {
            renderer.render(rctx, target, mvp);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> TransformStep {
        TransformStep::default()
    }

    #[test]
    fn default_config_matches_window_defaults() {
        let c = ViewerConfig::default();
        assert_eq!((c.width, c.height), (640, 480));
        assert_eq!(c.title, "ezview");
        assert_eq!(c.clear_color, wgpu::Color::BLACK);
    }

    #[test]
    fn keys_apply_in_order() {
        let mut t = TransformState::default();
        let out = apply_keys(&mut t, &step(), &[Key::ArrowUp, Key::D, Key::X]);
        assert_eq!(out, KeyOutcome::Continue);
        assert!((t.scale - 1.1).abs() < 1e-6);
        assert!((t.pan_x - 0.1).abs() < 1e-6);
        assert!((t.shear_x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn escape_closes_and_stops_processing() {
        let mut t = TransformState::default();
        let out = apply_keys(&mut t, &step(), &[Key::W, Key::Escape, Key::W]);
        assert_eq!(out, KeyOutcome::Close);
        assert!((t.pan_y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn unbound_keys_change_nothing() {
        let mut t = TransformState::default();
        let out = apply_keys(&mut t, &step(), &[Key::Unknown(7)]);
        assert_eq!(out, KeyOutcome::Continue);
        assert_eq!(t, TransformState::default());
    }

    #[test]
    fn viewer_applies_presses_and_closes_on_escape() {
        let img = ezview_ppm::decode(b"P3\n1 1\n255\n1 2 3\n").unwrap();
        let mut v = ImageViewer::new(img, ViewerConfig::default());
        assert_eq!(v.transform, TransformState::default());

        let mut input = InputFrame::default();
        input.keys_pressed.push(Key::ArrowRight);
        assert_eq!(v.on_input(&input), AppControl::Continue);
        assert_eq!(v.transform.rotation, std::f32::consts::FRAC_PI_2);

        input.keys_pressed = vec![Key::Escape];
        assert_eq!(v.on_input(&input), AppControl::Exit);
    }
}
