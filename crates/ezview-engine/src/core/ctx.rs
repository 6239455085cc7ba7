use anyhow::Result;
use wgpu::SurfaceError;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu:    &'a mut Gpu<'w>,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Framebuffer width / height at the time of this frame.
    pub fn aspect_ratio(&self) -> f32 {
        let size = self.gpu.size();
        crate::transform::aspect_ratio(size.width, size.height)
    }

    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// Recoverable surface errors skip the frame; an unrecoverable one is
    /// returned as `Err`.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> Result<AppControl>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimized; nothing to present.
            return Ok(AppControl::Continue);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err.clone());
                return surface_error_outcome(err, action);
            }
        };

        // Clear pass, dropped before the encoder is moved into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ezview clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let rctx = self.gpu.render_ctx();
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}

/// Frame outcome after a surface error has been handled.
fn surface_error_outcome(err: SurfaceError, action: SurfaceErrorAction) -> Result<AppControl> {
    match action {
        SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("unrecoverable surface error: {err}")),
        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
            Ok(AppControl::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_surface_error_is_returned() {
        let err = surface_error_outcome(SurfaceError::OutOfMemory, SurfaceErrorAction::Fatal)
            .unwrap_err();
        assert!(err.to_string().starts_with("unrecoverable surface error"), "{err}");
    }

    #[test]
    fn recoverable_surface_errors_continue() {
        let skip = surface_error_outcome(SurfaceError::Timeout, SurfaceErrorAction::SkipFrame);
        assert_eq!(skip.unwrap(), AppControl::Continue);

        let lost = surface_error_outcome(SurfaceError::Lost, SurfaceErrorAction::Reconfigured);
        assert_eq!(lost.unwrap(), AppControl::Continue);
    }
}
