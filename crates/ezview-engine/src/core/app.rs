use anyhow::Result;

use crate::input::InputFrame;
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime loop.
///
/// Any `Err` returned from a callback stops the loop and is returned from
/// `Runtime::run`.
pub trait App {
    /// Called once, after the window and GPU context exist and before the
    /// first frame.
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called during event dispatch whenever new key press edges arrive,
    /// whether or not the window is currently being redrawn.
    fn on_input(&mut self, input: &InputFrame) -> AppControl;

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
