//! ezview engine crate.
//!
//! Owns the platform + GPU runtime pieces behind the image viewer: window
//! loop, device/surface, keyboard input, the transform model and the
//! textured-quad renderer.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod transform;
pub mod viewer;
pub mod window;

pub use viewer::{run, ImageViewer, ViewerConfig};
