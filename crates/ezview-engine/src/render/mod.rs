//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, textures) and
//! creates them lazily on first use against the current surface format.
//!
//! Convention: vertex positions are model-space coordinates; the vertex
//! shader multiplies them by a per-frame MVP uniform.

mod ctx;
pub mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::ImageQuadRenderer;
