//! Affine transform state driven by the keyboard, and its matrix form.
//!
//! `TransformState` is the only mutable viewer state. Key presses mutate it
//! through `TransformAction`s; each frame composes it into one MVP matrix.

mod matrix;
mod state;

pub use matrix::{aspect_ratio, projection_matrix, shear_matrix};
pub use state::{TransformAction, TransformState, TransformStep};
