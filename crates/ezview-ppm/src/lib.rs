//! Decoder for **Portable PixMap** images (`.ppm`), ASCII `P3` and binary `P6`.
//!
//! This crate does not depend on any windowing or GPU code; the viewer hands
//! the decoded [`Image`] to the engine for texture upload.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`image`] | `Image`, `Pixel`, `Format` |
//! | [`error`] | `PpmError` |
//! | [`decoder`] | `decode`, `decode_body` |
//!
//! # Quick start
//!
//! ```rust
//! use ezview_ppm::{decode, Pixel};
//!
//! let img = decode(b"P3\n# tiny\n2 1\n255\n255 0 0  0 0 255\n").unwrap();
//! assert_eq!((img.width, img.height), (2, 1));
//! assert_eq!(img.pixels[1], Pixel::new(0, 0, 255));
//! ```

pub mod decoder;
pub mod error;
pub mod image;
mod reader;

use std::path::Path;

pub use decoder::{decode, decode_body};
pub use error::PpmError;
pub use image::{Format, Image, Pixel};

/// Reads and decodes the `.ppm` file at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<Image, PpmError> {
    let path = path.as_ref();
    log::debug!("reading {}", path.display());
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}
