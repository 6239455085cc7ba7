use std::fmt;
use std::io;

/// A failure while reading or decoding a `.ppm` file.
#[derive(Debug)]
pub enum PpmError {
    /// The file could not be read.
    Io(io::Error),
    /// First byte is not `P`.
    NotPpm,
    /// Magic number is `P` followed by something other than `3` or `6`.
    UnsupportedFormat(u8),
    /// The magic number is not followed by a newline.
    MissingNewline,
    /// Width, height or maxval is missing, not a number, or zero.
    MalformedHeader(String),
    /// Declared maxval does not fit in one byte per channel. `None` when the
    /// declared value does not even fit in a `u32`.
    UnsupportedDepth(Option<u32>),
    /// A P3 sample is not a decimal integer or exceeds maxval.
    InvalidSample {
        /// Zero-based index of the offending channel value.
        index: usize,
        message: String,
    },
    /// Pixel data ended before `width * height` pixels were read.
    Truncated { expected: usize, read: usize },
}

impl PpmError {
    pub(crate) fn header(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }
}

impl fmt::Display for PpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(_) => write!(f, "File was not found or could not be read"),
            Self::NotPpm => write!(f, "Incorrect file type: Expected .PPM file"),
            Self::UnsupportedFormat(b) => write!(
                f,
                "Incorrect file type: Expected P3 or P6 file (found P{})",
                (*b as char).escape_default()
            ),
            Self::MissingNewline => write!(f, "Incorrect .PPM file type"),
            Self::MalformedHeader(msg) => write!(f, "Malformed .PPM header: {msg}"),
            Self::UnsupportedDepth(Some(maxval)) => {
                write!(f, "Image not an 8 bit channel (maxval {maxval})")
            }
            Self::UnsupportedDepth(None) => {
                write!(f, "Image not an 8 bit channel (maxval out of range)")
            }
            Self::InvalidSample { index, message } => {
                write!(f, "Invalid sample #{index}: {message}")
            }
            Self::Truncated { expected, read } => write!(
                f,
                "Pixel data truncated: expected {expected} pixels, read {read}"
            ),
        }
    }
}

impl std::error::Error for PpmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PpmError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
