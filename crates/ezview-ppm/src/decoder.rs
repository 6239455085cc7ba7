use crate::error::PpmError;
use crate::image::{Format, Image, Pixel};
use crate::reader::ByteReader;

/// Decodes a complete `.ppm` byte stream, magic number included.
///
/// The magic number is validated before any header byte is looked at.
pub fn decode(bytes: &[u8]) -> Result<Image, PpmError> {
    let mut r = ByteReader::new(bytes);

    if r.next() != Some(b'P') {
        return Err(PpmError::NotPpm);
    }
    let format = match r.next() {
        Some(b) => Format::from_magic(b).ok_or(PpmError::UnsupportedFormat(b))?,
        None => return Err(PpmError::NotPpm),
    };

    decode_body(format, &bytes[r.position()..])
}

/// Decodes a stream positioned just after the two magic-number bytes.
///
/// Expects `\n [#comment\n]* width height maxval <ws>` followed by
/// `width * height` pixels in the encoding selected by `format`.
pub fn decode_body(format: Format, body: &[u8]) -> Result<Image, PpmError> {
    let mut r = ByteReader::new(body);

    if r.next() != Some(b'\n') {
        return Err(PpmError::MissingNewline);
    }

    let comments = r.skip_comment_lines();
    if comments > 0 {
        log::debug!("skipped {comments} comment line(s) in header");
    }

    let width = header_value(&mut r, "width", || PpmError::header("width is too large"))?;
    let height = header_value(&mut r, "height", || PpmError::header("height is too large"))?;
    let maxval = header_value(&mut r, "maxval", || PpmError::UnsupportedDepth(None))?;

    if maxval > 255 {
        return Err(PpmError::UnsupportedDepth(Some(maxval)));
    }
    let maxval = maxval as u8;

    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| PpmError::header(format!("dimensions {width}x{height} overflow")))?;

    // A single whitespace byte separates maxval from the sample data.
    match r.next() {
        Some(b) if b.is_ascii_whitespace() => {}
        Some(_) => return Err(PpmError::header("expected whitespace after maxval")),
        None => {
            return Err(PpmError::Truncated {
                expected: count,
                read: 0,
            });
        }
    }

    let pixels = match format {
        Format::P3 => read_ascii_pixels(&mut r, count, maxval)?,
        Format::P6 => read_binary_pixels(&mut r, count)?,
    };

    if r.remaining() > 0 {
        log::debug!("ignoring {} trailing byte(s) after pixel data", r.remaining());
    }

    log::info!("decoded {format:?} image {width}x{height} (maxval {maxval})");

    Ok(Image {
        format,
        width,
        height,
        maxval,
        pixels,
    })
}

/// Reads one positive header number; `too_large` builds the error for a value
/// that overflows `u32`.
fn header_value(
    r: &mut ByteReader<'_>,
    field: &str,
    too_large: impl FnOnce() -> PpmError,
) -> Result<u32, PpmError> {
    r.skip_whitespace_and_comments();
    let value = r
        .read_decimal()
        .map_err(|()| too_large())?
        .ok_or_else(|| match r.peek() {
            Some(b) => PpmError::header(format!(
                "expected {field}, found {:?}",
                char::from(b)
            )),
            None => PpmError::header(format!("expected {field}, found end of file")),
        })?;

    if value == 0 {
        return Err(PpmError::header(format!("{field} must be positive")));
    }
    Ok(value)
}

// Capacity is bounded by the bytes actually present so a lying header cannot
// force a huge allocation up front.
fn pixel_buffer(count: usize, remaining: usize) -> Vec<Pixel> {
    Vec::with_capacity(count.min(remaining / 3))
}

fn read_binary_pixels(r: &mut ByteReader<'_>, count: usize) -> Result<Vec<Pixel>, PpmError> {
    let mut pixels = pixel_buffer(count, r.remaining());
    while pixels.len() < count {
        let Some(&[red, green, blue]) = r.take(3) else {
            return Err(PpmError::Truncated {
                expected: count,
                read: pixels.len(),
            });
        };
        pixels.push(Pixel::new(red, green, blue));
    }
    Ok(pixels)
}

fn read_ascii_pixels(
    r: &mut ByteReader<'_>,
    count: usize,
    maxval: u8,
) -> Result<Vec<Pixel>, PpmError> {
    let mut pixels = pixel_buffer(count, r.remaining());
    let mut index = 0usize;
    while pixels.len() < count {
        let mut rgb = [0u8; 3];
        for channel in &mut rgb {
            *channel = match ascii_sample(r, index, maxval)? {
                Some(v) => v,
                None => {
                    return Err(PpmError::Truncated {
                        expected: count,
                        read: pixels.len(),
                    });
                }
            };
            index += 1;
        }
        pixels.push(Pixel::new(rgb[0], rgb[1], rgb[2]));
    }
    Ok(pixels)
}

/// Reads one whitespace-delimited sample; `Ok(None)` at end of stream.
fn ascii_sample(r: &mut ByteReader<'_>, index: usize, maxval: u8) -> Result<Option<u8>, PpmError> {
    r.skip_whitespace();
    let Some(next) = r.peek() else {
        return Ok(None);
    };

    let invalid = |message: String| PpmError::InvalidSample { index, message };

    let value = r
        .read_decimal()
        .map_err(|()| invalid("value is too large".to_string()))?
        .ok_or_else(|| invalid(format!("expected decimal integer, found {:?}", char::from(next))))?;

    if value > u32::from(maxval) {
        return Err(invalid(format!("{value} exceeds maxval {maxval}")));
    }
    Ok(Some(value as u8))
}
