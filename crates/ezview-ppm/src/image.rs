/// Pixel encoding selected by the magic number.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Format {
    /// `P3`: whitespace-delimited ASCII decimal samples.
    P3,
    /// `P6`: one raw byte per sample.
    P6,
}

impl Format {
    /// Maps the second magic byte to a format.
    pub fn from_magic(byte: u8) -> Option<Self> {
        match byte {
            b'3' => Some(Self::P3),
            b'6' => Some(Self::P6),
            _ => None,
        }
    }
}

/// One RGB pixel with 8 bits per channel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// A decoded image: row-major pixels, origin top-left.
///
/// `pixels.len() == width * height` holds for every image returned by the
/// decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub format: Format,
    pub width: u32,
    pub height: u32,
    /// Declared channel depth from the header (`1..=255`).
    pub maxval: u8,
    pub pixels: Vec<Pixel>,
}

impl Image {
    /// Returns the pixel at column `x`, row `y`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied()
    }

    /// Expands the pixels to tightly packed RGBA8 with opaque alpha.
    ///
    /// GPU APIs generally lack a 3-channel 8-bit texture format, so this is
    /// the layout handed to texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.red, p.green, p.blue, 0xff]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> Image {
        Image {
            format: Format::P3,
            width: 2,
            height: 1,
            maxval: 255,
            pixels: vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)],
        }
    }

    #[test]
    fn from_magic_known_and_unknown() {
        assert_eq!(Format::from_magic(b'3'), Some(Format::P3));
        assert_eq!(Format::from_magic(b'6'), Some(Format::P6));
        assert_eq!(Format::from_magic(b'5'), None);
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let img = two_by_one();
        assert_eq!(img.pixel(1, 0), Some(Pixel::new(4, 5, 6)));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 1), None);
    }

    #[test]
    fn rgba_expansion_appends_opaque_alpha() {
        assert_eq!(two_by_one().to_rgba8(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }
}
