//! Colors, and how they are packed into a single `u32` per pixel.

/// A color with each channel a normalized intensity in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha; 1.0 is fully opaque.
    pub a: f64,
}

/// Converts a normalized intensity to a byte.  This truncates rather
/// than rounds, so `0.999` becomes 254, not 255.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    (v * 255.0) as u8
}

impl Rgba {
    /// Constructor.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// Packs the color with red in the least significant byte and
    /// alpha in the most significant.  On a little-endian machine the
    /// in-memory byte order is therefore r, g, b, a.
    pub fn pack(&self) -> u32 {
        u32::from(to_u8(self.r))
            | u32::from(to_u8(self.g)) << 8
            | u32::from(to_u8(self.b)) << 16
            | u32::from(to_u8(self.a)) << 24
    }
}

/// Splits a packed color back into its r, g, b, a bytes.
#[inline]
pub fn unpack(pixel: u32) -> [u8; 4] {
    pixel.to_le_bytes()
}
