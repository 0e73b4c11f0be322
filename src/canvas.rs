//! Contains the Canvas, which owns the pixel buffer, and the Geometry,
//! which describes the relationship between a rectangle on the
//! integral plane with an origin at 0,0 and the region of the complex
//! plane the Mandelbrot set lives in.
use std::mem::size_of;

use num::Complex;

use crate::color::unpack;
use crate::error::Error;

/// How far the real axis is shifted left.  With an offset of 1 the
/// canvas covers `[-1, 1)` on both axes, centered on the origin.
/// (An offset of 1.5 shows more of the bulb on the left; we don't.)
pub const HORIZONTAL_OFFSET: f64 = 1.0;

/// The first pixel of every non-empty canvas sits on a boundary of
/// this many bytes, so blocks sized to a 64-byte cache line start on
/// a line of their own.
pub const BUFFER_ALIGNMENT: usize = 64;

/// Extra slots allocated so the buffer can be shifted onto an
/// alignment boundary.
const ALIGNMENT_SLACK: usize = BUFFER_ALIGNMENT / size_of::<u32>() - 1;

/// Describes the width and height of the integral plane, and maps
/// pixels on it to points on the complex plane.  This is `Copy` so
/// that render threads can carry their own while the pixel buffer
/// itself is lent out in pieces.  Only a `Canvas` makes one, after
/// checking that `width * height` fits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    width: usize,
    height: usize,
}

impl Geometry {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of pixels on the integral plane.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when either side of the plane is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given the column and row of a pixel, return the complex number
    /// it represents.  Both axes are scaled to a width of 2; the real
    /// axis is shifted by `HORIZONTAL_OFFSET` and the imaginary axis by
    /// 1.
    pub fn position_of(&self, x: usize, y: usize) -> Complex<f64> {
        let px = x as f64 / self.width as f64;
        let py = y as f64 / self.height as f64;
        Complex::new(2.0 * px - HORIZONTAL_OFFSET, 2.0 * py - 1.0)
    }

    /// Given a linear offset into the buffer, return the column and
    /// row of that pixel.
    #[inline]
    pub fn coordinates_of(&self, offset: usize) -> (usize, usize) {
        (offset % self.width, offset / self.width)
    }
}

/// A fixed-size grid of packed colors.  There is deliberately no
/// `Clone`: a canvas has one owner for its whole life, and is lent to
/// the renderer by reference.
#[derive(Debug)]
pub struct Canvas {
    geometry: Geometry,
    // Never resized after construction, so `start` stays aligned.
    storage: Vec<u32>,
    start: usize,
}

impl Canvas {
    /// Allocates a zeroed canvas.  Zero-sized canvases are allowed; they
    /// simply have no pixels.
    pub fn new(width: usize, height: usize) -> Result<Canvas, Error> {
        let len = width
            .checked_mul(height)
            .ok_or(Error::Dimensions { width, height })?;
        let slack = if len == 0 { 0 } else { ALIGNMENT_SLACK };
        let capacity = len.checked_add(slack).ok_or(Error::Allocation(len))?;
        let mut storage: Vec<u32> = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| Error::Allocation(len))?;
        storage.resize(capacity, 0);
        let start = match storage.as_ptr().align_offset(BUFFER_ALIGNMENT) {
            offset if offset <= slack => offset,
            _ => 0,
        };
        Ok(Canvas {
            geometry: Geometry { width, height },
            storage,
            start,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    /// A copy of the canvas's dimensions and plane mapping.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The number of pixels.
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    /// True if the canvas has no pixels.
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// See `Geometry::position_of`.
    pub fn position_of(&self, x: usize, y: usize) -> Complex<f64> {
        self.geometry.position_of(x, y)
    }

    /// The slot for the pixel at column `x`, row `y`.  Both must be in
    /// range; anything else panics.
    pub fn pixel_at(&mut self, x: usize, y: usize) -> &mut u32 {
        debug_assert!(x < self.geometry.width && y < self.geometry.height);
        let width = self.geometry.width;
        &mut self.raw_mut()[y * width + x]
    }

    /// The packed color at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.raw()[y * self.geometry.width + x]
    }

    /// The whole buffer, row-major.
    pub fn raw(&self) -> &[u32] {
        &self.storage[self.start..self.start + self.geometry.len()]
    }

    /// The whole buffer, mutably.  The renderer splits this into
    /// per-thread blocks.
    pub fn raw_mut(&mut self) -> &mut [u32] {
        let end = self.start + self.geometry.len();
        &mut self.storage[self.start..end]
    }

    /// The buffer as the byte stream an RGBA8 encoder expects: four
    /// bytes per pixel, red first, rows of `width * 4` bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let pixels = self.raw();
        let mut bytes = Vec::with_capacity(pixels.len() * 4);
        for pixel in pixels {
            bytes.extend_from_slice(&unpack(*pixel));
        }
        bytes
    }
}
