//! The escape-time kernel: how many times can we square a point and
//! add it back to itself before it runs away?
use num::Complex;

use crate::color::Rgba;

/// The most iterations we'll run for any one point.  Points that
/// survive this long are treated as inside the set.
pub const ITERATION_CAP: u32 = 256;

/// Once the squared magnitude of `z` reaches this, the point has
/// escaped.
pub const ESCAPE_THRESHOLD: f64 = 2.0;

/// This is our classic iterator function.  It returns the number of
/// iterations completed before the point escaped, or `ITERATION_CAP`
/// if it never did.
pub fn escape_iterations(c: Complex<f64>) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut iter = 0;
    while iter < ITERATION_CAP && z.norm_sqr() < ESCAPE_THRESHOLD {
        z = z * z + c;
        iter += 1;
    }
    iter
}

/// Maps an iteration count to an intensity: `(cap - iter) / cap`.
/// Points inside the set get 0.
pub fn light(iter: u32) -> f64 {
    f64::from(ITERATION_CAP - iter) / f64::from(ITERATION_CAP)
}

/// The color of a point that took `iter` iterations: a red-green
/// (yellow) ramp, fully opaque.
pub fn escape_color(iter: u32) -> Rgba {
    let l = light(iter);
    Rgba::new(l, l, 0.0, 1.0)
}

/// The packed color of the point `c`.
pub fn color_pixel(c: Complex<f64>) -> u32 {
    escape_color(escape_iterations(c)).pack()
}
