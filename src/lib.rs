#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  For every pixel of a canvas we
//! find the matching point on the plane, count how many squarings it
//! takes before the point "escapes," and turn that count into a
//! color.  Points that never escape are painted black; points that
//! escape quickly are painted bright yellow.
//!
//! The pixel buffer is split into cache-line sized blocks, and the
//! blocks are dealt out round-robin to a fixed pool of scoped
//! threads.  Each thread only ever holds mutable slices of its own
//! blocks, so neighbouring threads rarely share a cache line and no
//! locking is necessary.

extern crate crossbeam;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;

pub mod canvas;
pub mod color;
pub mod error;
pub mod escape;
pub mod output;
pub mod partition;
pub mod render;

pub use canvas::{Canvas, Geometry};
pub use color::Rgba;
pub use error::Error;
pub use output::{write_image, OutputFormat};
pub use render::{render, RenderConfig, RenderStats};
