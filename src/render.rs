// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render engine: partitions a canvas into block stripes, and
//! paints every stripe on its own scoped thread.

use std::mem::size_of;
use std::time::{Duration, Instant};

use crossbeam::thread::ScopedJoinHandle;

use crate::canvas::{Canvas, Geometry};
use crate::error::Error;
use crate::escape::color_pixel;
use crate::partition::{block_size, Block, BlockStripes};

/// The number of render threads when nobody says otherwise.  This is
/// a fixed number, not the number of cores on the machine.
pub const DEFAULT_WORKERS: usize = 16;

/// The cache line size assumed when nobody says otherwise.
pub const DEFAULT_CACHE_LINE_BYTES: usize = 64;

/// The knobs of a render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// How many threads to paint with.
    pub workers: usize,
    /// The cache line size, in bytes, used to size the blocks each
    /// thread is handed.
    pub cache_line_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            workers: DEFAULT_WORKERS,
            cache_line_bytes: DEFAULT_CACHE_LINE_BYTES,
        }
    }
}

impl RenderConfig {
    /// Rejects configurations we can't partition with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        if self.cache_line_bytes < size_of::<u32>() {
            return Err(Error::Config(format!(
                "cache line of {} bytes cannot hold a pixel",
                self.cache_line_bytes
            )));
        }
        Ok(())
    }

    /// Pixels per block.
    pub fn block_size(&self) -> usize {
        block_size(self.cache_line_bytes)
    }
}

/// What happened during a render.
#[derive(Clone, Debug)]
pub struct RenderStats {
    /// Pixels written by each worker, indexed by worker number.
    pub pixels_per_worker: Vec<usize>,
    /// Wall clock time from spawning the first thread to joining the
    /// last.
    pub elapsed: Duration,
}

impl RenderStats {
    /// Pixels written in total.
    pub fn total(&self) -> usize {
        self.pixels_per_worker.iter().sum()
    }
}

/// Paints one worker's blocks.  Returns how many pixels it wrote.
fn paint_blocks(geometry: Geometry, blocks: Vec<Block<u32>>) -> usize {
    let mut written = 0;
    for block in blocks {
        for (i, slot) in block.pixels.iter_mut().enumerate() {
            let (x, y) = geometry.coordinates_of(block.start + i);
            *slot = color_pixel(geometry.position_of(x, y));
            written += 1;
        }
    }
    written
}

/// The main entry point.  Paints every pixel of `canvas` with its
/// escape-time color, using `config.workers` threads.  All threads
/// are joined before this returns.
pub fn render(canvas: &mut Canvas, config: &RenderConfig) -> Result<RenderStats, Error> {
    config.validate()?;
    let geometry = canvas.geometry();
    let stripes = BlockStripes::new(canvas.len(), config.block_size(), config.workers);
    info!(
        "rendering {}x{} on {} workers, {} pixels per block",
        geometry.width(),
        geometry.height(),
        stripes.workers(),
        stripes.block_size()
    );

    let started = Instant::now();
    let assigned = stripes.split(canvas.raw_mut());
    let joined = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<usize>> = assigned
            .into_iter()
            .map(|blocks| spawner.spawn(move |_| paint_blocks(geometry, blocks)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<usize>, _>>()
    });
    let pixels_per_worker = joined
        .map_err(|_| Error::WorkerPanicked)?
        .map_err(|_| Error::WorkerPanicked)?;
    let elapsed = started.elapsed();

    for (worker, written) in pixels_per_worker.iter().enumerate() {
        debug!("worker {} wrote {} pixels", worker, written);
    }
    info!("rendered {} pixels in {:?}", canvas.len(), elapsed);

    Ok(RenderStats {
        pixels_per_worker,
        elapsed,
    })
}
