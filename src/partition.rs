//! Block-striped partitioning of a linear pixel buffer.
//!
//! The buffer is cut into blocks the size of one cache line, and the
//! blocks are dealt out to workers like cards: worker `i` gets blocks
//! `i`, `i + n`, `i + 2n` and so on.  Striding pixel by pixel would
//! put every worker's writes on the same cache lines as its
//! neighbours'; striding by block keeps them apart.  The last block
//! may be short, and when the pixel count isn't a multiple of
//! `n * block_size` the early workers get one block more than the
//! late ones.

use std::mem::size_of;
use std::ops::Range;

/// How many packed pixels fill a cache line of `cache_line_bytes`.
/// Never less than one, so a tiny "cache line" degrades to a plain
/// per-pixel stride.
pub fn block_size(cache_line_bytes: usize) -> usize {
    (cache_line_bytes / size_of::<u32>()).max(1)
}

/// A worker's view of one block: where it starts in the full buffer,
/// and the slots it may write.
#[derive(Debug)]
pub struct Block<'a, T> {
    /// Linear offset of `pixels[0]` in the full buffer.
    pub start: usize,
    /// The block's slots.
    pub pixels: &'a mut [T],
}

/// Describes how a buffer of `len` slots is striped across `workers`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockStripes {
    len: usize,
    block_size: usize,
    workers: usize,
}

impl BlockStripes {
    /// Both `block_size` and `workers` must be at least one.
    pub fn new(len: usize, block_size: usize, workers: usize) -> BlockStripes {
        assert!(block_size > 0, "block size must be positive");
        assert!(workers > 0, "worker count must be positive");
        BlockStripes {
            len,
            block_size,
            workers,
        }
    }

    /// Number of blocks, counting a short final block.
    pub fn block_count(&self) -> usize {
        (self.len + self.block_size - 1) / self.block_size
    }

    /// The block size in slots.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The index ranges claimed by `worker`, in order.
    pub fn blocks_of(&self, worker: usize) -> impl Iterator<Item = Range<usize>> {
        let BlockStripes {
            len,
            block_size,
            workers,
        } = *self;
        (worker..self.block_count())
            .step_by(workers)
            .map(move |block| {
                let start = block * block_size;
                start..(start + block_size).min(len)
            })
    }

    /// Cuts `buffer` into per-worker lists of mutable blocks.  The
    /// views come from `chunks_mut`, so they cannot overlap.
    pub fn split<'a, T>(&self, buffer: &'a mut [T]) -> Vec<Vec<Block<'a, T>>> {
        assert_eq!(buffer.len(), self.len, "buffer does not match partition");
        let mut assigned: Vec<Vec<Block<'a, T>>> = (0..self.workers).map(|_| vec![]).collect();
        for (i, pixels) in buffer.chunks_mut(self.block_size).enumerate() {
            assigned[i % self.workers].push(Block {
                start: i * self.block_size,
                pixels,
            });
        }
        assigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_four_byte_lines_hold_sixteen_pixels() {
        assert_eq!(block_size(64), 16);
        assert_eq!(block_size(128), 32);
        assert_eq!(block_size(4), 1);
        assert_eq!(block_size(1), 1);
    }

    #[test]
    fn blocks_are_dealt_round_robin() {
        let stripes = BlockStripes::new(100, 16, 3);
        assert_eq!(stripes.block_count(), 7);
        let w0: Vec<Range<usize>> = stripes.blocks_of(0).collect();
        assert_eq!(w0, vec![0..16, 48..64, 96..100]);
        let w2: Vec<Range<usize>> = stripes.blocks_of(2).collect();
        assert_eq!(w2, vec![32..48, 80..96]);
    }

    #[test]
    fn surplus_workers_get_nothing() {
        let stripes = BlockStripes::new(20, 16, 16);
        assert_eq!(stripes.blocks_of(0).count(), 1);
        assert_eq!(stripes.blocks_of(1).collect::<Vec<_>>(), vec![16..20]);
        assert_eq!(stripes.blocks_of(2).count(), 0);
        assert_eq!(stripes.blocks_of(15).count(), 0);
    }

    #[test]
    fn empty_buffer_has_no_blocks() {
        let stripes = BlockStripes::new(0, 16, 4);
        assert_eq!(stripes.block_count(), 0);
        for w in 0..4 {
            assert_eq!(stripes.blocks_of(w).count(), 0);
        }
        let mut buffer: Vec<u32> = vec![];
        assert!(stripes.split(&mut buffer).iter().all(|b| b.is_empty()));
    }

    #[test]
    fn every_index_is_claimed_exactly_once() {
        for &len in &[0, 1, 15, 16, 17, 255, 256, 1000, 4097] {
            for &block in &[1, 3, 16] {
                for &workers in &[1, 2, 5, 16, 33] {
                    let stripes = BlockStripes::new(len, block, workers);
                    let mut seen = vec![0u32; len];
                    for w in 0..workers {
                        for range in stripes.blocks_of(w) {
                            for i in range {
                                seen[i] += 1;
                            }
                        }
                    }
                    assert!(
                        seen.iter().all(|n| *n == 1),
                        "len {} block {} workers {}",
                        len,
                        block,
                        workers
                    );
                }
            }
        }
    }

    #[test]
    fn split_views_match_the_claimed_ranges() {
        let stripes = BlockStripes::new(70, 16, 3);
        let mut buffer: Vec<usize> = vec![usize::MAX; 70];
        {
            let assigned = stripes.split(&mut buffer);
            assert_eq!(assigned.len(), 3);
            for (worker, blocks) in assigned.into_iter().enumerate() {
                let ranges: Vec<Range<usize>> = stripes.blocks_of(worker).collect();
                assert_eq!(ranges.len(), blocks.len());
                for (range, block) in ranges.iter().zip(blocks) {
                    assert_eq!(range.start, block.start);
                    assert_eq!(range.len(), block.pixels.len());
                    for slot in block.pixels.iter_mut() {
                        *slot = worker;
                    }
                }
            }
        }
        assert_eq!(buffer[0], 0);
        assert_eq!(buffer[16], 1);
        assert_eq!(buffer[32], 2);
        assert_eq!(buffer[48], 0);
        assert_eq!(buffer[69], 1);
        assert!(buffer.iter().all(|w| *w < 3));
    }
}
