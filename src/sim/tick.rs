//! Per-tick block simulation
//!
//! Every block integrates independently, so the arena is split into chunks
//! and processed in parallel. Results are bit-identical to the sequential
//! pass because no block reads another block's state.

use rayon::prelude::*;

use super::block::BlockRecord;
use super::state::World;

/// Blocks per parallel work item
pub const PARALLEL_CHUNK: usize = 1024;

/// Advance every block by `dt` in parallel
pub fn step(blocks: &mut [BlockRecord], dt: f32) {
    if blocks.len() <= PARALLEL_CHUNK {
        step_sequential(blocks, dt);
        return;
    }

    blocks.par_chunks_mut(PARALLEL_CHUNK).for_each(|chunk| {
        for block in chunk {
            block.integrate(dt);
        }
    });
}

/// Single-threaded reference pass
pub fn step_sequential(blocks: &mut [BlockRecord], dt: f32) {
    for block in blocks {
        block.integrate(dt);
    }
}

/// Advance the world by one tick of length `dt`
pub fn tick(world: &mut World, dt: f32) {
    step(&mut world.blocks, dt);
    world.tick_count += 1;
}
