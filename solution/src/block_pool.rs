//! The block pool layer.
//!
//! Implements [`FileSysSupport`] and [`BlockSupport`]: a fixed-capacity array
//! of block ownership slots, the ground truth of what is free versus
//! allocated. Higher layers never touch block state except through this one.
//!
//! [`FileSysSupport`]: ../../inosim_api/fs/trait.FileSysSupport.html
//! [`BlockSupport`]: ../../inosim_api/fs/trait.BlockSupport.html

use inosim_api::fs::{BlockSupport, FileSysSupport};
use inosim_api::types::{BlockOwner, DiskGeometry, PoolStatus, POINTER_SIZE};

use super::error_fs::PoolLayerError;

/// Name of the file system type this layer exposes.
pub type FSName = BlockPoolFS;

/// Struct representing the block pool layer.
#[derive(Debug, Clone)]
pub struct BlockPoolFS {
    /// the geometry, cached for fast access
    geometry: DiskGeometry,
    /// one ownership tag per block, indexed by block number
    slots: Vec<BlockOwner>,
    /// running count of free slots, kept in sync with `slots`
    free: u64,
}

/// Functions specific to BlockPoolFS
impl BlockPoolFS {
    /// Forget all ownership, marking every block free again.
    /// The defragmentation layer uses this before replaying allocations.
    pub(crate) fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = BlockOwner::Free;
        }
        self.free = self.geometry.total_blocks;
    }

    /// Mark block `i` owned without the occupancy check of `b_claim`.
    /// Only valid on blocks known to be free; the defragmentation replay
    /// calls this on a freshly reset pool.
    pub(crate) fn occupy(&mut self, i: u64, owner: BlockOwner) {
        debug_assert!(self.slots[i as usize].is_free());
        debug_assert!(!owner.is_free());
        self.slots[i as usize] = owner;
        self.free -= 1;
    }
}

impl FileSysSupport for BlockPoolFS {
    type Error = PoolLayerError;

    fn geometry_valid(geom: &DiskGeometry) -> bool {
        geom.total_blocks > 0 && geom.direct_ptrs > 0 && geom.block_size >= *POINTER_SIZE
    }

    fn init(geom: &DiskGeometry) -> Result<Self, Self::Error> {
        match Self::geometry_valid(geom) {
            false => Err(PoolLayerError::PoolInput("geometry not valid")),
            true => Ok(BlockPoolFS {
                geometry: *geom,
                slots: vec![BlockOwner::Free; geom.total_blocks as usize],
                free: geom.total_blocks,
            }),
        }
    }

    fn geometry(&self) -> &DiskGeometry {
        &self.geometry
    }
}

impl BlockSupport for BlockPoolFS {
    fn find_free(&self, n: u64) -> Vec<u64> {
        if n == 0 {
            return Vec::new();
        }
        // Phase 1: first-fit contiguous. Track the current run of free
        // slots and hand it out as soon as it reaches length n.
        let mut run: Vec<u64> = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.is_free() {
                run.push(i as u64);
                if run.len() as u64 == n {
                    return run;
                }
            } else {
                run.clear();
            }
        }

        // Phase 2: fragmented fallback, the first n free slots in index
        // order. May come up short when fewer than n blocks are free.
        let mut found: Vec<u64> = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if found.len() as u64 == n {
                break;
            }
            if slot.is_free() {
                found.push(i as u64);
            }
        }
        found
    }

    fn b_claim(&mut self, i: u64, owner: BlockOwner) -> Result<(), Self::Error> {
        if i >= self.geometry.total_blocks {
            return Err(PoolLayerError::PoolInput("block index out of bounds"));
        }
        if owner.is_free() {
            return Err(PoolLayerError::PoolInput("cannot claim a block as free"));
        }
        if !self.slots[i as usize].is_free() {
            return Err(PoolLayerError::PoolOp(
                "trying to claim a block that is already in use",
            ));
        }
        self.slots[i as usize] = owner;
        self.free -= 1;
        Ok(())
    }

    fn b_release(&mut self, i: u64) -> Result<(), Self::Error> {
        if i >= self.geometry.total_blocks {
            return Err(PoolLayerError::PoolInput("block index out of bounds"));
        }
        if self.slots[i as usize].is_free() {
            return Err(PoolLayerError::PoolOp("trying to release a free block"));
        }
        self.slots[i as usize] = BlockOwner::Free;
        self.free += 1;
        Ok(())
    }

    fn b_owner(&self, i: u64) -> Result<BlockOwner, Self::Error> {
        if i >= self.geometry.total_blocks {
            return Err(PoolLayerError::PoolInput("block index out of bounds"));
        }
        Ok(self.slots[i as usize])
    }

    fn free_count(&self) -> u64 {
        self.free
    }

    fn pool_status(&self) -> PoolStatus {
        PoolStatus {
            total_blocks: self.geometry.total_blocks,
            free_blocks: self.free,
            slots: self.slots.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../api/fs-tests/a_test.rs"]
mod tests;
