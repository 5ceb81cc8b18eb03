//! Collection of the traits the filesystem layers implement.
//!
//! The layers stack: `FileSysSupport` is the supertrait of everything,
//! `BlockSupport` adds the block pool, `FileSupport` adds the file table on
//! top of that, and `DefragSupport` adds compaction on top of the file table.
//! A layer struct typically wraps the previous layer's struct and delegates
//! the inherited traits to it, so each file in the solution crate only has to
//! implement what its layer adds.

use super::types::{BlockOwner, DefragReport, DiskGeometry, FileSummary, Inode, PoolStatus};
use std::error;

/// General trait every filesystem layer implements; sets up fresh state and
/// defines the error type used by all the other traits.
pub trait FileSysSupport: Sized {
    /// The error type of this implementation.
    type Error: error::Error;

    /// Static method to check whether a geometry describes a disk this layer
    /// can model: no zero dimensions, and blocks wide enough to hold at least
    /// one pointer, so the indirect fan-out is at least one.
    fn geometry_valid(geom: &DiskGeometry) -> bool;

    /// Create a fresh, empty filesystem for the given geometry.
    /// All blocks start free and no files exist.
    fn init(geom: &DiskGeometry) -> Result<Self, Self::Error>;

    /// The geometry this filesystem was initialized with.
    fn geometry(&self) -> &DiskGeometry;
}

/// This trait adds the block pool: the ground truth of which blocks are free
/// and which are owned, and by whom.
pub trait BlockSupport: FileSysSupport {
    /// Find up to `n` free blocks using the two-phase policy:
    /// first the lowest run of `n` consecutive free blocks (first-fit
    /// contiguous), otherwise the first `n` free blocks in index order
    /// regardless of adjacency.
    ///
    /// This is a pure scan; no block is marked owned. The returned list is
    /// shorter than `n` when fewer than `n` blocks are free in total, and
    /// callers must treat a short return as allocation failure.
    fn find_free(&self, n: u64) -> Vec<u64>;

    /// Mark block `i` as owned with the given tag.
    /// Errors if `i` is out of bounds, if the slot is already owned, or if
    /// the tag is `Free` (releasing goes through `b_release`).
    fn b_claim(&mut self, i: u64, owner: BlockOwner) -> Result<(), Self::Error>;

    /// Mark block `i` free again.
    /// If block `i` is already free, the state of the pool does not change
    /// and this method returns an error; same for an out-of-bounds index.
    fn b_release(&mut self, i: u64) -> Result<(), Self::Error>;

    /// Ownership tag of block `i`. Errors on an out-of-bounds index.
    fn b_owner(&self, i: u64) -> Result<BlockOwner, Self::Error>;

    /// Number of free blocks. `total_blocks - free_count()` blocks are in use.
    fn free_count(&self) -> u64;

    /// Snapshot of the whole pool, for visualization grids.
    fn pool_status(&self) -> PoolStatus;
}

/// This trait adds the file table: named files with inode records, allocated
/// out of the block pool.
pub trait FileSupport: BlockSupport {
    /// Create a file of `size_bytes` bytes named `name` and return a copy of
    /// its inode record.
    ///
    /// Creation is all-or-nothing: on any error no block is claimed, no inode
    /// number is consumed and the file table is unchanged. Errors on an empty
    /// name, a zero size, a duplicate name, a size beyond the single-indirect
    /// ceiling, or insufficient free space.
    fn create(&mut self, name: &str, size_bytes: u64) -> Result<Inode, Self::Error>;

    /// Delete the file named `name`, returning all of its blocks (data and
    /// indirect) to the pool. Errors if no such file exists.
    fn delete(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Copy of the inode record for `name`, if the file exists.
    /// Read-only; does not touch the access timestamp.
    fn get(&self, name: &str) -> Option<Inode>;

    /// Name and size of every live file, ordered by name.
    fn list(&self) -> Vec<FileSummary>;
}

/// This trait adds defragmentation on top of the file table.
pub trait DefragSupport: FileSupport {
    /// Rewrite every file's block layout into a contiguous-by-file
    /// arrangement.
    ///
    /// Files are laid out in lexicographic name order starting at block 0,
    /// each occupying one contiguous run; the direct/indirect partition of
    /// each inode is re-derived at the new positions. Sizes and inode numbers
    /// do not change. Afterwards the free region is exactly the contiguous
    /// tail of the disk.
    ///
    /// Compaction replays the same files into the same geometry, so it cannot
    /// run out of space and is infallible.
    fn defragment(&mut self) -> DefragReport;
}
