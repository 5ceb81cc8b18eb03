//! Module containing the types used in this project.
//! Everything in here is consumed read-only by presentation layers: the
//! allocator hands out owned copies ([`Inode`] clones, [`PoolStatus`]
//! vectors), never references into its own state.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

lazy_static! {
    /// Width in bytes of a single block pointer as it would be stored inside
    /// an indirect pointer block.
    /// Found out at runtime by serializing a pointer value, which is the
    /// reason why we have to wrap this code in a `lazy_static` macro.
    /// Used to derive the indirect fan-out of a disk geometry.
    pub static ref POINTER_SIZE: u64 = bincode::serialize(&0u32).unwrap().len() as u64;
}

/// Default number of blocks on the modeled disk.
pub const DEFAULT_TOTAL_BLOCKS: u64 = 256;
/// Default block size, in bytes.
pub const DEFAULT_BLOCK_SIZE: u64 = 1024;
/// Default number of direct block pointers per inode.
pub const DEFAULT_DIRECT_PTRS: u64 = 12;

/// Permission string attached to every file record.
pub const FILE_MODE: &str = "rw-r--r--";
/// Owner attached to every file record.
pub const FILE_OWNER: &str = "user";
/// Group attached to every file record.
pub const FILE_GROUP: &str = "group";

/// Fixed parameters of the modeled disk, chosen once at initialization.
///
/// Plays the role a superblock plays in an on-disk file system: every layer
/// caches a copy and derives its bounds from it. The indirect fan-out is not
/// stored but derived, since it is fully determined by `block_size` and the
/// pointer width.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskGeometry {
    /// Total number of blocks on the disk.
    pub total_blocks: u64,
    /// Size of each block, in bytes.
    pub block_size: u64,
    /// Number of data blocks an inode can address without an indirect block.
    pub direct_ptrs: u64,
}

impl Default for DiskGeometry {
    fn default() -> DiskGeometry {
        DiskGeometry {
            total_blocks: DEFAULT_TOTAL_BLOCKS,
            block_size: DEFAULT_BLOCK_SIZE,
            direct_ptrs: DEFAULT_DIRECT_PTRS,
        }
    }
}

impl DiskGeometry {
    /// Number of data blocks addressable through one indirect pointer block,
    /// i.e. how many pointers fit in a single block.
    pub fn fanout(&self) -> u64 {
        self.block_size / *POINTER_SIZE
    }

    /// Largest number of data blocks a single file can have.
    ///
    /// This model deliberately stops at single indirection, so the ceiling is
    /// the direct pointers plus one full indirect block.
    pub fn max_data_blocks(&self) -> u64 {
        self.direct_ptrs + self.fanout()
    }

    /// Largest file size, in bytes, that still fits in a single-indirect inode.
    pub fn max_file_bytes(&self) -> u64 {
        self.max_data_blocks() * self.block_size
    }
}

/// Ownership tag of a single block slot in the pool.
///
/// The owner is a back-reference (the inode number of the owning file), never
/// an ownership transfer: a tagged slot must not outlive the file record it
/// references.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOwner {
    /// The slot is not allocated to any file.
    Free,
    /// The slot holds file data for the inode with the given number.
    Data(u64),
    /// The slot is the single indirect pointer block of the given inode.
    Indirect(u64),
}

impl BlockOwner {
    /// Is this slot free?
    pub fn is_free(&self) -> bool {
        match self {
            BlockOwner::Free => true,
            _ => false,
        }
    }

    /// Inode number of the owning file, if any.
    pub fn inum(&self) -> Option<u64> {
        match *self {
            BlockOwner::Free => None,
            BlockOwner::Data(i) | BlockOwner::Indirect(i) => Some(i),
        }
    }
}

/// Full metadata record of one file, mapping its logical size to a physical
/// block layout.
///
/// The block lists are redundant views over each other and must stay
/// consistent:
/// - `all_blocks` is every block the file occupies, in allocation order;
///   its length is `data_block_count` plus one iff `single_indirect` is set.
/// - `data_blocks` is the data-only prefix of length `data_block_count`.
/// - `direct_blocks` is the first `min(data_block_count, direct_ptrs)` data
///   blocks, `indirect_data_blocks` the rest.
///
/// `double_indirect` and `triple_indirect` are always `None`; the modeled
/// tier stops at single indirection but keeps the fields so inspection views
/// can render the full pointer table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    /// Unique file name, the lookup key.
    pub name: String,
    /// Inode number. Strictly increasing across creations, never reused.
    pub inum: u64,
    /// Logical file size in bytes.
    pub size_bytes: u64,
    /// Number of data blocks, `ceil(size_bytes / block_size)`.
    pub data_block_count: u64,
    /// Every block owned by this file, data blocks first, then the indirect
    /// pointer block if present.
    pub all_blocks: Vec<u64>,
    /// The data blocks only.
    pub data_blocks: Vec<u64>,
    /// Data blocks referenced directly from the inode.
    pub direct_blocks: Vec<u64>,
    /// The indirect pointer block, present iff the file overflows its direct
    /// pointers.
    pub single_indirect: Option<u64>,
    /// Data blocks reached through the indirect pointer block.
    pub indirect_data_blocks: Vec<u64>,
    /// Unsupported tier, always `None`.
    pub double_indirect: Option<u64>,
    /// Unsupported tier, always `None`.
    pub triple_indirect: Option<u64>,
    /// Creation time.
    pub created: SystemTime,
    /// Last modification time.
    pub modified: SystemTime,
    /// Last access time. Lookups do not update this; access bookkeeping is a
    /// presentation concern.
    pub accessed: SystemTime,
    /// Permission string, opaque to the allocator.
    pub mode: String,
    /// Owner, opaque to the allocator.
    pub owner: String,
    /// Group, opaque to the allocator.
    pub group: String,
}

/// One row of a directory listing: name and logical size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// File name.
    pub name: String,
    /// Logical size in bytes.
    pub size_bytes: u64,
}

/// Snapshot of the block pool, for visualization grids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
    /// Total number of blocks.
    pub total_blocks: u64,
    /// Number of free blocks.
    pub free_blocks: u64,
    /// Per-block ownership tag, indexed by block number.
    pub slots: Vec<BlockOwner>,
}

/// Outcome of a defragmentation pass.
///
/// `blocks_moved` is a positional comparison: a block counts as moved when
/// the entry at some index of a file's `all_blocks` differs from the entry at
/// the same index before compaction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefragReport {
    /// Number of live files the pass visited.
    pub files_processed: u64,
    /// Files whose layout changed in at least one position.
    pub files_moved: u64,
    /// Total block positions that changed across all files.
    pub blocks_moved: u64,
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    #[test]
    fn pointer_width_is_four_bytes() {
        // The modeled tier stores pointers as u32; the fan-out math depends on it.
        assert_eq!(*POINTER_SIZE, 4);
    }

    #[test]
    fn default_geometry_matches_the_modeled_disk() {
        let geom = DiskGeometry::default();
        assert_eq!(geom.total_blocks, 256);
        assert_eq!(geom.block_size, 1024);
        assert_eq!(geom.direct_ptrs, 12);
        assert_eq!(geom.fanout(), 256);
        assert_eq!(geom.max_data_blocks(), 268);
        assert_eq!(geom.max_file_bytes(), 268 * 1024);
    }

    #[test]
    fn block_owner_tags() {
        assert!(BlockOwner::Free.is_free());
        assert!(!BlockOwner::Data(3).is_free());
        assert_eq!(BlockOwner::Free.inum(), None);
        assert_eq!(BlockOwner::Data(3).inum(), Some(3));
        assert_eq!(BlockOwner::Indirect(7).inum(), Some(7));
    }
}
