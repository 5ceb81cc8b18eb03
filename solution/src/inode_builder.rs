//! Pure layout computation: translating a byte size into a direct/indirect
//! block partition.
//!
//! Nothing in here touches pool or file table state. The file table calls
//! [`partition`] on freshly found blocks at creation time, and the
//! defragmenter calls it again on each file's new contiguous run, so both
//! paths derive their layouts from the same rule.

use inosim_api::error::FsError;
use inosim_api::types::DiskGeometry;

/// The physical partition of one file's allocated blocks.
///
/// These are exactly the layout fields of an inode record; the caller
/// supplies name, inode number and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeLayout {
    /// Number of data blocks, `ceil(size_bytes / block_size)`.
    pub data_block_count: u64,
    /// Every allocated block, in the order given.
    pub all_blocks: Vec<u64>,
    /// The data blocks: the first `data_block_count` entries.
    pub data_blocks: Vec<u64>,
    /// The first `min(data_block_count, direct_ptrs)` data blocks.
    pub direct_blocks: Vec<u64>,
    /// The pointer block, the entry right after the data region.
    /// Present iff the file overflows its direct pointers.
    pub single_indirect: Option<u64>,
    /// The data blocks from index `direct_ptrs` onward.
    pub indirect_data_blocks: Vec<u64>,
}

// Not the (a + b - 1) / b form: that wraps when a is within b of u64::MAX,
// and sizes are caller-supplied.
fn div_ceil(a: u64, b: u64) -> u64 {
    a / b + if a % b == 0 { 0 } else { 1 }
}

/// Number of data blocks a file of `size_bytes` bytes occupies.
pub fn data_block_count(geom: &DiskGeometry, size_bytes: u64) -> u64 {
    div_ceil(size_bytes, geom.block_size)
}

/// Number of indirect pointer blocks the raw fan-out formula asks for.
///
/// Under the single-indirect ceiling enforced by [`required_block_count`]
/// this is always 0 or 1; the formula is kept in its general form because it
/// is what a multi-level tier would start from.
pub fn indirect_blocks_needed(geom: &DiskGeometry, data_blocks: u64) -> u64 {
    if data_blocks <= geom.direct_ptrs {
        0
    } else {
        div_ceil(data_blocks - geom.direct_ptrs, geom.fanout())
    }
}

/// Total number of blocks a file of `size_bytes` bytes needs, data blocks
/// plus the indirect pointer block if the size calls for one.
///
/// Errors with `FileTooLarge` when the file would need more data blocks than
/// direct pointers plus one full indirect block can address; the modeled tier
/// supports exactly one indirect pointer block, so sizes beyond that ceiling
/// are rejected outright instead of silently mislaid.
pub fn required_block_count(geom: &DiskGeometry, size_bytes: u64) -> Result<u64, FsError> {
    let data_blocks = data_block_count(geom, size_bytes);
    if data_blocks > geom.max_data_blocks() {
        return Err(FsError::FileTooLarge {
            max_bytes: geom.max_file_bytes(),
        });
    }
    Ok(data_blocks + indirect_blocks_needed(geom, data_blocks))
}

/// Partition an ordered list of freshly allocated blocks into the layout of a
/// file of `size_bytes` bytes. Order is preserved as given.
///
/// The list's length must equal `required_block_count(size_bytes)`; a
/// mismatch signals an allocator shortfall upstream and is propagated, never
/// swallowed.
pub fn partition(
    geom: &DiskGeometry,
    size_bytes: u64,
    allocated: &[u64],
) -> Result<InodeLayout, FsError> {
    let required = required_block_count(geom, size_bytes)?;
    if allocated.len() as u64 != required {
        return Err(FsError::AllocationShortfall {
            needed: required,
            found: allocated.len() as u64,
        });
    }

    let dc = data_block_count(geom, size_bytes) as usize;
    let direct_ptrs = geom.direct_ptrs as usize;

    let data_blocks = allocated[..dc].to_vec();
    let direct_blocks = data_blocks[..dc.min(direct_ptrs)].to_vec();
    let (single_indirect, indirect_data_blocks) = if dc > direct_ptrs {
        // The pointer block sits right after the data region in the
        // allocated list; it points at the data blocks past the direct set.
        (Some(allocated[dc]), data_blocks[direct_ptrs..].to_vec())
    } else {
        (None, Vec::new())
    };

    Ok(InodeLayout {
        data_block_count: dc as u64,
        all_blocks: allocated.to_vec(),
        data_blocks,
        direct_blocks,
        single_indirect,
        indirect_data_blocks,
    })
}

#[cfg(test)]
#[path = "../../api/fs-tests/b_test.rs"]
mod tests;
