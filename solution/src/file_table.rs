//! The file table layer.
//!
//! Wraps the block pool and adds named files: [`FileSupport`] on top of
//! delegated [`FileSysSupport`] and [`BlockSupport`]. Each create partitions
//! freshly found blocks through the inode builder, claims them in the pool,
//! and registers the record under its unique name; inode numbers increase
//! monotonically and are never reused, even after deletion.
//!
//! [`FileSysSupport`]: ../../inosim_api/fs/trait.FileSysSupport.html
//! [`BlockSupport`]: ../../inosim_api/fs/trait.BlockSupport.html
//! [`FileSupport`]: ../../inosim_api/fs/trait.FileSupport.html

use std::collections::BTreeMap;
use std::time::SystemTime;

use inosim_api::error::FsError;
use inosim_api::fs::{BlockSupport, FileSupport, FileSysSupport};
use inosim_api::types::{
    BlockOwner, DiskGeometry, FileSummary, Inode, PoolStatus, FILE_GROUP, FILE_MODE, FILE_OWNER,
};
use log::debug;

use super::block_pool::BlockPoolFS;
use super::error_fs::FileLayerError;
use super::inode_builder;

/// Name of the file system type this layer exposes.
pub type FSName = FileTableFS;

/// Struct representing a file system with file table support.
///
/// Files are keyed by name in a `BTreeMap`, so listing and defragmentation
/// get lexicographic order for free.
#[derive(Debug, Clone)]
pub struct FileTableFS {
    pool: BlockPoolFS,
    files: BTreeMap<String, Inode>,
    next_inum: u64,
}

/// Functions specific to FileTableFS
impl FileTableFS {
    /// Split borrows for the defragmentation layer, which rewrites the pool
    /// and the inode records in lockstep.
    pub(crate) fn parts_mut(&mut self) -> (&mut BlockPoolFS, &mut BTreeMap<String, Inode>) {
        (&mut self.pool, &mut self.files)
    }
}

impl FileSysSupport for FileTableFS {
    type Error = FileLayerError;

    fn geometry_valid(geom: &DiskGeometry) -> bool {
        BlockPoolFS::geometry_valid(geom)
    }

    fn init(geom: &DiskGeometry) -> Result<Self, Self::Error> {
        let pool = BlockPoolFS::init(geom)?;
        Ok(FileTableFS {
            pool,
            files: BTreeMap::new(),
            next_inum: 1,
        })
    }

    fn geometry(&self) -> &DiskGeometry {
        self.pool.geometry()
    }
}

impl BlockSupport for FileTableFS {
    fn find_free(&self, n: u64) -> Vec<u64> {
        self.pool.find_free(n)
    }

    fn b_claim(&mut self, i: u64, owner: BlockOwner) -> Result<(), Self::Error> {
        Ok(self.pool.b_claim(i, owner)?)
    }

    fn b_release(&mut self, i: u64) -> Result<(), Self::Error> {
        Ok(self.pool.b_release(i)?)
    }

    fn b_owner(&self, i: u64) -> Result<BlockOwner, Self::Error> {
        Ok(self.pool.b_owner(i)?)
    }

    fn free_count(&self) -> u64 {
        self.pool.free_count()
    }

    fn pool_status(&self) -> PoolStatus {
        self.pool.pool_status()
    }
}

impl FileSupport for FileTableFS {
    fn create(&mut self, name: &str, size_bytes: u64) -> Result<Inode, Self::Error> {
        if name.is_empty() {
            return Err(FsError::InvalidInput("filename must not be empty").into());
        }
        if size_bytes == 0 {
            return Err(FsError::InvalidInput("file size must be positive").into());
        }
        if self.files.contains_key(name) {
            return Err(FsError::DuplicateName(name.to_string()).into());
        }

        let geom = *self.pool.geometry();
        let required = inode_builder::required_block_count(&geom, size_bytes)
            .map_err(FileLayerError::from)?;
        let available = self.pool.free_count();
        if required > available {
            return Err(FsError::InsufficientSpace {
                needed: required,
                available,
            }
            .into());
        }

        let found = self.pool.find_free(required);
        if (found.len() as u64) < required {
            // The free-count check above should have caught this; a short
            // return here is a pool defect, not a full disk.
            return Err(FsError::AllocationShortfall {
                needed: required,
                found: found.len() as u64,
            }
            .into());
        }

        let layout =
            inode_builder::partition(&geom, size_bytes, &found).map_err(FileLayerError::from)?;

        // Everything fallible is behind us: claim the blocks and register
        // the record. The inode number is consumed only on this path.
        let inum = self.next_inum;
        self.next_inum += 1;
        for &b in &layout.data_blocks {
            self.pool.b_claim(b, BlockOwner::Data(inum))?;
        }
        if let Some(ind) = layout.single_indirect {
            self.pool.b_claim(ind, BlockOwner::Indirect(inum))?;
        }

        let now = SystemTime::now();
        let inode = Inode {
            name: name.to_string(),
            inum,
            size_bytes,
            data_block_count: layout.data_block_count,
            all_blocks: layout.all_blocks,
            data_blocks: layout.data_blocks,
            direct_blocks: layout.direct_blocks,
            single_indirect: layout.single_indirect,
            indirect_data_blocks: layout.indirect_data_blocks,
            double_indirect: None,
            triple_indirect: None,
            created: now,
            modified: now,
            accessed: now,
            mode: FILE_MODE.to_string(),
            owner: FILE_OWNER.to_string(),
            group: FILE_GROUP.to_string(),
        };
        debug!(
            "created '{}' as inode {}: {} bytes over {} blocks",
            name,
            inum,
            size_bytes,
            inode.all_blocks.len()
        );
        self.files.insert(name.to_string(), inode.clone());
        Ok(inode)
    }

    fn delete(&mut self, name: &str) -> Result<(), Self::Error> {
        let blocks = match self.files.get(name) {
            Some(inode) => inode.all_blocks.clone(),
            None => return Err(FsError::FileNotFound(name.to_string()).into()),
        };
        // Release the pool side first, then drop the record; both sides of
        // the back-reference are cleared within this one call.
        for b in blocks {
            self.pool.b_release(b)?;
        }
        self.files.remove(name);
        debug!("deleted '{}'", name);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<Inode> {
        self.files.get(name).cloned()
    }

    fn list(&self) -> Vec<FileSummary> {
        self.files
            .values()
            .map(|inode| FileSummary {
                name: inode.name.clone(),
                size_bytes: inode.size_bytes,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../api/fs-tests/c_test.rs"]
mod tests;
