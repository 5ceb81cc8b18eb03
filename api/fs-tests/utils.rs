#![allow(dead_code)]

//Some more general testing utilities
use inosim_api::fs::{BlockSupport, FileSupport, FileSysSupport};
use inosim_api::types::DiskGeometry;

//The geometry of the modeled demo disk: 256 blocks of 1KB, 12 direct pointers
pub fn default_geom() -> DiskGeometry {
    DiskGeometry::default()
}

//A small disk so exhaustion scenarios stay readable
pub fn tiny_geom(total_blocks: u64) -> DiskGeometry {
    DiskGeometry {
        total_blocks,
        ..DiskGeometry::default()
    }
}

//The accounting invariant: free slots plus every live file's blocks
//partition the disk exactly
pub fn assert_accounting<FS: FileSupport>(fs: &FS) {
    let mut owned = 0;
    for summary in fs.list() {
        let inode = fs.get(&summary.name).unwrap();
        owned += inode.all_blocks.len() as u64;
    }
    assert_eq!(
        fs.free_count() + owned,
        fs.geometry().total_blocks,
        "free count and live block lists no longer partition the disk"
    );
}

//Bidirectional consistency: every block a file lists is tagged with that
//file's inode number in the pool
pub fn assert_ownership<FS: FileSupport>(fs: &FS, name: &str) {
    let inode = fs.get(name).unwrap();
    for &b in &inode.all_blocks {
        assert_eq!(
            fs.b_owner(b).unwrap().inum(),
            Some(inode.inum),
            "block {} is not tagged for '{}'",
            b,
            name
        );
    }
}
