use super::FSName;
use inosim_api::fs::{BlockSupport, FileSysSupport};
use inosim_api::types::{BlockOwner, DiskGeometry, POINTER_SIZE};

#[path = "utils.rs"]
mod utils;

#[test]
fn init() {
    let geom = utils::tiny_geom(8);
    let pool = FSName::init(&geom).unwrap();

    assert_eq!(pool.geometry(), &geom);
    assert_eq!(pool.free_count(), 8);
    for i in 0..8 {
        assert_eq!(pool.b_owner(i).unwrap(), BlockOwner::Free);
    }
    assert!(pool.b_owner(8).is_err());
}

#[test]
fn rejects_bad_geometry() {
    assert!(!FSName::geometry_valid(&utils::tiny_geom(0)));
    assert!(!FSName::geometry_valid(&DiskGeometry {
        direct_ptrs: 0,
        ..DiskGeometry::default()
    }));
    //A block narrower than one pointer has no indirect fan-out at all
    assert!(!FSName::geometry_valid(&DiskGeometry {
        block_size: *POINTER_SIZE - 1,
        ..DiskGeometry::default()
    }));
    assert!(FSName::init(&utils::tiny_geom(0)).is_err());
}

#[test]
fn claim_release() {
    let geom = utils::tiny_geom(8);
    let mut pool = FSName::init(&geom).unwrap();

    pool.b_claim(3, BlockOwner::Data(1)).unwrap();
    pool.b_claim(4, BlockOwner::Indirect(1)).unwrap();
    assert_eq!(pool.free_count(), 6);
    assert_eq!(pool.b_owner(3).unwrap(), BlockOwner::Data(1));
    assert_eq!(pool.b_owner(4).unwrap(), BlockOwner::Indirect(1));

    //Claiming an owned slot, claiming as free, or going out of bounds
    assert!(pool.b_claim(3, BlockOwner::Data(2)).is_err());
    assert!(pool.b_claim(0, BlockOwner::Free).is_err());
    assert!(pool.b_claim(8, BlockOwner::Data(1)).is_err());
    assert_eq!(pool.free_count(), 6); //nothing above changed the pool

    pool.b_release(3).unwrap();
    assert_eq!(pool.b_owner(3).unwrap(), BlockOwner::Free);
    assert_eq!(pool.free_count(), 7);

    //Releasing a free block errors and changes nothing
    assert!(pool.b_release(3).is_err());
    assert!(pool.b_release(8).is_err());
    assert_eq!(pool.free_count(), 7);
}

#[test]
fn contiguous_first_fit() {
    let geom = utils::tiny_geom(8);
    let mut pool = FSName::init(&geom).unwrap();

    //Free slots: {0, 1, 5, 6, 7}
    for i in 2..5 {
        pool.b_claim(i, BlockOwner::Data(1)).unwrap();
    }

    //A run of 3 exists past the gap; never {0, 1, 5}
    assert_eq!(pool.find_free(3), vec![5, 6, 7]);
    //The lowest sufficient run wins even when a later one exists too
    assert_eq!(pool.find_free(2), vec![0, 1]);
    assert_eq!(pool.find_free(1), vec![0]);
}

#[test]
fn fragmented_fallback() {
    let geom = utils::tiny_geom(8);
    let mut pool = FSName::init(&geom).unwrap();
    for i in 2..5 {
        pool.b_claim(i, BlockOwner::Data(1)).unwrap();
    }

    //No run of 4 exists, so the first 4 free slots in index order are used
    assert_eq!(pool.find_free(4), vec![0, 1, 5, 6]);
    //More than the pool holds: a short return, not an error
    assert_eq!(pool.find_free(6), vec![0, 1, 5, 6, 7]);
    assert_eq!(pool.find_free(0), Vec::<u64>::new());
}

#[test]
fn find_free_does_not_allocate() {
    let geom = utils::tiny_geom(8);
    let pool = FSName::init(&geom).unwrap();

    assert_eq!(pool.find_free(3), vec![0, 1, 2]);
    assert_eq!(pool.find_free(3), vec![0, 1, 2]); //still free: pure scan
    assert_eq!(pool.free_count(), 8);
}

#[test]
fn status_snapshot() {
    let geom = utils::tiny_geom(4);
    let mut pool = FSName::init(&geom).unwrap();
    pool.b_claim(1, BlockOwner::Data(7)).unwrap();
    pool.b_claim(2, BlockOwner::Indirect(7)).unwrap();

    let status = pool.pool_status();
    assert_eq!(status.total_blocks, 4);
    assert_eq!(status.free_blocks, 2);
    assert_eq!(
        status.slots,
        vec![
            BlockOwner::Free,
            BlockOwner::Data(7),
            BlockOwner::Indirect(7),
            BlockOwner::Free,
        ]
    );
}
