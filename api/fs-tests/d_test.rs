use super::FSName;
use inosim_api::fs::{BlockSupport, DefragSupport, FileSupport, FileSysSupport};
use inosim_api::types::BlockOwner;

#[path = "utils.rs"]
mod utils;

#[test]
fn compact_disk_reports_nothing_moved() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    //Created in name order on an empty disk, so already contiguous by file
    fs.create("a", 2000).unwrap();
    fs.create("b", 1000).unwrap();
    fs.create("c", 3000).unwrap();

    let report = fs.defragment();
    assert_eq!(report.files_processed, 3);
    assert_eq!(report.files_moved, 0);
    assert_eq!(report.blocks_moved, 0);
    utils::assert_accounting(&fs);
}

#[test]
fn compaction_closes_the_gap() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    fs.create("A", 2000).unwrap(); //blocks 0-1
    fs.create("B", 1000).unwrap(); //block 2
    fs.create("C", 3000).unwrap(); //blocks 3-5

    fs.delete("B").unwrap();
    assert_eq!(fs.free_count(), 251);

    let report = fs.defragment();

    //A keeps its place, C slides down into the gap
    assert_eq!(fs.get("A").unwrap().all_blocks, vec![0, 1]);
    assert_eq!(fs.get("C").unwrap().all_blocks, vec![2, 3, 4]);
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_moved, 1);
    assert_eq!(report.blocks_moved, 3);

    //The free region is exactly the contiguous tail
    for i in 0..5 {
        assert!(!fs.b_owner(i).unwrap().is_free());
    }
    for i in 5..256 {
        assert_eq!(fs.b_owner(i).unwrap(), BlockOwner::Free);
    }
    utils::assert_accounting(&fs);
}

#[test]
fn replay_order_is_lexicographic() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    //Creation order deliberately differs from name order
    fs.create("zebra", 2000).unwrap(); //blocks 0-1
    fs.create("apple", 1000).unwrap(); //block 2
    fs.create("mango", 1000).unwrap(); //block 3

    let report = fs.defragment();

    assert_eq!(fs.get("apple").unwrap().all_blocks, vec![0]);
    assert_eq!(fs.get("mango").unwrap().all_blocks, vec![1]);
    assert_eq!(fs.get("zebra").unwrap().all_blocks, vec![2, 3]);
    assert_eq!(report.files_moved, 3);
    //apple 1 + mango 1 + zebra 2 positions changed
    assert_eq!(report.blocks_moved, 4);
}

#[test]
fn indirect_layout_is_rederived_at_new_positions() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    fs.create("pad", 2 * 1024).unwrap(); //blocks 0-1
    fs.create("big", 13 * 1024).unwrap(); //blocks 2-15
    fs.delete("pad").unwrap();

    let before = fs.get("big").unwrap();
    let report = fs.defragment();
    let after = fs.get("big").unwrap();

    //Size-derived quantities are unchanged by compaction
    assert_eq!(after.size_bytes, before.size_bytes);
    assert_eq!(after.data_block_count, before.data_block_count);
    assert_eq!(after.inum, before.inum);

    //The run now starts at 0 and the partition follows it
    assert_eq!(after.all_blocks, (0..14).collect::<Vec<u64>>());
    assert_eq!(after.direct_blocks, (0..12).collect::<Vec<u64>>());
    assert_eq!(after.single_indirect, Some(13));
    assert_eq!(after.indirect_data_blocks, vec![12]);
    assert_eq!(fs.b_owner(13).unwrap(), BlockOwner::Indirect(after.inum));

    assert_eq!(report.files_moved, 1);
    assert_eq!(report.blocks_moved, 14);
    utils::assert_accounting(&fs);
    utils::assert_ownership(&fs, "big");
}

#[test]
fn scattered_file_becomes_contiguous() {
    let mut fs = FSName::init(&utils::tiny_geom(8)).unwrap();
    fs.create("a", 2 * 1024).unwrap(); //blocks 0-1
    fs.create("b", 1024).unwrap(); //block 2
    fs.create("c", 2 * 1024).unwrap(); //blocks 3-4
    fs.delete("a").unwrap();
    //Free {0, 1, 5, 6, 7}: no run of 5, so "wide" scatters
    let wide = fs.create("wide", 5 * 1024).unwrap();
    assert_eq!(wide.all_blocks, vec![0, 1, 5, 6, 7]);

    fs.defragment();

    //Name order: b, c, wide
    assert_eq!(fs.get("b").unwrap().all_blocks, vec![0]);
    assert_eq!(fs.get("c").unwrap().all_blocks, vec![1, 2]);
    assert_eq!(fs.get("wide").unwrap().all_blocks, vec![3, 4, 5, 6, 7]);
    assert_eq!(fs.free_count(), 0);
    utils::assert_accounting(&fs);
    utils::assert_ownership(&fs, "b");
    utils::assert_ownership(&fs, "wide");
}

#[test]
fn empty_disk_compacts_to_nothing() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    let report = fs.defragment();
    assert_eq!(report.files_processed, 0);
    assert_eq!(report.files_moved, 0);
    assert_eq!(report.blocks_moved, 0);
    assert_eq!(fs.free_count(), 256);
}

#[test]
fn compaction_is_idempotent() {
    let mut fs = FSName::init(&utils::default_geom()).unwrap();
    fs.create("x", 4000).unwrap();
    fs.create("m", 2000).unwrap();
    fs.delete("x").unwrap();
    fs.create("y", 3000).unwrap();

    let first = fs.defragment();
    assert!(first.blocks_moved > 0);

    let second = fs.defragment();
    assert_eq!(second.files_moved, 0);
    assert_eq!(second.blocks_moved, 0);
}
