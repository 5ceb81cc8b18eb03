//! In-memory model of a block-based storage volume with inode-style indirect
//! addressing.
//!
//! The implementation is layered, lowest first:
//!
//! 1. [`block_pool`]: fixed-capacity pool of block ownership slots.
//! 2. [`inode_builder`]: pure translation of a byte size and an allocated
//!    block list into a direct/indirect partition.
//! 3. [`file_table`]: named files with monotonically assigned inode numbers.
//! 4. [`defrag`]: deterministic compaction that replays every file
//!    contiguously in name order.
//!
//! Each layer wraps the previous one and delegates the traits it inherits,
//! so the full system is the outermost type, [`defrag::DefragFS`]. The
//! [`adapter`] module puts a command front on top of it and owns all display
//! formatting; nothing in the core formats anything for a screen.
//!
//! The whole model is single-threaded and synchronous: every operation is
//! one atomic step on exclusively owned state, and every failure is returned
//! as a value with the state left unchanged.

#![deny(missing_docs)]

pub mod block_pool;
pub mod inode_builder;
pub mod file_table;
pub mod defrag;

pub mod adapter;
pub mod error_fs;
