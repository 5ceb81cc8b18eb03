//! Error types of the solution layers, one enum per layer.
//! Each layer's enum wraps the layer below it with `#[from]`, so delegated
//! calls convert with the `?` operator.

use inosim_api::error::FsError;
use thiserror::Error;

/// Errors of the block pool layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolLayerError {
    /// Invalid input to the pool layer (bad geometry, index out of bounds).
    #[error("Invalid pool input: {0}")]
    PoolInput(&'static str),
    /// A pool operation hit an inconsistent request, like releasing a block
    /// that is already free.
    #[error("Pool operation failed: {0}")]
    PoolOp(&'static str),
}

/// Errors of the file table layer (also used by the defragmentation layer,
/// which adds no failure modes of its own).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileLayerError {
    /// A user-facing allocation or lookup failure.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// An error bubbled up from the block pool layer.
    #[error("Pool layer error: {0}")]
    Pool(#[from] PoolLayerError),
}
