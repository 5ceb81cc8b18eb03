//! Shared surface of the block allocation model.
//!
//! This crate holds the data types handed across the API boundary, the error
//! vocabulary, and the trait seams the solution layers implement. It contains
//! no allocator logic of its own.
//!
//! The `fs-tests` directory next to `src` holds the integration tests for the
//! solution layers; each layer module in the solution crate pulls in its test
//! file with a `#[path]` module declaration, so the tests live with the API
//! they exercise.

#![deny(missing_docs)]

pub mod error;

//Basic modules for types
pub mod types;

//Traits the solution layers implement
pub mod fs;
