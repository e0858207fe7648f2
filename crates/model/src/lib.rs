//! An abstraction layer for different text generation backends.
//!
//! This crate establishes an unified protocol for callers to generate
//! text from various hosted LLMs, so that they can switch between
//! backends without modifying the calling code.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;

pub use error::*;
pub use provider::*;
