//! Common utilities for tldat.
//!
//! This crate provides the foundational types used across the tldat crates:
//!
//! - [`BinaryReader`] - Zero-copy, endian-aware binary reading from byte slices
//! - [`HeaderMode`] - Width and byte-order configuration for archive decoding

mod error;
mod mode;
mod reader;

pub use error::{Error, Result};
pub use mode::{Endian, HeaderMode, Width};
pub use reader::BinaryReader;
