//! Utility functions and data structures.
//!
//! - [`app_data`] - Configuration file and application data directory
//! - [`encoding`] - Varint and little-endian primitives for the cache artifact
//! - [`progress`] - Progress bars that compile away without the `progress` feature

pub mod app_data;
pub mod encoding;
pub mod progress;

pub use app_data::*;
pub use encoding::*;
