//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, tolerant float comparisons and checks on boundary arrays are
//! needed by both the volume model and the resampling engine.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod error;
mod float_ext;
mod slice_ext;

// Flatten
pub use error::{Error, Result};
pub use float_ext::FloatExt;
pub use slice_ext::SliceExt;
