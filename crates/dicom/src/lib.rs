//! Module for importing DICOM CT series as voxel volumes
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod series;

// Inline anything important for a nice public API
#[doc(inline)]
pub use series::read_dicom_dir;

#[doc(inline)]
pub use error::{Error, Result};
