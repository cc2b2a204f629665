//! Module for working with regularly spaced CT voxel volumes
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod header;
mod reader;
mod volume;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use volume::{Dimensions, Spacing, Volume};

#[doc(inline)]
pub use header::Header;

#[doc(inline)]
pub use reader::{read_volume, read_volume_file};

#[doc(inline)]
pub use writer::{write_ascii_pretty, write_json, write_volume, write_volume_file};

#[doc(inline)]
pub use error::{Error, Result};
