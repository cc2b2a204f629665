//! Conservative box-filter resampling of CT voxel volumes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod overlap;
mod parameters;
mod resampler;

// inline the important parts for a nice public API
#[doc(inline)]
pub use overlap::{AxisOverlap, Overlap};

#[doc(inline)]
pub use parameters::{output_length, Axis, ResampleParameters};

#[doc(inline)]
pub use resampler::{resample_volume, to_sample, Resampler};

#[doc(inline)]
pub use error::{Error, Result};
