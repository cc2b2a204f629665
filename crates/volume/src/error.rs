//! Result and Error types for the volume module

/// Type alias for `Result<T, volume::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `ctools-volume`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to serialise or deserialise the binary header
    #[error("failed to (de)serialise byte stream")]
    UnableToDeserialise(#[from] Box<bincode::ErrorKind>),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Unexpected length of bytes based on file content
    #[error("unexpected byte length (expected {expected:?}, found {found:?})")]
    UnexpectedByteLength { expected: usize, found: usize },

    /// Every axis needs at least one voxel and the total must be addressable
    #[error("invalid volume dimensions ({nx}, {ny}, {nz})")]
    InvalidDimensions { nx: i64, ny: i64, nz: i64 },

    /// Voxel sizes must be positive and finite
    #[error("invalid voxel spacing ({dx}, {dy}, {dz}) mm")]
    InvalidSpacing { dx: f32, dy: f32, dz: f32 },

    /// Sample buffer does not match the dimensions
    #[error("unexpected number of samples (expected {expected:?}, found {found:?})")]
    UnexpectedSampleCount { expected: usize, found: usize },
}
