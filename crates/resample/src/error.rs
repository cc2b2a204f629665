//! Result and Error types for ctools-resample

use crate::parameters::Axis;

/// Type alias for Result<T, resample::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ctools-resample` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("invalid volume")]
    VolumeError(#[from] ctools_volume::Error),

    #[error("invalid axis boundaries: {0}")]
    InvalidBoundaries(#[from] ctools_utils::Error),

    #[error("voxel spacing must be positive and finite, found {0}")]
    InvalidSpacing(f64),

    #[error("axis lengths must be positive (input {input_length}, output {output_length})")]
    InvalidAxisLength {
        input_length: usize,
        output_length: usize,
    },

    #[error("output cell {cell} overlaps {span} input cells, expected {}..={capacity}", .capacity.saturating_sub(2))]
    UnexpectedSpan {
        cell: usize,
        span: usize,
        capacity: usize,
    },

    #[error("output cell {cell} spans [{lower}, {upper}] outside of input axis [0, {input_length}]")]
    OverlapOutOfBounds {
        cell: usize,
        lower: f64,
        upper: f64,
        input_length: usize,
    },

    #[error("{axis} overlap table planned for {expected} input voxels, volume has {found}")]
    TableLengthMismatch {
        axis: Axis,
        expected: usize,
        found: usize,
    },

    #[error("target spacing leaves no output voxels ({nx}, {ny}, {nz})")]
    EmptyOutput { nx: usize, ny: usize, nz: usize },

    #[error("unable to allocate {voxels} output voxels")]
    AllocationFailure {
        voxels: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("progress bar failure: {0}")]
    ProgressBar(String),
}
