//! Result and Error types for ctools-dicom

use std::path::PathBuf;

/// Type alias for Result<T, dicom::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ctools-dicom` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("invalid volume")]
    VolumeError(#[from] ctools_volume::Error),

    #[error("no .dcm files found in {}", .0.display())]
    NoDicomFiles(PathBuf),

    #[error("unable to read {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("{} has no usable {attribute} attribute", .path.display())]
    MissingAttribute {
        path: PathBuf,
        attribute: &'static str,
    },

    #[error("{} is {found:?} pixels (columns, rows), series is {expected:?}", .path.display())]
    InconsistentSlice {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{} decoded to {found} pixels, expected {expected}", .path.display())]
    UnexpectedPixelCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}
