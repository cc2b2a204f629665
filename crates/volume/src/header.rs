// crate modules
use crate::error::{Error, Result};
use crate::volume::{Dimensions, Spacing, Volume};

// external crates
use serde::{Deserialize, Serialize};

/// Fixed binary header at the start of every img file
///
/// Three signed 32-bit voxel counts followed by three 32-bit float voxel
/// sizes in mm. There is no magic number, version, or padding.
///
/// ```text
/// <nx> <ny> <nz> <dx> <dy> <dz>
/// ```
///
/// The header is immediately followed by `nx*ny*nz` signed 16-bit samples.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Header {
    /// Number of voxels in x
    pub nx: i32,
    /// Number of voxels in y
    pub ny: i32,
    /// Number of voxels in z
    pub nz: i32,
    /// Voxel size in x (mm)
    pub dx: f32,
    /// Voxel size in y (mm)
    pub dy: f32,
    /// Voxel size in z (mm)
    pub dz: f32,
}

impl Header {
    /// Size of the serialised header in bytes
    pub const BYTE_LENGTH: usize = 3 * std::mem::size_of::<i32>() + 3 * std::mem::size_of::<f32>();

    /// Validated dimensions described by the header
    pub fn dimensions(&self) -> Result<Dimensions> {
        let invalid = || Error::InvalidDimensions {
            nx: self.nx as i64,
            ny: self.ny as i64,
            nz: self.nz as i64,
        };

        let nx = usize::try_from(self.nx).map_err(|_| invalid())?;
        let ny = usize::try_from(self.ny).map_err(|_| invalid())?;
        let nz = usize::try_from(self.nz).map_err(|_| invalid())?;
        Dimensions::new(nx, ny, nz)
    }

    /// Validated voxel spacing described by the header
    pub fn spacing(&self) -> Result<Spacing> {
        Spacing::new(self.dx, self.dy, self.dz)
    }
}

impl TryFrom<&Volume> for Header {
    type Error = Error;

    fn try_from(volume: &Volume) -> Result<Self> {
        let Dimensions { nx, ny, nz } = volume.dimensions();
        let invalid = || Error::InvalidDimensions {
            nx: nx as i64,
            ny: ny as i64,
            nz: nz as i64,
        };

        let spacing = volume.spacing();
        Ok(Self {
            nx: i32::try_from(nx).map_err(|_| invalid())?,
            ny: i32::try_from(ny).map_err(|_| invalid())?,
            nz: i32::try_from(nz).map_err(|_| invalid())?,
            dx: spacing.dx,
            dy: spacing.dy,
            dz: spacing.dz,
        })
    }
}
