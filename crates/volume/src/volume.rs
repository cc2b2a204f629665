// ctools modules
use ctools_utils::f;

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Representation of a regularly spaced CT volume
///
/// Samples are signed 16-bit intensities (typically Hounsfield units) stored
/// contiguously with x varying fastest, then y, then z.
///
/// ```text
/// offset = iz * nx * ny + iy * nx + ix
/// ```
///
/// The dimensions, spacing, and sample count are validated once when the
/// volume is constructed, so every 3D index within [Dimensions] is known to
/// map onto a real sample afterwards.
///
/// ```rust
/// # use ctools_volume::{Dimensions, Spacing, Volume};
/// let dimensions = Dimensions::new(4, 3, 2).unwrap();
/// let spacing = Spacing::new(0.5, 0.5, 2.0).unwrap();
///
/// // Build a volume with a value derived from the coordinates
/// let volume = Volume::from_fn(dimensions, spacing, |ix, iy, iz| {
///     (ix + 10 * iy + 100 * iz) as i16
/// })
/// .unwrap();
///
/// assert_eq!(volume[(3, 2, 1)], 123);
/// assert_eq!(volume.get(4, 0, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Volume {
    dimensions: Dimensions,
    spacing: Spacing,
    samples: Vec<i16>,
}

impl Volume {
    /// Build a volume from an existing sample buffer
    ///
    /// Fails if the dimensions or spacing are invalid, or if the number of
    /// samples does not match `nx*ny*nz`.
    pub fn new(dimensions: Dimensions, spacing: Spacing, samples: Vec<i16>) -> Result<Self> {
        dimensions.validate()?;
        spacing.validate()?;

        let expected = dimensions.number_of_voxels();
        if samples.len() != expected {
            return Err(Error::UnexpectedSampleCount {
                expected,
                found: samples.len(),
            });
        }

        Ok(Self {
            dimensions,
            spacing,
            samples,
        })
    }

    /// Volume with the same value in every voxel
    ///
    /// Useful for phantoms, for example a water phantom is 0 HU everywhere.
    ///
    /// ```rust
    /// # use ctools_volume::{Dimensions, Spacing, Volume};
    /// let water = Volume::uniform(
    ///     Dimensions::new(100, 100, 100).unwrap(),
    ///     Spacing::isotropic(1.0).unwrap(),
    ///     0,
    /// )
    /// .unwrap();
    ///
    /// assert!(water.samples().iter().all(|s| *s == 0));
    /// ```
    pub fn uniform(dimensions: Dimensions, spacing: Spacing, value: i16) -> Result<Self> {
        dimensions.validate()?;
        Self::new(
            dimensions,
            spacing,
            vec![value; dimensions.number_of_voxels()],
        )
    }

    /// Volume with every sample generated from its `(ix, iy, iz)` index
    pub fn from_fn<F>(dimensions: Dimensions, spacing: Spacing, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> i16,
    {
        dimensions.validate()?;
        let mut samples = Vec::with_capacity(dimensions.number_of_voxels());
        for iz in 0..dimensions.nz {
            for iy in 0..dimensions.ny {
                for ix in 0..dimensions.nx {
                    samples.push(f(ix, iy, iz));
                }
            }
        }
        Self::new(dimensions, spacing, samples)
    }

    /// Number of voxels along each axis
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Voxel size along each axis in mm
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// All samples in storage order
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Give up the sample buffer
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Total number of voxels in the volume
    pub fn number_of_voxels(&self) -> usize {
        self.samples.len()
    }

    /// Sample at `(ix, iy, iz)`, or `None` if outside of the volume
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> Option<i16> {
        if self.dimensions.contains(ix, iy, iz) {
            Some(self.samples[self.dimensions.offset(ix, iy, iz)])
        } else {
            None
        }
    }

    /// All samples of the xy plane at `iz`
    ///
    /// Panics if `iz` is outside of the volume.
    pub fn z_slice(&self, iz: usize) -> &[i16] {
        let n = self.dimensions.slice_len();
        &self.samples[iz * n..(iz + 1) * n]
    }

    /// Smallest and largest sample values
    pub fn sample_range(&self) -> (i16, i16) {
        // never empty, dimensions are validated on construction
        let min = self.samples.iter().copied().min().unwrap_or_default();
        let max = self.samples.iter().copied().max().unwrap_or_default();
        (min, max)
    }
}

impl std::ops::Index<(usize, usize, usize)> for Volume {
    type Output = i16;

    fn index(&self, (ix, iy, iz): (usize, usize, usize)) -> &Self::Output {
        &self.samples[self.dimensions.offset(ix, iy, iz)]
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (min, max) = self.sample_range();
        let mut s = f!("{} voxels with {} mm size\n", self.dimensions, self.spacing);
        s += &f!("sample range [{min}, {max}]");
        write!(f, "{}", s)
    }
}

/// Number of voxels along each axis of a [Volume]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Voxels along x
    pub nx: usize,
    /// Voxels along y
    pub ny: usize,
    /// Voxels along z
    pub nz: usize,
}

impl Dimensions {
    /// New set of dimensions, every axis must have at least one voxel
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        let dimensions = Self { nx, ny, nz };
        dimensions.validate()?;
        Ok(dimensions)
    }

    /// Check that no axis is empty and the sample block is addressable
    ///
    /// ```rust
    /// # use ctools_volume::Dimensions;
    /// assert!(Dimensions::new(512, 512, 300).is_ok());
    /// assert!(Dimensions::new(512, 0, 300).is_err());
    /// assert!(Dimensions::new(usize::MAX / 2, 2, 2).is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let empty = self.nx == 0 || self.ny == 0 || self.nz == 0;
        if empty || self.checked_sample_byte_length().is_none() {
            return Err(Error::InvalidDimensions {
                nx: self.nx as i64,
                ny: self.ny as i64,
                nz: self.nz as i64,
            });
        }
        Ok(())
    }

    /// Total number of voxels
    ///
    /// Saturates at `usize::MAX` for dimensions that never passed
    /// [validate()](Dimensions::validate).
    pub fn number_of_voxels(&self) -> usize {
        self.checked_number_of_voxels().unwrap_or(usize::MAX)
    }

    /// Total number of voxels, or `None` on overflow
    pub fn checked_number_of_voxels(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }

    /// Number of voxels in a single xy plane
    pub fn slice_len(&self) -> usize {
        self.nx.saturating_mul(self.ny)
    }

    /// Linear storage offset of `(ix, iy, iz)`, x varying fastest
    ///
    /// ```rust
    /// # use ctools_volume::Dimensions;
    /// let dimensions = Dimensions::new(4, 3, 2).unwrap();
    /// assert_eq!(dimensions.offset(0, 0, 0), 0);
    /// assert_eq!(dimensions.offset(1, 0, 0), 1);
    /// assert_eq!(dimensions.offset(0, 1, 0), 4);
    /// assert_eq!(dimensions.offset(0, 0, 1), 12);
    /// ```
    #[inline]
    pub fn offset(&self, ix: usize, iy: usize, iz: usize) -> usize {
        iz * self.nx * self.ny + iy * self.nx + ix
    }

    /// Whether `(ix, iy, iz)` lies inside the volume
    pub fn contains(&self, ix: usize, iy: usize, iz: usize) -> bool {
        ix < self.nx && iy < self.ny && iz < self.nz
    }

    /// Expected byte length of the sample block in a binary file
    ///
    /// Saturates at `usize::MAX` like [number_of_voxels()](Dimensions::number_of_voxels).
    pub fn sample_byte_length(&self) -> usize {
        self.checked_sample_byte_length().unwrap_or(usize::MAX)
    }

    /// Expected byte length of the sample block, or `None` on overflow
    pub fn checked_sample_byte_length(&self) -> Option<usize> {
        self.checked_number_of_voxels()?
            .checked_mul(std::mem::size_of::<i16>())
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.nx, self.ny, self.nz)
    }
}

/// Voxel size in mm along each axis of a [Volume]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    /// Voxel width in x
    pub dx: f32,
    /// Voxel width in y
    pub dy: f32,
    /// Voxel width in z
    pub dz: f32,
}

impl Spacing {
    /// New voxel spacing, all values must be positive and finite
    pub fn new(dx: f32, dy: f32, dz: f32) -> Result<Self> {
        let spacing = Self { dx, dy, dz };
        spacing.validate()?;
        Ok(spacing)
    }

    /// Same voxel width along every axis
    pub fn isotropic(d: f32) -> Result<Self> {
        Self::new(d, d, d)
    }

    /// Check that every value is positive and finite
    pub fn validate(&self) -> Result<()> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(self.dx) && valid(self.dy) && valid(self.dz)) {
            return Err(Error::InvalidSpacing {
                dx: self.dx,
                dy: self.dy,
                dz: self.dz,
            });
        }
        Ok(())
    }

    /// Volume of a single voxel in mm^3
    pub fn voxel_volume(&self) -> f64 {
        self.dx as f64 * self.dy as f64 * self.dz as f64
    }
}

impl std::fmt::Display for Spacing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.dx, self.dy, self.dz)
    }
}
