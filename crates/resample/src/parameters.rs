// ctools modules
use ctools_utils::FloatExt;
use ctools_volume::{Dimensions, Spacing, Volume};

// crate modules
use crate::error::{Error, Result};
use crate::overlap::AxisOverlap;

// external crates
use log::debug;

/// Spatial axes of a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order, x varying fastest
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Number of voxels along this axis
    pub fn length(&self, dimensions: &Dimensions) -> usize {
        match self {
            Axis::X => dimensions.nx,
            Axis::Y => dimensions.ny,
            Axis::Z => dimensions.nz,
        }
    }

    /// Voxel size along this axis
    pub fn spacing(&self, spacing: &Spacing) -> f32 {
        match self {
            Axis::X => spacing.dx,
            Axis::Y => spacing.dy,
            Axis::Z => spacing.dz,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{s}")
    }
}

/// Number of output voxels along an axis for a new voxel size
///
/// Always even, as `floor((n/2) * d / nd) * 2` with `n/2` an integer
/// division. Evaluated in 32-bit floats so dimensions match volumes resized
/// by earlier releases of the tooling.
///
/// ```rust
/// # use ctools_resample::output_length;
/// assert_eq!(output_length(512, 0.977, 2.0), 250);
/// assert_eq!(output_length(5, 1.0, 1.0), 4);
/// assert_eq!(output_length(4, 1.0, 0.5), 8);
/// ```
pub fn output_length(input_length: usize, input_spacing: f32, output_spacing: f32) -> usize {
    let half = (input_length / 2) as f32;
    (half * input_spacing / output_spacing) as usize * 2
}

/// Everything needed to resample a volume onto a new voxel size
///
/// ```rust
/// # use ctools_volume::{Dimensions, Spacing, Volume};
/// # use ctools_resample::ResampleParameters;
/// let volume = Volume::uniform(
///     Dimensions::new(512, 512, 10).unwrap(),
///     Spacing::new(0.977, 0.977, 2.5).unwrap(),
///     -1000,
/// )
/// .unwrap();
///
/// let target = Spacing::isotropic(2.0).unwrap();
/// let parameters = ResampleParameters::new(&volume, target).unwrap();
///
/// assert_eq!(parameters.output_dimensions, Dimensions::new(250, 250, 12).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleParameters {
    /// Voxels along each axis of the input
    pub input_dimensions: Dimensions,
    /// Voxel size of the input
    pub input_spacing: Spacing,
    /// Voxels along each axis of the output
    pub output_dimensions: Dimensions,
    /// Voxel size of the output
    pub output_spacing: Spacing,
}

impl ResampleParameters {
    /// Parameters for resampling `volume` onto voxels of size `target`
    ///
    /// Output dimensions come from [output_length()] for each axis. Fails if
    /// the target spacing is invalid or so coarse that any axis has no output
    /// voxels.
    pub fn new(volume: &Volume, target: Spacing) -> Result<Self> {
        target.validate()?;

        let dimensions = volume.dimensions();
        let spacing = volume.spacing();
        let [nx, ny, nz] = Axis::ALL.map(|axis| {
            output_length(
                axis.length(&dimensions),
                axis.spacing(&spacing),
                axis.spacing(&target),
            )
        });

        if nx == 0 || ny == 0 || nz == 0 {
            return Err(Error::EmptyOutput { nx, ny, nz });
        }

        Self::with_output_dimensions(volume, Dimensions::new(nx, ny, nz)?, target)
    }

    /// Parameters with explicitly chosen output dimensions
    ///
    /// The caller is responsible for the output grid fitting inside the input
    /// once both are centred, otherwise planning fails.
    pub fn with_output_dimensions(
        volume: &Volume,
        output_dimensions: Dimensions,
        target: Spacing,
    ) -> Result<Self> {
        target.validate()?;
        output_dimensions.validate()?;

        Ok(Self {
            input_dimensions: volume.dimensions(),
            input_spacing: volume.spacing(),
            output_dimensions,
            output_spacing: target,
        })
    }

    /// Ratio of input voxel volume to output voxel volume
    ///
    /// Converts a sum of overlap-weighted input samples, which scales with the
    /// overlapped input volume, into an average intensity per output voxel.
    pub fn voxel_ratio(&self) -> f64 {
        self.input_spacing.voxel_volume() / self.output_spacing.voxel_volume()
    }

    /// Plan the overlap table for a single axis
    pub fn plan(&self, axis: Axis) -> Result<AxisOverlap> {
        let table = AxisOverlap::plan(
            axis.length(&self.output_dimensions),
            axis.spacing(&self.output_spacing) as f64,
            axis.length(&self.input_dimensions),
            axis.spacing(&self.input_spacing) as f64,
        )?;

        debug!(
            "{axis} axis: {} -> {} voxels, up to {} overlaps per voxel",
            table.input_length(),
            table.len(),
            table.capacity()
        );

        Ok(table)
    }

    /// Plan the overlap tables of all three axes, in x, y, z order
    pub fn plan_all(&self) -> Result<[AxisOverlap; 3]> {
        debug!("voxel ratio {}", self.voxel_ratio().sci(5, 2));
        Ok([
            self.plan(Axis::X)?,
            self.plan(Axis::Y)?,
            self.plan(Axis::Z)?,
        ])
    }
}
