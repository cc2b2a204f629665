// ctools modules
use ctools_volume::{Dimensions, Spacing, Volume};

// crate modules
use crate::error::{Error, Result};
use crate::overlap::{AxisOverlap, Overlap};
use crate::parameters::{Axis, ResampleParameters};

// external crates
use kdam::{Bar, BarBuilder, BarExt, TqdmParallelIterator};
use log::info;
use rayon::prelude::*;

/// Box-filter resampler for CT volumes
///
/// Every output voxel is the average of the input samples inside its
/// footprint, each weighted by the fraction of its volume that overlaps. The
/// three axes are planned independently and combined as a separable filter.
///
/// Minimal Example:
/// ```rust
/// # use ctools_resample::Resampler;
/// # use ctools_volume::{Dimensions, Spacing, Volume};
/// let volume = Volume::uniform(
///     Dimensions::new(8, 8, 8).unwrap(),
///     Spacing::isotropic(1.0).unwrap(),
///     40,
/// )
/// .unwrap();
///
/// let mut resampler = Resampler::new();
/// resampler.disable_progress();
///
/// let resized = resampler
///     .resample(&volume, Spacing::isotropic(2.0).unwrap())
///     .unwrap();
///
/// assert_eq!(resized.dimensions(), Dimensions::new(4, 4, 4).unwrap());
/// assert!(resized.samples().iter().all(|s| *s == 40));
/// ```
#[derive(Debug, Default)]
pub struct Resampler {
    /// Disable progress bar?
    disable_progress: bool,
    /// Split output z-slices across the rayon thread pool
    parallel: bool,
}

// ! ------------------------------------------------------------------------
// !                                Public API
// ! ------------------------------------------------------------------------

impl Resampler {
    /// Sequential resampler with a progress bar
    pub fn new() -> Self {
        Default::default()
    }

    /// Do not print the tqdm progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Process output z-slices in parallel
    ///
    /// Every output voxel is written by exactly one task, so results are
    /// identical to the sequential path.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Resample `volume` onto voxels of size `target`
    ///
    /// Output dimensions follow [output_length()](crate::output_length).
    pub fn resample(&self, volume: &Volume, target: Spacing) -> Result<Volume> {
        let parameters = ResampleParameters::new(volume, target)?;
        self.resample_with(volume, &parameters)
    }

    /// Resample `volume` with fully specified parameters
    pub fn resample_with(
        &self,
        volume: &Volume,
        parameters: &ResampleParameters,
    ) -> Result<Volume> {
        info!(
            "Resampling {} voxels of {} mm to {} voxels of {} mm",
            parameters.input_dimensions,
            parameters.input_spacing,
            parameters.output_dimensions,
            parameters.output_spacing
        );

        let [x, y, z] = parameters.plan_all()?;
        self.apply(volume, &x, &y, &z, parameters.voxel_ratio())
    }

    /// Combine three planned overlap tables into a new volume
    ///
    /// Output dimensions are the table lengths and the output spacing is taken
    /// from the tables. Each table must have been planned against the matching
    /// axis of `volume`.
    pub fn apply(
        &self,
        volume: &Volume,
        x: &AxisOverlap,
        y: &AxisOverlap,
        z: &AxisOverlap,
        voxel_ratio: f64,
    ) -> Result<Volume> {
        let dimensions = volume.dimensions();
        for (axis, table) in Axis::ALL.iter().zip([x, y, z]) {
            let found = axis.length(&dimensions);
            if table.input_length() != found {
                return Err(Error::TableLengthMismatch {
                    axis: *axis,
                    expected: table.input_length(),
                    found,
                });
            }
        }

        let output_dimensions = Dimensions::new(x.len(), y.len(), z.len())?;
        let output_spacing = Spacing::new(
            x.output_spacing() as f32,
            y.output_spacing() as f32,
            z.output_spacing() as f32,
        )?;

        let mut samples = allocate(output_dimensions.number_of_voxels())?;
        let kernel = Kernel {
            volume,
            output: output_dimensions,
            x,
            y,
            voxel_ratio,
        };

        if self.parallel {
            self.accumulate_parallel(&kernel, z, &mut samples)?;
        } else {
            self.accumulate_sequential(&kernel, z, &mut samples)?;
        }

        Ok(Volume::new(output_dimensions, output_spacing, samples)?)
    }
}

// ! ------------------------------------------------------------------------
// !                         Accumulation over z-slices
// ! ------------------------------------------------------------------------

impl Resampler {
    /// One output z-slice at a time, in order
    fn accumulate_sequential(
        &self,
        kernel: &Kernel,
        z: &AxisOverlap,
        out: &mut [i16],
    ) -> Result<()> {
        let mut progress_bar = self.init_progress_bar(z.len())?;
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        for (slice, z_row) in out.chunks_mut(kernel.slice_len()).zip(z.rows()) {
            kernel.fill_slice(z_row, slice);
            progress_bar.update(1)?;
        }

        self.finish_progress();
        Ok(())
    }

    /// Output z-slices distributed over the rayon thread pool
    fn accumulate_parallel(
        &self,
        kernel: &Kernel,
        z: &AxisOverlap,
        out: &mut [i16],
    ) -> Result<()> {
        let progress_bar = self.init_progress_bar(z.len())?;

        out.par_chunks_mut(kernel.slice_len())
            .zip(z.rows().par_iter())
            .tqdm_with_bar(progress_bar)
            .for_each(|(slice, z_row)| kernel.fill_slice(z_row, slice));

        self.finish_progress();
        Ok(())
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self, total: usize) -> Result<Bar> {
        BarBuilder::default()
            .total(total)
            .desc("Resampling")
            .unit(" slices")
            .disable(self.disable_progress)
            .build()
            .map_err(Error::ProgressBar)
    }

    /// Need an extra line for clean spacing if the progress bar is printed
    fn finish_progress(&self) {
        if !self.disable_progress {
            eprintln!()
        };
    }
}

/// Read-only state shared by every output slice
struct Kernel<'a> {
    volume: &'a Volume,
    output: Dimensions,
    x: &'a AxisOverlap,
    y: &'a AxisOverlap,
    voxel_ratio: f64,
}

impl Kernel<'_> {
    /// Number of voxels in one output xy plane
    fn slice_len(&self) -> usize {
        self.output.slice_len()
    }

    /// Fill the output xy plane whose z overlaps are `z_row`
    fn fill_slice(&self, z_row: &[Overlap], out: &mut [i16]) {
        for (niy, y_row) in self.y.rows().iter().enumerate() {
            for (nix, x_row) in self.x.rows().iter().enumerate() {
                let value = self.weighted_sum(x_row, y_row, z_row);
                out[self.output.offset(nix, niy, 0)] = to_sample(value * self.voxel_ratio);
            }
        }
    }

    /// Sum of input samples over the cross product of three overlap rows
    fn weighted_sum(&self, x_row: &[Overlap], y_row: &[Overlap], z_row: &[Overlap]) -> f64 {
        let dimensions = self.volume.dimensions();
        let samples = self.volume.samples();

        let mut value = 0.0;
        for oz in z_row {
            for oy in y_row {
                let weight_yz = oz.weight * oy.weight;
                for ox in x_row {
                    let sample = samples[dimensions.offset(ox.index, oy.index, oz.index)];
                    value += sample as f64 * ox.weight * weight_yz;
                }
            }
        }
        value
    }
}

/// Zeroed output buffer, reporting allocation failure instead of aborting
fn allocate(voxels: usize) -> Result<Vec<i16>> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(voxels)
        .map_err(|source| Error::AllocationFailure { voxels, source })?;
    samples.resize(voxels, 0);
    Ok(samples)
}

/// Round to the nearest integer and saturate to the i16 range
///
/// ```rust
/// # use ctools_resample::to_sample;
/// assert_eq!(to_sample(99.999999), 100);
/// assert_eq!(to_sample(-0.5), -1);
/// assert_eq!(to_sample(1.0e6), i16::MAX);
/// assert_eq!(to_sample(-1.0e6), i16::MIN);
/// ```
pub fn to_sample(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Resample a volume onto a new voxel size with default options
///
/// Sequential and without a progress bar. Use [Resampler] directly for
/// control over these.
///
/// ```rust
/// # use ctools_resample::resample_volume;
/// # use ctools_volume::{Dimensions, Spacing, Volume};
/// let volume = Volume::from_fn(
///     Dimensions::new(4, 2, 2).unwrap(),
///     Spacing::isotropic(1.0).unwrap(),
///     |ix, _, _| [10, 20, 30, 50][ix],
/// )
/// .unwrap();
///
/// // Only x is coarsened, y and z keep their 1 mm voxels
/// let resized = resample_volume(&volume, Spacing::new(2.0, 1.0, 1.0).unwrap()).unwrap();
///
/// assert_eq!(resized.dimensions(), Dimensions::new(2, 2, 2).unwrap());
/// assert!(resized.samples().chunks(2).all(|row| row == [15, 40]));
/// ```
pub fn resample_volume(volume: &Volume, target: Spacing) -> Result<Volume> {
    let mut resampler = Resampler::new();
    resampler.disable_progress();
    resampler.resample(volume, target)
}
