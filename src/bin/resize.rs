//! Command line tool for resampling a CT volume onto a new voxel size

// ctools modules
use ctools::dicom::read_dicom_dir;
use ctools::resample::Resampler;
use ctools::volume::{read_volume_file, write_volume_file, Spacing, Volume};

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

/// Resample a CT volume onto voxels of a new size
///
/// Every output voxel is the overlap-weighted average of the input voxels
/// that share its space. Output dimensions are always even and the output
/// grid is centred on the input.
#[derive(Parser, Debug)]
#[command(name = "resize", version)]
struct Cli {
    /// Path to the input img volume, or a directory of DICOM slices
    file: PathBuf,

    /// New voxel size along x (mm)
    new_dx: f32,

    /// New voxel size along y (mm)
    new_dy: f32,

    /// New voxel size along z (mm)
    new_dz: f32,

    /// Output path [default: <file>_new]
    #[arg(short, long, value_name = "path")]
    output: Option<PathBuf>,

    /// Process z-slices one at a time on a single thread
    #[arg(long)]
    serial: bool,

    /// Hide the progress bar and all but error messages
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Explicit output path, or the input path with `_new` appended
    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                // drop any trailing separator so directories get a sibling
                let mut name = self.file.components().as_path().as_os_str().to_owned();
                name.push("_new");
                PathBuf::from(name)
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .module("ctools_dicom")
        .module("ctools_resample")
        .module("ctools_volume")
        .quiet(cli.quiet)
        .verbosity(cli.verbose as usize + 2)
        .show_level(false)
        .init()
        .context("Failed to initialise logging")?;

    let target = Spacing::new(cli.new_dx, cli.new_dy, cli.new_dz)
        .context("New voxel sizes must be positive and finite")?;

    let volume = read_input(&cli.file)
        .with_context(|| format!("Failed to read volume from {}", cli.file.display()))?;
    debug!("Input: {volume}");

    let mut resampler = Resampler::new();
    resampler.set_parallel(!cli.serial);
    if cli.quiet {
        resampler.disable_progress();
    }

    let resized = resampler
        .resample(&volume, target)
        .context("Failed to resample volume")?;
    debug!("Output: {resized}");

    let output = cli.output_path();
    info!("Writing {}", output.display());
    write_volume_file(&resized, &output)
        .with_context(|| format!("Failed to write volume to {}", output.display()))?;

    Ok(())
}

/// Read an img file, or combine a directory of DICOM slices
fn read_input(path: &Path) -> Result<Volume> {
    if path.is_dir() {
        info!("Reading DICOM series from {}", path.display());
        Ok(read_dicom_dir(path)?)
    } else {
        info!("Reading {}", path.display());
        Ok(read_volume_file(path)?)
    }
}
