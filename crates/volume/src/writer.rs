//! Write operations for Volume data

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::header::Header;
use crate::volume::Volume;
use ctools_utils::f;

// external crates
use bincode::serialize;

/// Write a [Volume] to a binary img file
///
/// Uses exactly the same layout as [read_volume_file()](crate::read_volume_file),
/// so anything written here can be read back without loss.
///
/// ```rust, no_run
/// # use ctools_volume::{write_volume_file, Dimensions, Spacing, Volume};
/// // Generate a pseudo water phantom
/// let phantom = Volume::uniform(
///     Dimensions::new(100, 100, 100).unwrap(),
///     Spacing::isotropic(1.0).unwrap(),
///     0,
/// )
/// .unwrap();
///
/// write_volume_file(&phantom, "water_100_1mm.img").unwrap();
/// ```
pub fn write_volume_file<P: AsRef<Path>>(volume: &Volume, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    write_volume(volume, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Serialise a [Volume] in the binary img layout to any byte sink
pub fn write_volume<W: Write>(volume: &Volume, writer: &mut W) -> Result<()> {
    let header = Header::try_from(volume)?;
    writer.write_all(&serialize(&header)?)?;

    for sample in volume.samples() {
        writer.write_all(&sample.to_le_bytes())?;
    }

    Ok(())
}

/// Write [Volume] data to a human readable text file
///
/// Intended for inspecting small volumes. The header values are followed by
/// every xy plane, one row of x values per line.
///
/// ```rust, no_run
/// # use ctools_volume::{read_volume_file, write_ascii_pretty};
/// let volume = read_volume_file("./data/water_100_1mm.img").unwrap();
/// write_ascii_pretty(&volume, "./volume_pretty.txt").unwrap();
/// ```
pub fn write_ascii_pretty<P: AsRef<Path>>(volume: &Volume, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    let dimensions = volume.dimensions();
    let spacing = volume.spacing();
    let (min, max) = volume.sample_range();

    writeln!(writer, "Total voxels: {}", volume.number_of_voxels())?;
    writeln!(writer, "Voxels in x: {}", dimensions.nx)?;
    writeln!(writer, "Voxels in y: {}", dimensions.ny)?;
    writeln!(writer, "Voxels in z: {}", dimensions.nz)?;
    writeln!(writer, "Voxel size x: {:.3} mm", spacing.dx)?;
    writeln!(writer, "Voxel size y: {:.3} mm", spacing.dy)?;
    writeln!(writer, "Voxel size z: {:.3} mm", spacing.dz)?;
    writeln!(writer, "Sample range: [{min}, {max}]")?;

    for iz in 0..dimensions.nz {
        writeln!(writer, "\nSlice[{iz}]:")?;
        for row in volume.z_slice(iz).chunks_exact(dimensions.nx) {
            let s = row
                .iter()
                .map(|sample| f!("{sample}"))
                .collect::<Vec<String>>()
                .join(" ");

            writeln!(writer, "{}", textwrap::fill(&s, 80))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write [Volume] data to a JSON file
///
/// A direct serialisation of the dimensions, spacing, and every sample.
///
/// ```rust, no_run
/// # use ctools_volume::{read_volume_file, write_json};
/// let volume = read_volume_file("./data/water_100_1mm.img").unwrap();
/// write_json(&volume, "./volume.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(volume: &Volume, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, volume)?;
    writer.flush()?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
