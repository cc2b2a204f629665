//! Read operations for binary img volume files
//!
//! The file is a fixed 24 byte [Header] followed by the raw samples as
//! little-endian signed 16-bit integers.

// standard library
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::header::Header;
use crate::volume::{Dimensions, Volume};

// external crates
use bincode::deserialize;

/// Deserialise a binary img volume file
///
/// Returns a Result containing a [Volume] with all the information extracted
/// from the file at `path`.
///
/// ```rust, no_run
/// # use ctools_volume::read_volume_file;
/// let volume = read_volume_file("./data/water_100_1mm.img").unwrap();
///
/// // Print a summary of the data
/// println!("{volume}");
/// ```
pub fn read_volume_file<P: AsRef<Path>>(path: P) -> Result<Volume> {
    let mut reader = init_reader(path)?;
    read_volume(&mut reader)
}

/// Deserialise a volume from any byte stream
///
/// ```rust
/// # use ctools_volume::{read_volume, write_volume, Dimensions, Spacing, Volume};
/// let volume = Volume::uniform(
///     Dimensions::new(2, 2, 2).unwrap(),
///     Spacing::isotropic(1.0).unwrap(),
///     -1000,
/// )
/// .unwrap();
///
/// let mut bytes = Vec::new();
/// write_volume(&volume, &mut bytes).unwrap();
/// assert_eq!(read_volume(&mut bytes.as_slice()).unwrap(), volume);
/// ```
pub fn read_volume<R: Read>(reader: &mut R) -> Result<Volume> {
    let header = parse_header(reader)?;
    let dimensions = header.dimensions()?;
    let spacing = header.spacing()?;
    let samples = parse_samples(reader, &dimensions)?;
    Volume::new(dimensions, spacing, samples)
}

/// Initialise a reader from anything that can be turned into a path
fn init_reader(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

/// Deserialise the fixed header block
fn parse_header<R: Read>(reader: &mut R) -> Result<Header> {
    let bytes = read_block(reader, Header::BYTE_LENGTH)?;
    let header = deserialize(&bytes)?;
    Ok(header)
}

/// Deserialise the sample block into a vector of intensities
fn parse_samples<R: Read>(reader: &mut R, dimensions: &Dimensions) -> Result<Vec<i16>> {
    let bytes = read_block(reader, dimensions.sample_byte_length())?;
    Ok(bytes
        .chunks_exact(std::mem::size_of::<i16>())
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Read exactly `expected` bytes, or fail with the number actually available
fn read_block<R: Read>(reader: &mut R, expected: usize) -> Result<Vec<u8>> {
    // grow with the stream rather than trusting the header for the allocation
    let mut bytes = Vec::new();
    reader.take(expected as u64).read_to_end(&mut bytes)?;

    if bytes.len() != expected {
        return Err(Error::UnexpectedByteLength {
            expected,
            found: bytes.len(),
        });
    }

    Ok(bytes)
}
