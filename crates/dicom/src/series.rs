// ctools modules
use ctools_volume::{Dimensions, Spacing, Volume};

// crate modules
use crate::error::{Error, Result};

// standard library
use std::fs;
use std::path::{Path, PathBuf};

// external crates
use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{open_file, FileDicomObject, InMemDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use log::{debug, info};

/// Combine every `.dcm` file in a directory into a single [Volume]
///
/// Each file is one axial slice. Slices are stacked in order of increasing
/// `SliceLocation`, falling back to the z component of
/// `ImagePositionPatient` for files without one. Other files in the
/// directory are ignored.
///
/// The first slice after sorting defines the geometry:
///
/// | Volume     | DICOM attribute                |
/// | ---------- | ------------------------------ |
/// | `nx`, `ny` | `Columns`, `Rows`              |
/// | `dx`, `dy` | `PixelSpacing` (column, row)   |
/// | `dz`       | `SliceThickness`               |
///
/// Stored pixel values are kept as they are, no rescale slope or intercept
/// is applied.
///
/// ```rust, no_run
/// # use ctools_dicom::read_dicom_dir;
/// let volume = read_dicom_dir("./data/patient_01").unwrap();
/// println!("{volume}");
/// ```
pub fn read_dicom_dir<P: AsRef<Path>>(directory: P) -> Result<Volume> {
    let directory = directory.as_ref();
    let paths = dicom_files(directory)?;
    info!("Found {} DICOM files in {}", paths.len(), directory.display());

    let mut slices = paths
        .iter()
        .map(|path| Slice::open(path))
        .collect::<Result<Vec<Slice>>>()?;
    slices.sort_by(|a, b| a.location.total_cmp(&b.location));

    let first = slices
        .first()
        .ok_or_else(|| Error::NoDicomFiles(directory.to_path_buf()))?;
    let dimensions = Dimensions::new(first.columns, first.rows, slices.len())?;
    let spacing = first.spacing()?;
    debug!("DICOM series of {dimensions} voxels with {spacing} mm size");

    let mut samples = Vec::new();
    for slice in &slices {
        samples.extend(slice.pixels(first.columns, first.rows)?);
    }

    Ok(Volume::new(dimensions, spacing, samples)?)
}

/// Every `.dcm` file directly inside `directory`, sorted by path
fn dicom_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;

    paths.retain(|path| {
        path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
    });

    if paths.is_empty() {
        return Err(Error::NoDicomFiles(directory.to_path_buf()));
    }

    paths.sort();
    Ok(paths)
}

/// A single parsed slice of the series
struct Slice {
    path: PathBuf,
    object: FileDicomObject<InMemDicomObject>,
    location: f64,
    columns: usize,
    rows: usize,
}

impl Slice {
    fn open(path: &Path) -> Result<Self> {
        let object = open_file(path).map_err(|e| unreadable(path, e))?;

        let location = get_f64(&object, tags::SLICE_LOCATION)
            .or_else(|| get_f64_vec(&object, tags::IMAGE_POSITION_PATIENT)?.get(2).copied())
            .ok_or_else(|| missing(path, "SliceLocation"))?;
        let columns = get_u32(&object, tags::COLUMNS).ok_or_else(|| missing(path, "Columns"))?;
        let rows = get_u32(&object, tags::ROWS).ok_or_else(|| missing(path, "Rows"))?;

        Ok(Self {
            path: path.to_path_buf(),
            object,
            location,
            columns: columns as usize,
            rows: rows as usize,
        })
    }

    /// Voxel size from the in-plane pixel spacing and slice thickness
    fn spacing(&self) -> Result<Spacing> {
        // PixelSpacing is the row spacing (y) followed by the column spacing (x)
        let pixel_spacing = get_f64_vec(&self.object, tags::PIXEL_SPACING)
            .filter(|v| v.len() == 2)
            .ok_or_else(|| missing(&self.path, "PixelSpacing"))?;
        let thickness = get_f64(&self.object, tags::SLICE_THICKNESS)
            .ok_or_else(|| missing(&self.path, "SliceThickness"))?;

        Ok(Spacing::new(
            pixel_spacing[1] as f32,
            pixel_spacing[0] as f32,
            thickness as f32,
        )?)
    }

    /// Decoded pixels, row by row, for a series of `columns` by `rows`
    fn pixels(&self, columns: usize, rows: usize) -> Result<Vec<i16>> {
        if (self.columns, self.rows) != (columns, rows) {
            return Err(Error::InconsistentSlice {
                path: self.path.clone(),
                expected: (columns, rows),
                found: (self.columns, self.rows),
            });
        }

        let decoded = self
            .object
            .decode_pixel_data()
            .map_err(|e| unreadable(&self.path, e))?;

        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let pixels = decoded
            .to_vec_with_options::<i16>(&options)
            .map_err(|e| unreadable(&self.path, e))?;

        let expected = columns * rows;
        if pixels.len() != expected {
            return Err(Error::UnexpectedPixelCount {
                path: self.path.clone(),
                expected,
                found: pixels.len(),
            });
        }

        Ok(pixels)
    }
}

fn unreadable(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::UnreadableFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn missing(path: &Path, attribute: &'static str) -> Error {
    Error::MissingAttribute {
        path: path.to_path_buf(),
        attribute,
    }
}

fn get_u32(object: &FileDicomObject<InMemDicomObject>, tag: Tag) -> Option<u32> {
    object.element(tag).ok()?.to_int::<u32>().ok()
}

fn get_f64(object: &FileDicomObject<InMemDicomObject>, tag: Tag) -> Option<f64> {
    object.element(tag).ok()?.to_float64().ok()
}

fn get_f64_vec(object: &FileDicomObject<InMemDicomObject>, tag: Tag) -> Option<Vec<f64>> {
    object.element(tag).ok()?.to_multi_float64().ok()
}
