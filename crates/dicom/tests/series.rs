//! Integration tests for DICOM series import

use ctools_dicom::{read_dicom_dir, Error};
use ctools_volume::{Dimensions, Spacing};
use dicom::core::{dicom_value, DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use rstest::rstest;
use std::path::{Path, PathBuf};

/// Fresh scratch directory so parallel tests never share files
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ctools_dicom_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a single-frame signed 16-bit CT slice
fn write_slice(dir: &Path, name: &str, location: f64, columns: u16, rows: u16, pixels: &[i16]) {
    let bytes: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
    let instance_uid = format!("1.2.826.0.1.3680043.2.1125.{}", name.len() * 1000 + pixels.len());

    let object = InMemDicomObject::from_element_iter([
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(uids::CT_IMAGE_STORAGE)),
        DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(instance_uid.clone())),
        DataElement::new(tags::SLICE_THICKNESS, VR::DS, PrimitiveValue::from("2.50")),
        DataElement::new(tags::SLICE_LOCATION, VR::DS, PrimitiveValue::from(format!("{location:+08.2}"))),
        DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2")),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(columns)),
        DataElement::new(tags::PIXEL_SPACING, VR::DS, dicom_value!(Strs, ["0.5", "0.80"])),
        DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)),
        DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)),
        DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(1_u16)),
        DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(bytes)),
    ]);

    let file = object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(instance_uid),
        )
        .unwrap();
    file.write_to_file(dir.join(name)).unwrap();
}

/// Pixels of a 3 x 2 slice tagged with its position in the series
fn slice_pixels(tag: i16) -> Vec<i16> {
    (0..6).map(|i| tag * 100 + i).collect()
}

#[test]
fn slices_sorted_by_location() {
    let dir = scratch("sorted");
    // file name order disagrees with slice order
    write_slice(&dir, "a.dcm", 10.0, 3, 2, &slice_pixels(2));
    write_slice(&dir, "b.dcm", -5.0, 3, 2, &slice_pixels(-1));
    write_slice(&dir, "c.DCM", 2.5, 3, 2, &slice_pixels(1));
    std::fs::write(dir.join("notes.txt"), "not a slice").unwrap();

    let volume = read_dicom_dir(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(volume.dimensions(), Dimensions::new(3, 2, 3).unwrap());
    assert_eq!(volume.spacing(), Spacing::new(0.8, 0.5, 2.5).unwrap());

    assert_eq!(volume.z_slice(0), &slice_pixels(-1)[..]);
    assert_eq!(volume.z_slice(1), &slice_pixels(1)[..]);
    assert_eq!(volume.z_slice(2), &slice_pixels(2)[..]);

    // rows of the slice map onto y
    assert_eq!(volume[(2, 1, 1)], 105);
}

#[rstest]
#[case(false)]
#[case(true)]
fn no_slices(#[case] with_other_files: bool) {
    let dir = scratch(&format!("empty_{with_other_files}"));
    if with_other_files {
        std::fs::write(dir.join("scan.img"), [0u8; 24]).unwrap();
    }

    let result = read_dicom_dir(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(matches!(result, Err(Error::NoDicomFiles(_))));
}

#[test]
fn missing_directory() {
    let dir = std::env::temp_dir().join("ctools_dicom_does_not_exist");
    assert!(matches!(read_dicom_dir(dir), Err(Error::IOError(_))));
}

#[test]
fn mismatched_slice_size() {
    let dir = scratch("mismatched");
    write_slice(&dir, "a.dcm", 0.0, 3, 2, &slice_pixels(0));
    write_slice(&dir, "b.dcm", 2.5, 2, 2, &[1, 2, 3, 4]);

    let result = read_dicom_dir(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(matches!(
        result,
        Err(Error::InconsistentSlice {
            expected: (3, 2),
            found: (2, 2),
            ..
        })
    ));
}

#[test]
fn not_dicom() {
    let dir = scratch("garbage");
    std::fs::write(dir.join("a.dcm"), b"definitely not a DICOM file").unwrap();

    let result = read_dicom_dir(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    assert!(matches!(result, Err(Error::UnreadableFile { .. })));
}
