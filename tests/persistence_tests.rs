//! Correction-file workflow against a real temporary directory.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use thotindex::calibration::Calibration;
use thotindex::persist::{autosave, load_document, DocumentPaths};
use thotindex::types::ImageInfo;

const PAGE: &str = "BBox\tName\tDate\n\
                    [100;50;200;150]\tDupont\t1891\n\
                    [300;50;400;150]\tMartin\t1892\n";

fn write_page(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("page_042.tsv");
    fs::write(&path, PAGE).unwrap();
    path
}

#[test]
fn plain_file_loads_with_equal_spacing() {
    let dir = TempDir::new().unwrap();
    let tsv = write_page(&dir);

    let (doc, paths) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    assert_eq!(doc.row_count(), 2);
    assert_eq!(doc.headers(), ["BBox", "Name", "Date"]);
    assert_eq!(paths.corr, dir.path().join("page_042_corr.tsv"));
    assert_eq!(paths.sidecar, dir.path().join("page_042.tsv.json"));

    // No sidecar yet: defaults from the column count.
    let expected = Calibration::equally_spaced(3);
    assert_eq!(doc.calibration(), &expected);

    // Nothing touched is not modified.
    let id = doc.row_at(0).unwrap().id;
    assert!(!doc.is_modified(id, 1));
}

#[test]
fn autosave_writes_corr_and_sidecar_but_not_the_plain_file() {
    let dir = TempDir::new().unwrap();
    let tsv = write_page(&dir);

    let (mut doc, paths) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    let id = doc.row_at(0).unwrap().id;
    doc.set_cell(id, 1, "Dupond".into());
    autosave(&doc, &paths).unwrap();

    assert_eq!(fs::read_to_string(&tsv).unwrap(), PAGE);
    let corr_text = fs::read_to_string(&paths.corr).unwrap();
    assert!(corr_text.contains("Dupond"));
    assert!(!corr_text.contains("Dupont"));
    assert!(paths.sidecar.exists());
}

#[test]
fn corr_file_is_preferred_and_diffs_against_the_plain_file() {
    let dir = TempDir::new().unwrap();
    let tsv = write_page(&dir);

    // First session: correct a cell and save.
    let (mut doc, paths) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    let id = doc.row_at(0).unwrap().id;
    doc.set_cell(id, 1, "Dupond".into());
    autosave(&doc, &paths).unwrap();

    // Second session: picks up the correction file, originals come from
    // the plain file so the edit still highlights as modified.
    let (reloaded, _) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    let row = reloaded.row_at(0).unwrap();
    assert_eq!(row.cells[1], "Dupond");
    assert!(reloaded.is_modified(row.id, 1));
    assert_eq!(reloaded.original_cell(row.id, 1), Some("Dupont"));

    let untouched = reloaded.row_at(1).unwrap();
    assert!(!reloaded.is_modified(untouched.id, 1));
}

#[test]
fn sidecar_calibration_survives_a_reload() {
    let dir = TempDir::new().unwrap();
    let tsv = write_page(&dir);

    let (mut doc, paths) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    doc.calibration_mut().set_center(1, 0.25, 3);
    autosave(&doc, &paths).unwrap();

    let (reloaded, _) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    assert!((reloaded.calibration().center(1) - 0.25).abs() < 1e-5);
}

#[test]
fn malformed_sidecar_falls_back_to_equal_spacing() {
    let dir = TempDir::new().unwrap();
    let tsv = write_page(&dir);
    let paths = DocumentPaths::for_tsv(&tsv);
    fs::write(&paths.sidecar, "{not json").unwrap();

    let (doc, _) = load_document(&tsv, ImageInfo::new(1000, 1000)).unwrap();
    assert_eq!(doc.calibration(), &Calibration::equally_spaced(3));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.tsv");
    assert!(load_document(&missing, ImageInfo::new(1000, 1000)).is_err());
}
