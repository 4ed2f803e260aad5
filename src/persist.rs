//! File persistence: the correction-file workflow and the calibration
//! sidecar.
//!
//! The working copy is always `<base>_corr<ext>` next to the loaded TSV;
//! the plain file is never rewritten and serves as the pristine original
//! for diff highlighting. Column centers ride along in `<tsv path>.json`.
//!
//! A load either completes or fails atomically: this module builds a new
//! [`Document`] and only the caller swaps it in, so a failed load leaves
//! the previous document active.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::calibration::Calibration;
use crate::document::Document;
use crate::error::{Result, ThotError};
use crate::tsv;
use crate::types::ImageInfo;

/// The on-disk locations tied to one loaded transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    /// The plain TSV as produced by the transcription step.
    pub tsv: PathBuf,
    /// Autosave target: `<base>_corr<ext>`.
    pub corr: PathBuf,
    /// Calibration sidecar: `<tsv path>.json`.
    pub sidecar: PathBuf,
}

impl DocumentPaths {
    /// Derive the correction and sidecar paths from a TSV path.
    pub fn for_tsv(tsv: &Path) -> Self {
        let stem = tsv
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = tsv
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let corr = tsv.with_file_name(format!("{stem}_corr{ext}"));

        let mut sidecar_name = tsv.as_os_str().to_os_string();
        sidecar_name.push(".json");

        Self {
            tsv: tsv.to_path_buf(),
            corr,
            sidecar: PathBuf::from(sidecar_name),
        }
    }
}

/// Load a document for the given TSV, preferring an existing correction
/// file as the working copy. The plain file supplies the pristine cell
/// values for diffing when a correction file is picked up.
pub fn load_document(tsv_path: &Path, image: ImageInfo) -> Result<(Document, DocumentPaths)> {
    let paths = DocumentPaths::for_tsv(tsv_path);

    let (working_text, has_corr) = if paths.corr.exists() {
        info!("found correction file: {}", paths.corr.display());
        (fs::read_to_string(&paths.corr)?, true)
    } else {
        (fs::read_to_string(&paths.tsv)?, false)
    };

    let table = tsv::parse(&working_text)?;
    info!(
        "loaded {} rows x {} columns",
        table.records.len(),
        table.headers.len()
    );
    let mut doc = tsv::to_document(&table, image);

    if has_corr {
        // Re-point the originals at the plain file, paired by index.
        // Rows only present in the correction file keep no original and
        // count as modified.
        match fs::read_to_string(&paths.tsv).map_err(ThotError::from).and_then(|t| tsv::parse(&t)) {
            Ok(original) => {
                let ids: Vec<_> = doc.rows().iter().map(|r| r.id).collect();
                for (id, record) in ids.into_iter().zip(original.records) {
                    doc.set_original_cells(id, record.cells);
                }
            }
            Err(e) => warn!("could not read originals from {}: {e}", paths.tsv.display()),
        }
    }

    if paths.sidecar.exists() {
        match fs::read_to_string(&paths.sidecar)
            .map_err(ThotError::from)
            .and_then(|t| serde_json::from_str::<Calibration>(&t).map_err(ThotError::from))
        {
            Ok(calibration) if !calibration.is_empty() => {
                info!("loaded calibration from {}", paths.sidecar.display());
                *doc.calibration_mut() = calibration;
            }
            Ok(_) => {}
            // A broken sidecar must not block the load; equal spacing
            // stands in.
            Err(e) => error!("failed to load calibration sidecar: {e}"),
        }
    }

    Ok((doc, paths))
}

/// Write the current document to the correction file and the calibration
/// to its sidecar. Called by the host whenever the editor reports dirty.
pub fn autosave(doc: &Document, paths: &DocumentPaths) -> Result<()> {
    let table = tsv::from_document(doc);
    fs::write(&paths.corr, tsv::serialize(&table))?;
    let calibration_json = serde_json::to_string(doc.calibration())?;
    fs::write(&paths.sidecar, calibration_json)?;
    info!("auto-saved to {}", paths.corr.display());
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn corr_and_sidecar_names() {
        let paths = DocumentPaths::for_tsv(Path::new("/data/page_042.tsv"));
        assert_eq!(paths.corr, PathBuf::from("/data/page_042_corr.tsv"));
        assert_eq!(paths.sidecar, PathBuf::from("/data/page_042.tsv.json"));
    }

    #[test]
    fn extensionless_tsv_still_gets_suffix() {
        let paths = DocumentPaths::for_tsv(Path::new("/data/page"));
        assert_eq!(paths.corr, PathBuf::from("/data/page_corr"));
    }
}
