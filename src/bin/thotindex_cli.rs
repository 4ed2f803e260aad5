//! CLI host for thotindex - loads a transcription and prints a JSON summary
//!
//! Usage:
//!   thotindex_cli <page.tsv> --image <page.png> [-o out.json]
//!
//! Honors an existing `<base>_corr` correction file and the calibration
//! sidecar, exactly like an interactive host would.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use thotindex::persist;
use thotindex::types::ImageInfo;

#[derive(Serialize)]
struct RowSummary<'a> {
    index: usize,
    bbox: String,
    modified: bool,
    cells: &'a [String],
}

#[derive(Serialize)]
struct Summary<'a> {
    image: ImageInfo,
    headers: &'a [String],
    rows: Vec<RowSummary<'a>>,
    calibration: Vec<(usize, f32)>,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: thotindex_cli <page.tsv> [--image page.png] [-o output.json]");
        std::process::exit(1);
    }

    let tsv_path = &args[1];
    let mut image_path = None;
    let mut output_path = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--image" if i + 1 < args.len() => {
                image_path = Some(args[i + 1].clone());
                i += 2;
            }
            "-o" if i + 1 < args.len() => {
                output_path = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
    }

    // Without an image, assume a 1000x1000 canvas so boxes stay in
    // thousandths; with one, decode for the real pixel dimensions.
    let image = match image_path {
        Some(path) => match image::image_dimensions(&path) {
            Ok((w, h)) => ImageInfo::new(w, h),
            Err(e) => {
                eprintln!("Error reading image {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ImageInfo::new(1000, 1000),
    };

    let (doc, paths) = match persist::load_document(Path::new(tsv_path), image) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading {tsv_path}: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("Autosave target: {}", paths.corr.display());

    let rows = doc
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| RowSummary {
            index,
            bbox: thotindex::tsv::format_bbox(thotindex::tsv::rect_to_bbox(row.rect, image)),
            modified: (0..doc.column_count()).any(|c| doc.is_modified(row.id, c)),
            cells: &row.cells,
        })
        .collect();

    let summary = Summary {
        image,
        headers: doc.headers(),
        rows,
        calibration: doc.calibration().markers().collect(),
    };

    let json = match serde_json::to_string_pretty(&summary) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &json) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
