//! TSV wire format for transcribed pages.
//!
//! One row per line, tab-separated, header line first. The first field of
//! every record is the bounding box serialized as `[ymin;xmin;ymax;xmax]`
//! in thousandths of the image dimensions (0-1000 integers). The core
//! works in image pixels; this module is the only place that sees the
//! textual encoding or the normalized coordinates.

use log::{error, warn};

use crate::document::Document;
use crate::error::{Result, ThotError};
use crate::geometry::Rect;
use crate::types::ImageInfo;

/// Bounding box in thousandths of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRecord {
    pub ymin: i32,
    pub xmin: i32,
    pub ymax: i32,
    pub xmax: i32,
}

/// One parsed record: box (if its field parsed) plus the data cells.
/// `cells` has exactly the document's column count, bbox field included
/// at index 0 in its textual form already stripped out.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub bbox: Option<BoxRecord>,
    pub cells: Vec<String>,
}

/// A parsed TSV file: header names plus records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<RowRecord>,
}

/// Parse TSV text. The header establishes the column count; short records
/// are padded with empty cells and long records truncated, with a warning
/// each. An unparseable box field keeps the record (`bbox: None`) so no
/// transcribed row is silently lost.
pub fn parse(text: &str) -> Result<Table> {
    let mut lines = text.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| ThotError::Load("empty TSV: no header line".into()))?;
    let headers: Vec<String> = header_line.split('\t').map(str::to_string).collect();
    if headers.len() < 2 {
        return Err(ThotError::Load(format!(
            "TSV header has {} column(s); need a bbox column and at least one data column",
            headers.len()
        )));
    }
    let width = headers.len();

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut cells: Vec<String> = line.split('\t').map(str::to_string).collect();
        if cells.len() < width {
            warn!(
                "line {}: {} field(s), padding to {} columns",
                line_no + 2,
                cells.len(),
                width
            );
            cells.resize(width, String::new());
        } else if cells.len() > width {
            warn!(
                "line {}: {} field(s), truncating to {} columns",
                line_no + 2,
                cells.len(),
                width
            );
            cells.truncate(width);
        }

        let bbox_field = cells.first().map(String::as_str).unwrap_or("");
        let bbox = parse_bbox(bbox_field);
        if bbox.is_none() {
            error!("line {}: invalid bbox field {:?}", line_no + 2, bbox_field);
        }
        records.push(RowRecord { bbox, cells });
    }

    Ok(Table { headers, records })
}

/// Serialize a table back to TSV text, box fields re-encoded.
pub fn serialize(table: &Table) -> String {
    let mut out = String::new();
    out.push_str(&table.headers.join("\t"));
    out.push('\n');
    for record in &table.records {
        let mut fields = record.cells.clone();
        if let Some(first) = fields.first_mut() {
            *first = match record.bbox {
                Some(bbox) => format_bbox(bbox),
                None => format_bbox(BoxRecord {
                    ymin: 0,
                    xmin: 0,
                    ymax: 0,
                    xmax: 0,
                }),
            };
        }
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

/// Parse a `[ymin;xmin;ymax;xmax]` field. Brackets and surrounding quotes
/// are stripped; `;` and `,` both separate. `None` when the field does not
/// hold exactly four numbers.
pub fn parse_bbox(field: &str) -> Option<BoxRecord> {
    let content = field.trim().trim_matches(|c| "[]\"' ".contains(c));
    let parts: Vec<&str> = content
        .split(|c| c == ';' || c == ',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 4 {
        return None;
    }
    let mut values = [0i32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        // Accept "120.0" as well as "120".
        #[allow(clippy::cast_possible_truncation)]
        {
            *slot = part.parse::<f64>().ok()? as i32;
        }
    }
    let [ymin, xmin, ymax, xmax] = values;
    Some(BoxRecord {
        ymin,
        xmin,
        ymax,
        xmax,
    })
}

/// Format a box record as `[ymin;xmin;ymax;xmax]`.
pub fn format_bbox(bbox: BoxRecord) -> String {
    format!("[{};{};{};{}]", bbox.ymin, bbox.xmin, bbox.ymax, bbox.xmax)
}

/// Convert a normalized box record to an image-pixel rect.
pub fn bbox_to_rect(bbox: BoxRecord, image: ImageInfo) -> Rect {
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (image.width as f32, image.height as f32);
    #[allow(clippy::cast_precision_loss)]
    Rect {
        x: bbox.xmin as f32 / 1000.0 * w,
        y: bbox.ymin as f32 / 1000.0 * h,
        w: (bbox.xmax - bbox.xmin) as f32 / 1000.0 * w,
        h: (bbox.ymax - bbox.ymin) as f32 / 1000.0 * h,
    }
}

/// Convert an image-pixel rect back to a normalized box record, clamped
/// to the 0-1000 range.
pub fn rect_to_bbox(rect: Rect, image: ImageInfo) -> BoxRecord {
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (image.width as f32, image.height as f32);
    let norm = |v: f32, extent: f32| -> i32 {
        #[allow(clippy::cast_possible_truncation)]
        let n = (v / extent * 1000.0).round() as i32;
        n.clamp(0, 1000)
    };
    BoxRecord {
        ymin: norm(rect.y, h),
        xmin: norm(rect.x, w),
        ymax: norm(rect.bottom(), h),
        xmax: norm(rect.right(), w),
    }
}

/// Build a document from parsed records. Boxes are converted to pixels;
/// records without a parseable box get a zero rect at the origin.
pub fn to_document(table: &Table, image: ImageInfo) -> Document {
    let mut doc = Document::new(image, table.headers.clone());
    for record in &table.records {
        let rect = record
            .bbox
            .map(|b| bbox_to_rect(b, image))
            .unwrap_or(Rect::ZERO);
        doc.push_loaded_row(rect, record.cells.clone());
    }
    doc
}

/// Snapshot a document back into records for saving.
pub fn from_document(doc: &Document) -> Table {
    let image = doc.image();
    let records = doc
        .rows()
        .iter()
        .map(|row| RowRecord {
            bbox: Some(rect_to_bbox(row.rect, image)),
            cells: row.cells.clone(),
        })
        .collect();
    Table {
        headers: doc.headers().to_vec(),
        records,
    }
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
    use test_case::test_case;

    #[test_case("[10;20;30;40]" ; "semicolons")]
    #[test_case("[10,20,30,40]" ; "commas")]
    #[test_case("\"[10; 20; 30; 40]\"" ; "quoted with spaces")]
    #[test_case("[10.0;20.0;30.0;40.0]" ; "floats")]
    fn bbox_parses(field: &str) {
        assert_eq!(
            parse_bbox(field),
            Some(BoxRecord {
                ymin: 10,
                xmin: 20,
                ymax: 30,
                xmax: 40
            })
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("[10;20;30]" ; "three parts")]
    #[test_case("[a;b;c;d]" ; "not numbers")]
    #[test_case("Dupont" ; "plain text")]
    fn bbox_rejects(field: &str) {
        assert_eq!(parse_bbox(field), None);
    }

    #[test]
    fn parse_pads_and_truncates_to_header_width() {
        let text = "BBox\tName\tDate\n[0;0;100;100]\tDupont\n[0;0;50;50]\tMartin\t1891\textra\n";
        let table = parse(text).unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.records[0].cells, vec!["[0;0;100;100]", "Dupont", ""]);
        assert_eq!(table.records[1].cells, vec!["[0;0;50;50]", "Martin", "1891"]);
    }

    #[test]
    fn parse_keeps_record_with_bad_bbox() {
        let text = "BBox\tName\nnot-a-box\tDupont\n";
        let table = parse(text).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].bbox, None);
    }

    #[test]
    fn parse_rejects_empty_and_single_column() {
        assert!(matches!(parse(""), Err(crate::error::ThotError::Load(_))));
        assert!(matches!(
            parse("OnlyBBox\n"),
            Err(crate::error::ThotError::Load(_))
        ));
    }

    #[test]
    fn thousandths_pixel_conversion() {
        let image = ImageInfo::new(2000, 3000);
        let bbox = BoxRecord {
            ymin: 100,
            xmin: 50,
            ymax: 200,
            xmax: 150,
        };
        let rect = bbox_to_rect(bbox, image);
        assert_eq!(rect, Rect::new(100.0, 300.0, 200.0, 300.0));
        assert_eq!(rect_to_bbox(rect, image), bbox);
    }

    #[test]
    fn document_roundtrip_preserves_rows() {
        let text = "BBox\tName\tDate\n[100;50;200;150]\tDupont\t1891\n[300;50;400;150]\tMartin\t1892\n";
        let table = parse(text).unwrap();
        let doc = to_document(&table, ImageInfo::new(1000, 1000));
        assert_eq!(doc.row_count(), 2);

        let back = from_document(&doc);
        assert_eq!(serialize(&back), text);
    }

    #[test]
    fn serialize_writes_zero_box_for_unparsed_bbox() {
        let table = Table {
            headers: vec!["BBox".into(), "Name".into()],
            records: vec![RowRecord {
                bbox: None,
                cells: vec!["junk".into(), "Dupont".into()],
            }],
        };
        assert_eq!(serialize(&table), "BBox\tName\n[0;0;0;0]\tDupont\n");
    }
}
