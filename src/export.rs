//! Result presentation: CSV export and a plain-text table.
//!
//! CSV files start with a UTF-8 byte order mark so that spreadsheet
//! applications detect the encoding of Korean text correctly.

use std::io::Write;
use std::path::{Path, PathBuf};

use place_search::PlaceRecord;

use crate::error::Result;

/// UTF-8 byte order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Columns always exported.
pub const BASE_COLUMNS: &[&str] = &["name", "category", "address", "link"];

/// Columns added when extended output is on.
pub const EXTENDED_COLUMNS: &[&str] = &["rating", "review_count", "source_query"];

/// Header row for the chosen column set.
pub fn header(extended: bool) -> Vec<&'static str> {
    let mut columns = BASE_COLUMNS.to_vec();
    if extended {
        columns.extend_from_slice(EXTENDED_COLUMNS);
    }
    columns
}

fn row(record: &PlaceRecord, extended: bool) -> Vec<String> {
    let mut fields = vec![
        record.name.clone(),
        record.category.clone(),
        record.address.clone(),
        record.link.clone(),
    ];
    if extended {
        fields.push(format!("{:.1}", record.rating));
        fields.push(record.review_count.to_string());
        fields.push(record.source_query.clone());
    }
    fields
}

/// Write `records` as CSV, BOM first, header row second.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_csv<W: Write>(mut out: W, records: &[PlaceRecord], extended: bool) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header(extended))?;
    for record in records {
        writer.write_record(row(record, extended))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `records` to a CSV file at `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_csv(path: &Path, records: &[PlaceRecord], extended: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), records, extended)?;
    tracing::info!(path = %path.display(), count = records.len(), "CSV written");
    Ok(())
}

/// Default export file name for a region, e.g. `대전_유성구_결과.csv`.
pub fn default_file_name(region: &str) -> String {
    let stem: Vec<&str> = region.split_whitespace().collect();
    if stem.is_empty() {
        "결과.csv".to_string()
    } else {
        format!("{}_결과.csv", stem.join("_"))
    }
}

/// Resolve the export path: `dir` (or the working directory) plus the
/// default file name for `region`.
pub fn default_export_path(dir: Option<&Path>, region: &str) -> PathBuf {
    dir.map(Path::to_path_buf)
        .unwrap_or_default()
        .join(default_file_name(region))
}

/// Render records as a numbered, pipe-separated table.
pub fn render_table(records: &[PlaceRecord], extended: bool) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("#  | {}", header(extended).join(" | ")));
    for (index, record) in records.iter().enumerate() {
        lines.push(format!("{:<2} | {}", index + 1, row(record, extended).join(" | ")));
    }
    lines.join("\n")
}
