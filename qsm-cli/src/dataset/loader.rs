//! Read survey exports from CSV or XLSX
//!
//! Cells equal to one of [`NULL_MARKERS`] are read as null. Malformed CSV rows
//! (more cells than headers) are skipped, short rows are padded with nulls.
//! Bytes that are not valid UTF-8 become U+FFFD instead of losing the row.

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::Dataset;
use crate::services::mapping::HeaderSet;

/// Cell texts that mean "no value"
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for reading delimited text exports
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

pub fn is_null_marker(cell: &str) -> bool {
    NULL_MARKERS.contains(&cell)
}

fn normalize_cell(cell: &str) -> Option<String> {
    if is_null_marker(cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Make repeated header names distinct: "X", "X" -> "X", "X.1"
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());

    for header in headers {
        let mut candidate = header.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", header, n);
            n += 1;
        }
        seen.push(candidate);
    }

    seen
}

/// Load an export, choosing the reader by file extension
pub fn load_dataset<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xlsm"));

    let dataset = if is_xlsx {
        read_xlsx(path)?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open export: {}", path.display()))?;
        read_csv(file, options)
            .with_context(|| format!("Failed to read CSV export: {}", path.display()))?
    };

    if dataset.is_empty() {
        log::warn!("{} has no data rows", path.display());
    } else {
        log::info!(
            "Loaded {} rows ({} columns) from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
    }

    Ok(dataset)
}

/// Read a delimited export from any reader
pub fn read_csv<R: Read>(reader: R, options: LoadOptions) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let raw_headers: Vec<String> = rdr
        .byte_headers()
        .context("Failed to read header row")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = String::from_utf8_lossy(h);
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.into_owned()
            }
        })
        .collect();
    let headers = HeaderSet::new(dedupe_headers(raw_headers));

    let mut rows = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(e).context("Failed to read export");
            }
            Err(e) => {
                log::warn!("Skipping unreadable line {}: {}", i + 2, e);
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or((i + 2) as u64);
        if record.len() > headers.len() {
            log::warn!(
                "Skipping line {}: expected {} fields, saw {}",
                line,
                headers.len(),
                record.len()
            );
            continue;
        }

        let cells = record
            .iter()
            .map(|cell| {
                let text = String::from_utf8_lossy(cell);
                if matches!(text, Cow::Owned(_)) {
                    log::warn!("Line {}: replaced invalid UTF-8 in a cell", line);
                }
                normalize_cell(&text)
            })
            .collect();
        rows.push(cells);
    }

    Ok(Dataset::new(headers, rows))
}

/// Convert a spreadsheet cell; empty and error cells are null
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => normalize_cell(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(format!("{}", dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Read the first worksheet of an XLSX export
fn read_xlsx(path: &Path) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Dataset::default());
    };

    let headers = HeaderSet::new(dedupe_headers(
        header_row
            .iter()
            .map(|c| cell_to_string(c).unwrap_or_default())
            .collect(),
    ));

    let data = rows
        .filter(|row| row.iter().any(|c| cell_to_string(c).is_some()))
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Dataset::new(headers, data))
}
