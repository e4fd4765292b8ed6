//! Scan workbook ingestion.
//!
//! Roster scans arrive as spreadsheet exports whose layout varies by
//! export tool: the header row floats within the first rows of each
//! sheet, header spellings differ, and bookkeeping sheets ("Summary",
//! "Top 10s") sit next to the per-kingdom roster sheets. Extraction is
//! schema-tolerant: the header row is auto-detected, headers map
//! through the engine's synonym table, unrecognized columns drop
//! silently, and each retained row is tagged with its sheet name as
//! the kingdom identifier.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use kvkstat_engine::columns;
use kvkstat_engine::model::format_number;
use kvkstat_engine::{PlayerRecord, Value};

/// How many leading rows of a sheet are searched for a header row.
const HEADER_SCAN_ROWS: usize = 20;

/// Sheets that never contain roster rows, matched case-insensitively.
const SKIPPED_SHEETS: &[&str] = &["summary", "top 10s"];

/// Snapshot timestamp as written into the first sheet by the scanner.
const DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2} UTC";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum IngestError {
    /// Workbook could not be opened or decoded.
    Workbook(String),
    /// No player rows anywhere in the file. Aborts this file's
    /// ingestion only; other files in a batch proceed independently.
    NoPlayerRows,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::NoPlayerRows => write!(f, "no player rows found in any sheet"),
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Decoded workbook
// ---------------------------------------------------------------------------

/// One decoded sheet: name plus an ordered grid of raw cells. No
/// header row is assumed.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

/// An ordered list of named sheets, as decoded from one uploaded file.
#[derive(Debug, Clone, Default)]
pub struct RawWorkbook {
    pub sheets: Vec<RawSheet>,
}

/// Decode a workbook file (xlsx, xls, xlsb, ods) into raw grids.
pub fn read_workbook(path: &Path) -> Result<RawWorkbook, IngestError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::Workbook(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::Workbook(format!("sheet '{name}': {e}")))?;
        let rows = range.rows().map(|r| r.to_vec()).collect();
        sheets.push(RawSheet { name, rows });
    }

    Ok(RawWorkbook { sheets })
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Per-sheet extraction statistics, for ingest reports.
#[derive(Debug, Clone, Serialize)]
pub struct SheetStats {
    pub name: String,
    pub skipped: bool,
    pub header_row: Option<usize>,
    pub records: usize,
}

/// Everything extracted from one scan file.
#[derive(Debug)]
pub struct ScanFile {
    pub records: Vec<PlayerRecord>,
    /// Single snapshot timestamp for the whole file, scanned from the
    /// first sheet's text.
    pub date: Option<NaiveDateTime>,
    pub sheets: Vec<SheetStats>,
}

/// Decode and extract in one step.
pub fn read_scan(path: &Path) -> Result<ScanFile, IngestError> {
    extract(&read_workbook(path)?)
}

/// Extract player records from a decoded workbook.
///
/// Fails with `NoPlayerRows` only when zero records were extracted
/// across every sheet in the file.
pub fn extract(workbook: &RawWorkbook) -> Result<ScanFile, IngestError> {
    let mut records = Vec::new();
    let mut sheets = Vec::new();

    for sheet in &workbook.sheets {
        if is_skipped_sheet(&sheet.name) {
            sheets.push(SheetStats {
                name: sheet.name.clone(),
                skipped: true,
                header_row: None,
                records: 0,
            });
            continue;
        }

        let before = records.len();
        let header_row = extract_sheet(sheet, &mut records);
        sheets.push(SheetStats {
            name: sheet.name.clone(),
            skipped: false,
            header_row,
            records: records.len() - before,
        });
    }

    if records.is_empty() {
        return Err(IngestError::NoPlayerRows);
    }

    let date = workbook.sheets.first().and_then(scan_snapshot_date);

    Ok(ScanFile {
        records,
        date,
        sheets,
    })
}

fn is_skipped_sheet(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    SKIPPED_SHEETS.iter().any(|s| *s == lowered)
}

/// Extract one sheet's rows into `records`, returning the detected
/// header row index. A sheet with no recognizable header within the
/// scan window yields zero records, which is not an error.
fn extract_sheet(sheet: &RawSheet, records: &mut Vec<PlayerRecord>) -> Option<usize> {
    let header_idx = find_header_row(&sheet.rows)?;
    let header_map = map_header(&sheet.rows[header_idx]);
    let kingdom = sheet.name.trim();

    for row in sheet.rows.iter().skip(header_idx + 1) {
        if let Some(record) = build_record(kingdom, row, &header_map) {
            records.push(record);
        }
    }

    Some(header_idx)
}

/// The header row is the first of the leading rows containing a cell
/// that normalizes to the Governor ID column. Position varies by
/// export tool, hence the scan.
fn find_header_row(rows: &[Vec<Data>]) -> Option<usize> {
    rows.iter().take(HEADER_SCAN_ROWS).position(|row| {
        row.iter()
            .any(|cell| columns::normalize_header(&cell_text(cell)) == Some(columns::GOVERNOR_ID))
    })
}

/// Column index → canonical name. First mapping wins when two headers
/// normalize to the same canonical column.
fn map_header(row: &[Data]) -> Vec<(usize, &'static str)> {
    let mut map: Vec<(usize, &'static str)> = Vec::new();
    for (idx, cell) in row.iter().enumerate() {
        if let Some(canonical) = columns::normalize_header(&cell_text(cell)) {
            if !map.iter().any(|(_, c)| *c == canonical) {
                map.push((idx, canonical));
            }
        }
    }
    map
}

/// Build a record from mapped columns only. Retained when the
/// Governor ID field is non-empty and at least one cell overall is
/// non-empty.
fn build_record(
    kingdom: &str,
    row: &[Data],
    header_map: &[(usize, &'static str)],
) -> Option<PlayerRecord> {
    if !row.iter().any(|cell| !matches!(cell, Data::Empty)) {
        return None;
    }

    let mut record = PlayerRecord::new(kingdom);
    for &(idx, canonical) in header_map {
        if let Some(value) = row.get(idx).and_then(cell_value) {
            record.fields.insert(canonical, value);
        }
    }

    if record.governor_id().is_empty() {
        return None;
    }
    Some(record)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Float(f) => Some(Value::Number(*f)),
        Data::Int(i) => Some(Value::Number(*i as f64)),
        Data::Bool(b) => Some(Value::Text(b.to_string())),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Value::Text(trimmed.to_string()))
            }
        }
        Data::DateTime(dt) => Some(Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// Snapshot date
// ---------------------------------------------------------------------------

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is a valid literal"))
}

/// Scan one sheet's full text dump for the snapshot timestamp.
fn scan_snapshot_date(sheet: &RawSheet) -> Option<NaiveDateTime> {
    let text: String = sheet
        .rows
        .iter()
        .flat_map(|row| row.iter().map(cell_text))
        .collect::<Vec<_>>()
        .join(" ");

    let matched = date_regex().find(&text)?;
    NaiveDateTime::parse_from_str(matched.as_str(), DATE_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
