// Scan file IO - workbook decoding and delimited export

pub mod export;
pub mod workbook;

pub use workbook::{extract, read_scan, read_workbook, IngestError, RawSheet, RawWorkbook, ScanFile, SheetStats};
