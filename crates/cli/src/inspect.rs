//! `kvkstat inspect` — decode one scan file and report what's inside.

use std::path::Path;

use serde::Serialize;

use kvkstat_io::{read_scan, IngestError, ScanFile, SheetStats};

use crate::exit_codes::{EXIT_ERROR, EXIT_SCAN_PARSE};
use crate::CliError;

#[derive(Serialize)]
struct InspectReport {
    file: String,
    records: usize,
    date: Option<String>,
    sheets: Vec<SheetStats>,
}

pub fn cmd_inspect(file: &Path, json: bool) -> Result<(), CliError> {
    let scan = read_scan(file).map_err(|e| match e {
        IngestError::NoPlayerRows => {
            CliError::new(EXIT_SCAN_PARSE, format!("{}: {e}", file.display()))
                .with_hint("check sheet names and that a Governor ID header exists in the first 20 rows")
        }
        IngestError::Workbook(_) => CliError::new(EXIT_ERROR, format!("{}: {e}", file.display())),
    })?;

    if json {
        let report = InspectReport {
            file: file.display().to_string(),
            records: scan.records.len(),
            date: scan.date.map(|d| d.format("%Y-%m-%d %H:%M").to_string()),
            sheets: scan.sheets.clone(),
        };
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    print_report(file, &scan);
    Ok(())
}

fn print_report(file: &Path, scan: &ScanFile) {
    let date = match scan.date {
        Some(d) => d.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "not found".to_string(),
    };
    println!(
        "{}: {} sheet(s), {} record(s), snapshot date {date}",
        file.display(),
        scan.sheets.len(),
        scan.records.len(),
    );
    for sheet in &scan.sheets {
        if sheet.skipped {
            println!("  - \"{}\": skipped", sheet.name);
        } else {
            match sheet.header_row {
                Some(row) => println!(
                    "  - \"{}\": {} record(s) (header at row {row})",
                    sheet.name, sheet.records
                ),
                None => println!("  - \"{}\": no header row found", sheet.name),
            }
        }
    }
}
