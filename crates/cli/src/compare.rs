//! `kvkstat compare` — cross-kingdom comparison totals.

use std::path::{Path, PathBuf};

use kvkstat_engine::aggregate::kingdom_totals;
use kvkstat_engine::model::format_number;
use kvkstat_engine::{RosterStore, SnapshotPhase};

use crate::exit_codes::{EXIT_ERROR, EXIT_MISSING_SNAPSHOT, EXIT_SCAN_PARSE};
use crate::ingest::{ingest_phase, load_config, recalculate_all};
use crate::CliError;

pub fn cmd_compare(
    start: &[PathBuf],
    end: &[PathBuf],
    config: Option<&Path>,
    min_th: Option<f64>,
    json: bool,
) -> Result<(), CliError> {
    let mut store = RosterStore::new();
    ingest_phase(&mut store, SnapshotPhase::Start, start);
    ingest_phase(&mut store, SnapshotPhase::End, end);

    if store.is_empty() {
        return Err(CliError::new(
            EXIT_SCAN_PARSE,
            "no player rows loaded from any input file",
        ));
    }

    if let Some(path) = config {
        let config = load_config(path)?;
        store.set_config_all(&config);
    }

    let (scored_kingdoms, _missing) = recalculate_all(&mut store, min_th);
    if scored_kingdoms == 0 {
        return Err(CliError::new(
            EXIT_MISSING_SNAPSHOT,
            "no kingdom had both snapshot sides to score",
        ));
    }

    let totals = kingdom_totals(&store);

    if json {
        let out = serde_json::to_string_pretty(&totals)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else {
        for t in &totals {
            println!(
                "{}: {} governors, start power {}, power {}{}, t4 {}, t5 {}, deads {}, kvk kp {}, dkp {}",
                t.kingdom,
                t.players,
                format_number(t.start_power),
                if t.power_diff >= 0.0 { "+" } else { "" },
                format_number(t.power_diff),
                format_number(t.t4),
                format_number(t.t5),
                format_number(t.deads_delta),
                format_number(t.kvk_kp),
                format_number(t.dkp),
            );
        }
    }

    eprintln!("compared {} kingdom(s)", totals.len());
    Ok(())
}
