//! `kvkstat score` — ingest, recalculate, export per-governor rows.

use std::path::{Path, PathBuf};

use kvkstat_engine::{RosterStore, ScoredPlayerRecord, SnapshotPhase};
use kvkstat_io::export::export_scored;

use crate::exit_codes::{EXIT_ERROR, EXIT_MISSING_SNAPSHOT, EXIT_SCAN_PARSE, EXIT_USAGE};
use crate::ingest::{ingest_phase, load_config, recalculate_all};
use crate::CliError;

pub fn cmd_score(
    start: &[PathBuf],
    end: &[PathBuf],
    config: Option<&Path>,
    min_th: Option<f64>,
    kingdom: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let mut store = RosterStore::new();

    let start_outcome = ingest_phase(&mut store, SnapshotPhase::Start, start);
    let end_outcome = ingest_phase(&mut store, SnapshotPhase::End, end);
    let files_failed = start_outcome.files_failed + end_outcome.files_failed;

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

    let (scored_kingdoms, missing) = recalculate_all(&mut store, min_th);
    if scored_kingdoms == 0 {
        return Err(CliError::new(
            EXIT_MISSING_SNAPSHOT,
            "no kingdom had both snapshot sides to score",
        )
        .with_hint("check that --start and --end files cover the same kingdoms"));
    }

    let records = collect_scored(&store, kingdom)?;

    let output = if json {
        serde_json::to_string_pretty(&records)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?
    } else {
        export_scored(&records).map_err(|e| CliError::new(EXIT_ERROR, e))?
    };

    match out {
        Some(path) => {
            std::fs::write(path, &output).map_err(|e| {
                CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{output}"),
    }

    eprintln!(
        "scored {} governor(s) across {scored_kingdoms} kingdom(s) ({files_failed} file(s) skipped, {missing} kingdom(s) missing a side)",
        records.len(),
    );
    Ok(())
}

fn collect_scored(
    store: &RosterStore,
    kingdom: Option<&str>,
) -> Result<Vec<ScoredPlayerRecord>, CliError> {
    match kingdom {
        Some(wanted) => match store.get(wanted) {
            Some(state) => Ok(state.scored.clone()),
            None => Err(CliError::new(
                EXIT_USAGE,
                format!("unknown kingdom: {wanted}"),
            )),
        },
        None => {
            let mut records = Vec::new();
            for kingdom in store.kingdom_ids() {
                if let Some(state) = store.get(kingdom) {
                    records.extend(state.scored.iter().cloned());
                }
            }
            Ok(records)
        }
    }
}
