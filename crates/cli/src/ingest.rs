//! Shared ingestion path for the score/compare commands.

use std::path::{Path, PathBuf};

use kvkstat_engine::columns::TOWN_HALL;
use kvkstat_engine::{EngineError, PlayerRecord, RosterStore, ScoringConfig, SnapshotPhase};
use kvkstat_io::read_scan;

use crate::exit_codes::EXIT_CONFIG_INVALID;
use crate::CliError;

#[derive(Default)]
pub struct IngestOutcome {
    pub files_loaded: usize,
    pub files_failed: usize,
}

/// Ingest one phase's files. Every file is read first; extracted rows
/// are then applied to the store sequentially, in argument order, one
/// file at a time. A file that yields no player rows is skipped with a
/// warning and never blocks the rest of the batch.
pub fn ingest_phase(
    store: &mut RosterStore,
    phase: SnapshotPhase,
    files: &[PathBuf],
) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    let mut scans = Vec::new();

    for path in files {
        match read_scan(path) {
            Ok(scan) => scans.push((path, scan)),
            Err(e) => {
                eprintln!("warning: skipping {} ({e})", path.display());
                outcome.files_failed += 1;
            }
        }
    }

    outcome.files_loaded = scans.len();
    for (path, scan) in scans {
        let sheets_with_rows = scan
            .sheets
            .iter()
            .filter(|s| !s.skipped && s.records > 0)
            .count();
        eprintln!(
            "{}: {} {phase} records across {sheets_with_rows} sheet(s)",
            path.display(),
            scan.records.len(),
        );
        store.apply_scan(phase, scan.records, scan.date);
    }

    outcome
}

pub fn load_config(path: &Path) -> Result<ScoringConfig, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(
            EXIT_CONFIG_INVALID,
            format!("cannot read {}: {e}", path.display()),
        )
    })?;
    ScoringConfig::from_toml(&raw).map_err(|e| {
        CliError::new(EXIT_CONFIG_INVALID, e.to_string())
            .with_hint("see `kvkstat score --help` for the coefficient names")
    })
}

/// The external record predicate handed to recalculation: a town-hall
/// floor when requested, otherwise keep-everything.
pub fn town_hall_floor(min_th: Option<f64>) -> impl Fn(&PlayerRecord) -> bool {
    move |record| match min_th {
        Some(level) => record.num_or_zero(TOWN_HALL) >= level,
        None => true,
    }
}

/// Recalculate every kingdom in discovery order. A kingdom missing one
/// snapshot side is a warning, not a failure; its previous results (if
/// any) stand.
pub fn recalculate_all(store: &mut RosterStore, min_th: Option<f64>) -> (usize, usize) {
    let kingdoms: Vec<String> = store.kingdom_ids().map(String::from).collect();
    let keep = town_hall_floor(min_th);

    let mut scored = 0;
    let mut missing = 0;
    for kingdom in kingdoms {
        match store.recalculate_filtered(&kingdom, &keep) {
            Ok(_) => scored += 1,
            Err(e @ EngineError::MissingSnapshot { .. }) => {
                eprintln!("warning: {e}");
                missing += 1;
            }
            Err(e) => eprintln!("warning: kingdom '{kingdom}': {e}"),
        }
    }
    (scored, missing)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use kvkstat_engine::columns::GOVERNOR_ID;
    use kvkstat_engine::Value;

    #[test]
    fn town_hall_floor_none_keeps_everything() {
        let keep = town_hall_floor(None);
        let mut rec = PlayerRecord::new("k");
        rec.fields.insert(GOVERNOR_ID, Value::Text("1".into()));
        assert!(keep(&rec));
    }

    #[test]
    fn town_hall_floor_drops_missing_and_low_levels() {
        let keep = town_hall_floor(Some(16.0));

        let mut low = PlayerRecord::new("k");
        low.fields.insert(TOWN_HALL, Value::Number(10.0));
        assert!(!keep(&low));

        let mut high = PlayerRecord::new("k");
        high.fields.insert(TOWN_HALL, Value::Number(25.0));
        assert!(keep(&high));

        // No town hall column at all: below any floor.
        let bare = PlayerRecord::new("k");
        assert!(!keep(&bare));
    }

    #[test]
    fn load_config_round_trips_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "t4_points = 12.5\ndeads_weight = 3.0").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.t4_points, 12.5);
        assert_eq!(config.deads_weight, 3.0);
        assert_eq!(config.kp_multiplier, 1.25);
    }

    #[test]
    fn load_config_reports_validation_failures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kp_power_divisor = 0.0").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
        assert!(err.message.contains("kp_power_divisor"));
    }
}
