//! End-to-end engine flow: apply scans, recalculate, patch a bonus,
//! roll up kingdom totals.

use kvkstat_engine::aggregate::kingdom_totals;
use kvkstat_engine::columns::{DEADS, GOVERNOR_ID, GOVERNOR_NAME, POWER, T4_KILLS, T5_KILLS};
use kvkstat_engine::{PlayerRecord, RosterStore, ScoringConfig, SnapshotPhase, Value};

fn record(kingdom: &str, id: &str, name: &str, fields: &[(&'static str, f64)]) -> PlayerRecord {
    let mut rec = PlayerRecord::new(kingdom);
    rec.fields.insert(GOVERNOR_ID, Value::Text(id.into()));
    rec.fields.insert(GOVERNOR_NAME, Value::Text(name.into()));
    for (col, n) in fields {
        rec.fields.insert(col, Value::Number(*n));
    }
    rec
}

#[test]
fn two_kingdom_session() {
    let mut store = RosterStore::new();

    // First scan file: both kingdoms, start phase.
    store.apply_scan(
        SnapshotPhase::Start,
        vec![
            record(
                "2044",
                "100",
                "Alba",
                &[(POWER, 1_000_000.0), (T4_KILLS, 10.0), (T5_KILLS, 5.0), (DEADS, 100.0)],
            ),
            record("2044", "101", "Borek", &[(POWER, 500_000.0), (T4_KILLS, 0.0), (DEADS, 0.0)]),
            record("1120", "200", "Cyra", &[(POWER, 2_000_000.0), (T5_KILLS, 50.0), (DEADS, 10.0)]),
        ],
        None,
    );

    // Second scan file: end phase. Borek quit (missing from end side).
    store.apply_scan(
        SnapshotPhase::End,
        vec![
            record(
                "2044",
                "100",
                "Alba",
                &[(POWER, 1_200_000.0), (T4_KILLS, 50.0), (T5_KILLS, 25.0), (DEADS, 300.0)],
            ),
            record("1120", "200", "Cyra", &[(POWER, 1_900_000.0), (T5_KILLS, 90.0), (DEADS, 60.0)]),
            record("1120", "201", "Dov", &[(POWER, 800_000.0), (T4_KILLS, 12.0), (DEADS, 5.0)]),
        ],
        None,
    );

    store.set_config_all(&ScoringConfig::default());
    assert_eq!(store.recalculate("2044").unwrap(), 2);
    assert_eq!(store.recalculate("1120").unwrap(), 2);

    let k2044 = store.get("2044").unwrap();
    let alba = k2044
        .scored
        .iter()
        .find(|r| r.governor_id == "100")
        .unwrap();
    assert_eq!(alba.name, "Alba");
    assert_eq!(alba.kvk_kp, 800.0);
    assert_eq!(alba.deads_delta, 200.0);

    // Borek appears with all-zero end contributions, power diff negative.
    let borek = k2044
        .scored
        .iter()
        .find(|r| r.governor_id == "101")
        .unwrap();
    assert_eq!(borek.power_diff, -500_000.0);
    assert_eq!(borek.kvk_kp, 0.0);

    // Dov joined mid-window: no start side, zero targets.
    let k1120 = store.get("1120").unwrap();
    let dov = k1120.scored.iter().find(|r| r.governor_id == "201").unwrap();
    assert_eq!(dov.start_power, 0.0);
    assert_eq!(dov.target_kp, 0.0);
    assert_eq!(dov.total_dkp_percent, 0.0);

    // Bonus patch is in place and non-cumulative.
    store.set_bonus("2044", "100", 5.0).unwrap();
    store.set_bonus("2044", "100", 10.0).unwrap();
    let alba = store
        .get("2044")
        .unwrap()
        .scored
        .iter()
        .find(|r| r.governor_id == "100")
        .unwrap();
    assert!((alba.total_dkp_percent - (alba.base_total() + 10.0)).abs() < 1e-12);

    // Rollup covers both kingdoms in discovery order.
    let totals = kingdom_totals(&store);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].kingdom, "2044");
    assert_eq!(totals[1].kingdom, "1120");
    assert_eq!(totals[0].players, 2);
    let expected_dkp = totals[0].kvk_kp + totals[0].deads_delta * 5.0;
    assert_eq!(totals[0].dkp, expected_dkp);
}

#[test]
fn recalculation_is_idempotent() {
    let mut store = RosterStore::new();
    store.apply_scan(
        SnapshotPhase::Start,
        vec![record("k", "1", "Gov", &[(POWER, 100_000.0), (T4_KILLS, 5.0), (DEADS, 10.0)])],
        None,
    );
    store.apply_scan(
        SnapshotPhase::End,
        vec![record("k", "1", "Gov", &[(POWER, 110_000.0), (T4_KILLS, 9.0), (DEADS, 30.0)])],
        None,
    );

    store.recalculate("k").unwrap();
    let first: Vec<(String, f64, f64)> = store
        .get("k")
        .unwrap()
        .scored
        .iter()
        .map(|r| (r.governor_id.clone(), r.kvk_kp, r.total_dkp_percent))
        .collect();

    store.recalculate("k").unwrap();
    let second: Vec<(String, f64, f64)> = store
        .get("k")
        .unwrap()
        .scored
        .iter()
        .map(|r| (r.governor_id.clone(), r.kvk_kp, r.total_dkp_percent))
        .collect();

    assert_eq!(first, second);
}
