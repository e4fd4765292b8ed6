//! Start/end snapshot join.
//!
//! Joins two filtered record sets for one kingdom over the union of
//! governor ids and merges them column by column:
//!
//! - static columns keep the end value, falling back to start;
//! - tier-kill columns diff end − start, floored at 0 (kill counters
//!   are monotonic; a negative raw diff is export noise, not loss);
//! - other numeric columns diff end − start with no clamp (power may
//!   legitimately fall);
//! - non-numeric values in numeric columns pass through end-or-start.
//!
//! A player missing from one side contributes all-zero values from
//! that side. Output is ordered by governor id, so identical inputs
//! reconcile identically.

use std::collections::{BTreeMap, BTreeSet};

use crate::columns::{self, ColumnClass};
use crate::model::{PlayerRecord, ReconciledRecord, Value};

pub fn reconcile(start: &[&PlayerRecord], end: &[&PlayerRecord]) -> Vec<ReconciledRecord> {
    let start_by_id = index_by_id(start);
    let end_by_id = index_by_id(end);

    let ids: BTreeSet<&String> = start_by_id.keys().chain(end_by_id.keys()).collect();

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let s = start_by_id.get(id).copied();
        let e = end_by_id.get(id).copied();
        out.push(merge_one(id, s, e));
    }
    out
}

fn index_by_id<'a>(records: &[&'a PlayerRecord]) -> BTreeMap<String, &'a PlayerRecord> {
    let mut map = BTreeMap::new();
    for rec in records {
        let id = rec.governor_id();
        if !id.is_empty() {
            map.insert(id, *rec);
        }
    }
    map
}

fn merge_one(id: &str, start: Option<&PlayerRecord>, end: Option<&PlayerRecord>) -> ReconciledRecord {
    let kingdom = end
        .or(start)
        .map(|r| r.kingdom.clone())
        .unwrap_or_default();
    let start_power = start.map(|r| r.num_or_zero(columns::POWER)).unwrap_or(0.0);

    let mut values = BTreeMap::new();
    for spec in columns::COLUMNS {
        let col = spec.canonical;
        let sv = start.and_then(|r| r.get(col));
        let ev = end.and_then(|r| r.get(col));
        if sv.is_none() && ev.is_none() {
            continue;
        }

        let merged = match spec.class {
            ColumnClass::Static => ev.or(sv).cloned(),
            ColumnClass::Tier(_) => {
                let diff = num_or_zero(ev) - num_or_zero(sv);
                Some(Value::Number(diff.max(0.0)))
            }
            ColumnClass::Metric => {
                let sn = sv.and_then(Value::as_number);
                let en = ev.and_then(Value::as_number);
                if sn.is_none() && en.is_none() {
                    // Neither side is numeric: raw passthrough.
                    ev.or(sv).cloned()
                } else {
                    Some(Value::Number(en.unwrap_or(0.0) - sn.unwrap_or(0.0)))
                }
            }
        };

        if let Some(value) = merged {
            values.insert(col, value);
        }
    }

    ReconciledRecord {
        governor_id: id.to_string(),
        kingdom,
        start_power,
        values,
    }
}

fn num_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_number).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{
        ALLIANCE_TAG, DEADS, GOVERNOR_ID, GOVERNOR_NAME, POWER, T4_KILLS, T5_KILLS, TROOP_POWER,
    };

    fn record(id: &str, fields: &[(&'static str, Value)]) -> PlayerRecord {
        let mut rec = PlayerRecord::new("1234");
        rec.fields.insert(GOVERNOR_ID, Value::Text(id.into()));
        for (col, value) in fields {
            rec.fields.insert(col, value.clone());
        }
        rec
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn union_covers_both_sides_exactly_once() {
        let s1 = record("1", &[(POWER, num(100.0))]);
        let s2 = record("2", &[(POWER, num(200.0))]);
        let e2 = record("2", &[(POWER, num(250.0))]);
        let e3 = record("3", &[(POWER, num(300.0))]);

        let out = reconcile(&[&s1, &s2], &[&e2, &e3]);
        let ids: Vec<&str> = out.iter().map(|r| r.governor_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn static_columns_prefer_end_value() {
        let s = record("1", &[(GOVERNOR_NAME, Value::Text("OldName".into()))]);
        let e = record("1", &[(GOVERNOR_NAME, Value::Text("NewName".into()))]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].text(GOVERNOR_NAME), "NewName");
    }

    #[test]
    fn static_columns_fall_back_to_start() {
        let s = record("1", &[(ALLIANCE_TAG, Value::Text("AAA".into()))]);
        let e = record("1", &[]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].text(ALLIANCE_TAG), "AAA");
    }

    #[test]
    fn tier_diffs_floor_at_zero() {
        // End below start: counter reset noise, not legitimate loss.
        let s = record("1", &[(T4_KILLS, num(500.0)), (T5_KILLS, num(100.0))]);
        let e = record("1", &[(T4_KILLS, num(450.0)), (T5_KILLS, num(130.0))]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].num_or_zero(T4_KILLS), 0.0);
        assert_eq!(out[0].num_or_zero(T5_KILLS), 30.0);
    }

    #[test]
    fn power_diff_may_go_negative() {
        let s = record("1", &[(POWER, num(1000.0)), (TROOP_POWER, num(700.0))]);
        let e = record("1", &[(POWER, num(900.0)), (TROOP_POWER, num(600.0))]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].num_or_zero(POWER), -100.0);
        assert_eq!(out[0].num_or_zero(TROOP_POWER), -100.0);
        assert_eq!(out[0].start_power, 1000.0);
    }

    #[test]
    fn missing_start_side_contributes_zero() {
        let e = record(
            "9",
            &[(POWER, num(5000.0)), (DEADS, num(40.0)), (T5_KILLS, num(7.0))],
        );
        let out = reconcile(&[], &[&e]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_power, 0.0);
        assert_eq!(out[0].num_or_zero(POWER), 5000.0);
        assert_eq!(out[0].num_or_zero(DEADS), 40.0);
        assert_eq!(out[0].num_or_zero(T5_KILLS), 7.0);
    }

    #[test]
    fn missing_end_side_diffs_against_zero() {
        let s = record("9", &[(POWER, num(5000.0)), (T4_KILLS, num(10.0))]);
        let out = reconcile(&[&s], &[]);
        assert_eq!(out[0].num_or_zero(POWER), -5000.0);
        // Tier clamp still applies.
        assert_eq!(out[0].num_or_zero(T4_KILLS), 0.0);
    }

    #[test]
    fn numeric_text_cells_are_diffed() {
        let s = record("1", &[(POWER, Value::Text("1,000,000".into()))]);
        let e = record("1", &[(POWER, Value::Text("1,200,000".into()))]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].num_or_zero(POWER), 200_000.0);
    }

    #[test]
    fn non_numeric_metric_passes_through() {
        let s = record("1", &[(DEADS, Value::Text("hidden".into()))]);
        let e = record("1", &[]);
        let out = reconcile(&[&s], &[&e]);
        assert_eq!(out[0].text(DEADS), "hidden");
    }

    #[test]
    fn reconcile_is_deterministic() {
        let s1 = record("5", &[(POWER, num(10.0))]);
        let s2 = record("3", &[(POWER, num(20.0))]);
        let e1 = record("4", &[(POWER, num(30.0))]);
        let a = reconcile(&[&s1, &s2], &[&e1]);
        let b = reconcile(&[&s1, &s2], &[&e1]);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.governor_id, y.governor_id);
            assert_eq!(x.values, y.values);
        }
    }
}
