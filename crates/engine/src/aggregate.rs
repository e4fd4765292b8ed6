//! Cross-kingdom comparison rollup.

use crate::model::KingdomTotals;
use crate::store::RosterStore;

/// Sum each kingdom's scored set into one comparison row.
///
/// Kingdoms with an empty scored set are excluded. Output order is
/// kingdom discovery order, not sorted.
pub fn kingdom_totals(store: &RosterStore) -> Vec<KingdomTotals> {
    let mut totals = Vec::new();

    for kingdom in store.kingdom_ids() {
        let state = match store.get(kingdom) {
            Some(state) => state,
            None => continue,
        };
        if state.scored.is_empty() {
            continue;
        }

        let mut row = KingdomTotals {
            kingdom: kingdom.to_string(),
            players: state.scored.len(),
            start_power: 0.0,
            power_diff: 0.0,
            troop_power_diff: 0.0,
            t4: 0.0,
            t5: 0.0,
            deads_delta: 0.0,
            kvk_kp: 0.0,
            dkp: 0.0,
        };
        for rec in &state.scored {
            row.start_power += rec.start_power;
            row.power_diff += rec.power_diff;
            row.troop_power_diff += rec.troop_power_diff;
            row.t4 += rec.t4;
            row.t5 += rec.t5;
            row.deads_delta += rec.deads_delta;
            row.kvk_kp += rec.kvk_kp;
        }
        row.dkp = row.kvk_kp + row.deads_delta * state.config.deads_weight;
        totals.push(row);
    }

    totals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
