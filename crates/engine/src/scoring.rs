//! Target derivation and completion scoring over reconciled deltas.

use crate::columns::{
    ALLIANCE_TAG, DEADS, GOVERNOR_NAME, KILL_POINTS, POWER, T1_KILLS, T2_KILLS, T3_KILLS,
    T4_KILLS, T5_KILLS, TROOP_POWER,
};
use crate::config::ScoringConfig;
use crate::model::{ReconciledRecord, ScoredPlayerRecord};

/// Score one kingdom's reconciled records. Pure: `(deltas, config) →
/// scored collection`; the store swaps the result in wholesale.
pub fn score(reconciled: &[ReconciledRecord], config: &ScoringConfig) -> Vec<ScoredPlayerRecord> {
    reconciled.iter().map(|rec| score_one(rec, config)).collect()
}

fn score_one(rec: &ReconciledRecord, config: &ScoringConfig) -> ScoredPlayerRecord {
    let t1 = rec.num_or_zero(T1_KILLS).max(0.0);
    let t2 = rec.num_or_zero(T2_KILLS).max(0.0);
    let t3 = rec.num_or_zero(T3_KILLS).max(0.0);
    let t4 = rec.num_or_zero(T4_KILLS).max(0.0);
    let t5 = rec.num_or_zero(T5_KILLS).max(0.0);

    let start_power = rec.start_power;
    // Power and troop power are deliberately unclamped: power can fall.
    let power_diff = rec.num_or_zero(POWER);
    let troop_power_diff = rec.num_or_zero(TROOP_POWER);
    let deads_delta = rec.num_or_zero(DEADS).max(0.0);
    let raw_kp = rec.num_or_zero(KILL_POINTS).max(0.0);

    // The scored metric is tier-weighted, not the export's own KP column.
    let kvk_kp = t4 * config.t4_points + t5 * config.t5_points;

    let expected_points_per_kill =
        config.t5_mix_ratio * config.t5_points + (1.0 - config.t5_mix_ratio) * config.t4_points;
    let target_kp =
        (start_power / config.kp_power_divisor) * expected_points_per_kill * config.kp_multiplier;
    let target_deads = start_power * config.deads_multiplier;

    let kp_percent = if target_kp > 0.0 {
        kvk_kp / target_kp * 100.0
    } else {
        0.0
    };
    let dead_percent = if target_deads > 0.0 {
        deads_delta / target_deads * 100.0
    } else {
        0.0
    };

    let mut scored = ScoredPlayerRecord {
        governor_id: rec.governor_id.clone(),
        name: rec.text(GOVERNOR_NAME),
        alliance: rec.text(ALLIANCE_TAG),
        kingdom: rec.kingdom.clone(),
        start_power,
        power_diff,
        troop_power_diff,
        t1,
        t2,
        t3,
        t4,
        t5,
        t4t5: t4 + t5,
        deads_delta,
        raw_kp,
        kvk_kp,
        target_kp,
        kp_percent,
        target_deads,
        dead_percent,
        total_dkp_percent: 0.0,
        bonus: 0.0,
    };
    scored.total_dkp_percent = scored.base_total();
    scored
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
