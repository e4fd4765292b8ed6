use std::collections::BTreeMap;

use serde::Serialize;

use crate::columns;

// ---------------------------------------------------------------------------
// Snapshot phase
// ---------------------------------------------------------------------------

/// Which side of the event window a scan belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPhase {
    Start,
    End,
}

impl std::fmt::Display for SnapshotPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A raw cell value from a decoded workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric coercion. Text cells parse after stripping thousands
    /// separators ("1,234,567" is common in roster exports).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => {
                let cleaned = s.trim().replace(',', "");
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse::<f64>().ok()
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Render a number the way a roster export would: whole values without
/// a fractional part, everything else via plain `Display`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Snapshot records
// ---------------------------------------------------------------------------

/// One row of a scan, reduced to canonical columns.
///
/// Governor ID is unique within one (kingdom, phase) collection; the
/// store replaces an earlier record when a later append reuses an id.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Sheet name the row came from, used as the population identifier.
    pub kingdom: String,
    pub fields: BTreeMap<&'static str, Value>,
}

impl PlayerRecord {
    pub fn new(kingdom: impl Into<String>) -> Self {
        Self {
            kingdom: kingdom.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Governor ID rendered as a stable string key ("123", not "123.0").
    pub fn governor_id(&self) -> String {
        match self.fields.get(columns::GOVERNOR_ID) {
            Some(v) => v.to_string().trim().to_string(),
            None => String::new(),
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&Value> {
        self.fields.get(canonical)
    }

    pub fn num(&self, canonical: &str) -> Option<f64> {
        self.fields.get(canonical).and_then(Value::as_number)
    }

    pub fn num_or_zero(&self, canonical: &str) -> f64 {
        self.num(canonical).unwrap_or(0.0)
    }

    pub fn text(&self, canonical: &str) -> String {
        self.fields
            .get(canonical)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// One player after the start/end join: merged static columns plus
/// per-column deltas, with the start-side Power carried alongside for
/// target derivation.
#[derive(Debug, Clone)]
pub struct ReconciledRecord {
    pub governor_id: String,
    pub kingdom: String,
    pub start_power: f64,
    pub values: BTreeMap<&'static str, Value>,
}

impl ReconciledRecord {
    pub fn num_or_zero(&self, canonical: &str) -> f64 {
        self.values
            .get(canonical)
            .and_then(Value::as_number)
            .unwrap_or(0.0)
    }

    pub fn text(&self, canonical: &str) -> String {
        self.values
            .get(canonical)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Scored records
// ---------------------------------------------------------------------------

/// Derived per-player performance record. The whole collection is
/// rebuilt and replaced on each recalculation; only `bonus` is ever
/// patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPlayerRecord {
    pub governor_id: String,
    pub name: String,
    pub alliance: String,
    pub kingdom: String,
    pub start_power: f64,
    pub power_diff: f64,
    pub troop_power_diff: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub t4: f64,
    pub t5: f64,
    pub t4t5: f64,
    pub deads_delta: f64,
    /// Raw "Kill Points" column delta, clamped. Tracked but not scored;
    /// the scored metric is the tier-weighted `kvk_kp`.
    pub raw_kp: f64,
    pub kvk_kp: f64,
    pub target_kp: f64,
    pub kp_percent: f64,
    pub target_deads: f64,
    pub dead_percent: f64,
    pub total_dkp_percent: f64,
    pub bonus: f64,
}

impl ScoredPlayerRecord {
    /// Completion total before any bonus: average of the two component
    /// percents when both targets are positive, the single achievable
    /// percent when only one is, 0 otherwise.
    pub fn base_total(&self) -> f64 {
        match (self.target_kp > 0.0, self.target_deads > 0.0) {
            (true, true) => (self.kp_percent + self.dead_percent) / 2.0,
            (true, false) => self.kp_percent,
            (false, true) => self.dead_percent,
            (false, false) => 0.0,
        }
    }

    /// Replace the bonus offset. The total is re-derived from the base
    /// component percents plus the new bonus, never by adding to the
    /// previously stored total.
    pub fn set_bonus(&mut self, bonus: f64) {
        self.bonus = bonus;
        self.total_dkp_percent = self.base_total() + bonus;
    }
}

/// Cross-kingdom comparison row (aggregator output).
#[derive(Debug, Clone, Serialize)]
pub struct KingdomTotals {
    pub kingdom: String,
    pub players: usize,
    pub start_power: f64,
    pub power_diff: f64,
    pub troop_power_diff: f64,
    pub t4: f64,
    pub t5: f64,
    pub deads_delta: f64,
    pub kvk_kp: f64,
    /// Composite score: Σkvk_kp + Σdeads_delta * deads_weight.
    pub dkp: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_parse_with_thousands_separators() {
        assert_eq!(Value::Text("1,234,567".into()).as_number(), Some(1_234_567.0));
        assert_eq!(Value::Text(" 42 ".into()).as_number(), Some(42.0));
        assert_eq!(Value::Text("n/a".into()).as_number(), None);
        assert_eq!(Value::Text("".into()).as_number(), None);
        assert_eq!(Value::Number(3.5).as_number(), Some(3.5));
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(format_number(800.0), "800");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.5056), "0.5056");
    }

    #[test]
    fn governor_id_is_stable_across_cell_types() {
        let mut rec = PlayerRecord::new("1234");
        rec.fields
            .insert(crate::columns::GOVERNOR_ID, Value::Number(98765.0));
        assert_eq!(rec.governor_id(), "98765");

        rec.fields
            .insert(crate::columns::GOVERNOR_ID, Value::Text(" 98765 ".into()));
        assert_eq!(rec.governor_id(), "98765");
    }

    #[test]
    fn bonus_rederives_from_base_percents() {
        let mut rec = ScoredPlayerRecord {
            governor_id: "1".into(),
            name: "Gov".into(),
            alliance: "AAA".into(),
            kingdom: "1234".into(),
            start_power: 0.0,
            power_diff: 0.0,
            troop_power_diff: 0.0,
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
            t4: 0.0,
            t5: 0.0,
            t4t5: 0.0,
            deads_delta: 0.0,
            raw_kp: 0.0,
            kvk_kp: 0.0,
            target_kp: 100.0,
            kp_percent: 40.0,
            target_deads: 100.0,
            dead_percent: 60.0,
            total_dkp_percent: 50.0,
            bonus: 0.0,
        };
        rec.set_bonus(5.0);
        assert_eq!(rec.total_dkp_percent, 55.0);
        rec.set_bonus(10.0);
        // base + 10, never base + 15
        assert_eq!(rec.total_dkp_percent, 60.0);
    }

    #[test]
    fn base_total_single_sided_targets() {
        let mut rec = ScoredPlayerRecord {
            governor_id: "1".into(),
            name: String::new(),
            alliance: String::new(),
            kingdom: String::new(),
            start_power: 0.0,
            power_diff: 0.0,
            troop_power_diff: 0.0,
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
            t4: 0.0,
            t5: 0.0,
            t4t5: 0.0,
            deads_delta: 0.0,
            raw_kp: 0.0,
            kvk_kp: 0.0,
            target_kp: 100.0,
            kp_percent: 40.0,
            target_deads: 0.0,
            dead_percent: 0.0,
            total_dkp_percent: 0.0,
            bonus: 0.0,
        };
        assert_eq!(rec.base_total(), 40.0);

        rec.target_kp = 0.0;
        rec.kp_percent = 0.0;
        assert_eq!(rec.base_total(), 0.0);
    }
}
