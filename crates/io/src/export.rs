//! Delimited export of scored player records.

use csv::{QuoteStyle, WriterBuilder};

use kvkstat_engine::model::format_number;
use kvkstat_engine::ScoredPlayerRecord;

/// Fixed output column order. Consumers key on these positions.
pub const EXPORT_COLUMNS: &[&str] = &[
    "Governor ID",
    "Governor Name",
    "Population",
    "Starting Power",
    "Power +/-",
    "Troop Power",
    "T1 Kills",
    "T2 Kills",
    "T3 Kills",
    "T4 Kills",
    "T5 Kills",
    "T4+T5 Combined",
    "Deads Delta",
    "KVK KP",
    "Target KP",
    "KP % Complete",
    "Target Deads",
    "Dead % Complete",
    "Total DKP %",
    "Bonus",
];

/// Render scored records as delimited text, one row per player.
/// Non-numeric fields (names, kingdom tags) are quoted; numbers are
/// written raw, unformatted.
pub fn export_scored(records: &[ScoredPlayerRecord]) -> Result<String, String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| e.to_string())?;

    for rec in records {
        writer
            .write_record(&[
                rec.governor_id.clone(),
                rec.name.clone(),
                rec.kingdom.clone(),
                format_number(rec.start_power),
                format_number(rec.power_diff),
                format_number(rec.troop_power_diff),
                format_number(rec.t1),
                format_number(rec.t2),
                format_number(rec.t3),
                format_number(rec.t4),
                format_number(rec.t5),
                format_number(rec.t4t5),
                format_number(rec.deads_delta),
                format_number(rec.kvk_kp),
                format_number(rec.target_kp),
                format_number(rec.kp_percent),
                format_number(rec.target_deads),
                format_number(rec.dead_percent),
                format_number(rec.total_dkp_percent),
                format_number(rec.bonus),
            ])
            .map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, name: &str) -> ScoredPlayerRecord {
        ScoredPlayerRecord {
            governor_id: id.into(),
            name: name.into(),
            alliance: "AAA".into(),
            kingdom: "2044".into(),
            start_power: 1_000_000.0,
            power_diff: 200_000.0,
            troop_power_diff: -5_000.0,
            t1: 0.0,
            t2: 0.0,
            t3: 1.0,
            t4: 40.0,
            t5: 20.0,
            t4t5: 60.0,
            deads_delta: 200.0,
            raw_kp: 3_000.0,
            kvk_kp: 800.0,
            target_kp: 7_083_333.0,
            kp_percent: 0.0113,
            target_deads: 20_000.0,
            dead_percent: 1.0,
            total_dkp_percent: 0.5056,
            bonus: 0.0,
        }
    }

    #[test]
    fn header_matches_fixed_column_order() {
        let out = export_scored(&[]).unwrap();
        let header = out.lines().next().unwrap();
        assert!(header.starts_with("\"Governor ID\",\"Governor Name\",\"Population\""));
        assert!(header.ends_with("\"Total DKP %\",\"Bonus\""));
        assert_eq!(header.split(',').count(), EXPORT_COLUMNS.len());
    }

    #[test]
    fn names_quoted_numbers_raw() {
        let out = export_scored(&[scored("100", "Alba, the Bold")]).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("\"Alba, the Bold\""));
        assert!(row.contains("1000000"));
        assert!(row.contains("-5000"));
        assert!(row.contains("0.5056"));
        assert!(!row.contains("\"1000000\""));
    }

    #[test]
    fn one_row_per_record() {
        let out = export_scored(&[scored("1", "A"), scored("2", "B")]).unwrap();
        assert_eq!(out.lines().count(), 3);
    }
}
