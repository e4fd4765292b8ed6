//! Canonical column names and the header synonym table.
//!
//! Scan exports disagree on header spelling ("Governor ID" vs "Gov ID"
//! vs "UID"), and column positions shift between export tools. Every
//! canonical column owns an ordered synonym list; lookup is
//! case-insensitive over trimmed input and never fails — a header that
//! matches nothing simply has no canonical name, and its column is
//! dropped from every derived record.

// ---------------------------------------------------------------------------
// Canonical names
// ---------------------------------------------------------------------------

pub const GOVERNOR_ID: &str = "Governor ID";
pub const GOVERNOR_NAME: &str = "Governor Name";
pub const ALLIANCE_TAG: &str = "Alliance Tag";
pub const KINGDOM: &str = "Kingdom";
pub const TOWN_HALL: &str = "Town Hall";
pub const POWER: &str = "Power";
pub const TROOP_POWER: &str = "Troop Power";
pub const KILL_POINTS: &str = "Kill Points";
pub const DEADS: &str = "Deads";
pub const T1_KILLS: &str = "T1 Kills";
pub const T2_KILLS: &str = "T2 Kills";
pub const T3_KILLS: &str = "T3 Kills";
pub const T4_KILLS: &str = "T4 Kills";
pub const T5_KILLS: &str = "T5 Kills";
pub const DOMAIN_ID: &str = "Domain ID";
pub const LOST_KINGDOM_COUNT: &str = "Lost Kingdom Count";
pub const LK_MOST_KILLED: &str = "LK Most Killed";
pub const LK_MOST_LOST: &str = "LK Most Lost";
pub const LK_MOST_HEALED: &str = "LK Most Healed";
pub const CURRENT_LEAGUE: &str = "Current League";
pub const HIGHEST_LEAGUE: &str = "Highest League";
pub const OLYMPIA_BATTLES: &str = "Olympia Battles";
pub const OLYMPIA_WINS: &str = "Olympia Wins";
pub const OLYMPIA_LIKES: &str = "Olympia Likes";
pub const ARK_BATTLES: &str = "Ark Battles";
pub const ARK_WINS: &str = "Ark Wins";
pub const ARK_KILLS_PER_BATTLE: &str = "Ark Kills Per Battle";
pub const ARK_SEVS_PER_BATTLE: &str = "Ark Sevs Per Battle";
pub const ARK_HEALED_PER_BATTLE: &str = "Ark Healed Per Battle";
pub const OSIRIS_COUNT: &str = "Osiris Count";
pub const CHAMPIONSHIP_COUNT: &str = "Championship Count";
pub const UTC_OFFSET: &str = "UTC Offset";
pub const AUTARCH_COUNT: &str = "Autarch Count";

// ---------------------------------------------------------------------------
// Column classes
// ---------------------------------------------------------------------------

/// How a column behaves under reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    /// Identity/metadata: end value wins, falling back to start. Never diffed.
    Static,
    /// Monotonic kill counter: diffed end − start, floored at 0.
    Tier(u8),
    /// Numeric, non-static: diffed end − start, no clamp.
    Metric,
}

pub struct ColumnSpec {
    pub canonical: &'static str,
    pub class: ColumnClass,
    /// Ordered synonym list; matched lowercased and trimmed, first wins.
    pub synonyms: &'static [&'static str],
}

/// Ordered table of every recognized column. Lookup order matters:
/// Governor ID synonyms are claimed before Governor Name's "governor".
pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        canonical: GOVERNOR_ID,
        class: ColumnClass::Static,
        synonyms: &["governor id", "gov id", "id", "user id", "uid"],
    },
    ColumnSpec {
        canonical: GOVERNOR_NAME,
        class: ColumnClass::Static,
        synonyms: &["governor name", "gov name", "name", "player", "governor"],
    },
    ColumnSpec {
        canonical: ALLIANCE_TAG,
        class: ColumnClass::Static,
        synonyms: &["alliance", "tag", "alliance tag", "abbr"],
    },
    ColumnSpec {
        canonical: KINGDOM,
        class: ColumnClass::Static,
        synonyms: &["kingdom", "population", "kd"],
    },
    ColumnSpec {
        canonical: TOWN_HALL,
        class: ColumnClass::Static,
        synonyms: &["town hall", "th", "al", "city hall", "ch"],
    },
    ColumnSpec {
        canonical: POWER,
        class: ColumnClass::Metric,
        synonyms: &["power", "total power", "pwr"],
    },
    ColumnSpec {
        canonical: TROOP_POWER,
        class: ColumnClass::Metric,
        synonyms: &["troop power", "troops", "troop"],
    },
    ColumnSpec {
        canonical: KILL_POINTS,
        class: ColumnClass::Metric,
        synonyms: &["kill points", "kp", "killpoints", "kills"],
    },
    ColumnSpec {
        canonical: DEADS,
        class: ColumnClass::Metric,
        synonyms: &["deads", "dead", "deaths", "dead troops"],
    },
    ColumnSpec {
        canonical: T1_KILLS,
        class: ColumnClass::Tier(1),
        synonyms: &["t1 kills", "tier 1 kills", "t1"],
    },
    ColumnSpec {
        canonical: T2_KILLS,
        class: ColumnClass::Tier(2),
        synonyms: &["t2 kills", "tier 2 kills", "t2"],
    },
    ColumnSpec {
        canonical: T3_KILLS,
        class: ColumnClass::Tier(3),
        synonyms: &["t3 kills", "tier 3 kills", "t3"],
    },
    ColumnSpec {
        canonical: T4_KILLS,
        class: ColumnClass::Tier(4),
        synonyms: &["t4 kills", "tier 4 kills", "t4"],
    },
    ColumnSpec {
        canonical: T5_KILLS,
        class: ColumnClass::Tier(5),
        synonyms: &["t5 kills", "tier 5 kills", "t5"],
    },
    ColumnSpec {
        canonical: DOMAIN_ID,
        class: ColumnClass::Static,
        synonyms: &["domain id", "domain"],
    },
    ColumnSpec {
        canonical: LOST_KINGDOM_COUNT,
        class: ColumnClass::Static,
        synonyms: &["lost kingdom count", "lk count"],
    },
    ColumnSpec {
        canonical: LK_MOST_KILLED,
        class: ColumnClass::Static,
        synonyms: &["lk most killed"],
    },
    ColumnSpec {
        canonical: LK_MOST_LOST,
        class: ColumnClass::Static,
        synonyms: &["lk most lost"],
    },
    ColumnSpec {
        canonical: LK_MOST_HEALED,
        class: ColumnClass::Static,
        synonyms: &["lk most healed"],
    },
    ColumnSpec {
        canonical: CURRENT_LEAGUE,
        class: ColumnClass::Static,
        synonyms: &["current league", "league"],
    },
    ColumnSpec {
        canonical: HIGHEST_LEAGUE,
        class: ColumnClass::Static,
        synonyms: &["highest league"],
    },
    ColumnSpec {
        canonical: OLYMPIA_BATTLES,
        class: ColumnClass::Static,
        synonyms: &["olympia battles"],
    },
    ColumnSpec {
        canonical: OLYMPIA_WINS,
        class: ColumnClass::Static,
        synonyms: &["olympia wins"],
    },
    ColumnSpec {
        canonical: OLYMPIA_LIKES,
        class: ColumnClass::Static,
        synonyms: &["olympia likes"],
    },
    ColumnSpec {
        canonical: ARK_BATTLES,
        class: ColumnClass::Static,
        synonyms: &["ark battles"],
    },
    ColumnSpec {
        canonical: ARK_WINS,
        class: ColumnClass::Static,
        synonyms: &["ark wins"],
    },
    ColumnSpec {
        canonical: ARK_KILLS_PER_BATTLE,
        class: ColumnClass::Static,
        synonyms: &["ark kills per battle"],
    },
    ColumnSpec {
        canonical: ARK_SEVS_PER_BATTLE,
        class: ColumnClass::Static,
        synonyms: &["ark sevs per battle"],
    },
    ColumnSpec {
        canonical: ARK_HEALED_PER_BATTLE,
        class: ColumnClass::Static,
        synonyms: &["ark healed per battle"],
    },
    ColumnSpec {
        canonical: OSIRIS_COUNT,
        class: ColumnClass::Static,
        synonyms: &["osiris count"],
    },
    ColumnSpec {
        canonical: CHAMPIONSHIP_COUNT,
        class: ColumnClass::Static,
        synonyms: &["championship count"],
    },
    ColumnSpec {
        canonical: UTC_OFFSET,
        class: ColumnClass::Static,
        synonyms: &["utc offset", "utc"],
    },
    ColumnSpec {
        canonical: AUTARCH_COUNT,
        class: ColumnClass::Static,
        synonyms: &["autarch count", "autarch"],
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Map a raw header string to its canonical column name.
///
/// Total over all inputs: an unrecognized header returns `None` and the
/// caller drops that column, silently.
pub fn normalize_header(raw: &str) -> Option<&'static str> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    for spec in COLUMNS {
        if spec.synonyms.iter().any(|s| *s == needle) {
            return Some(spec.canonical);
        }
    }
    None
}

fn class_of(canonical: &str) -> Option<ColumnClass> {
    COLUMNS
        .iter()
        .find(|spec| spec.canonical == canonical)
        .map(|spec| spec.class)
}

/// Whether a canonical column is identity/metadata (never diffed).
pub fn is_static(canonical: &str) -> bool {
    matches!(class_of(canonical), Some(ColumnClass::Static))
}

/// Tier number for tier-kill columns, `None` otherwise.
pub fn tier_of(canonical: &str) -> Option<u8> {
    match class_of(canonical) {
        Some(ColumnClass::Tier(n)) => Some(n),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
