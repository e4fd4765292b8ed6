use std::fmt;

use crate::model::SnapshotPhase;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Coefficient validation error.
    ConfigValidation(String),
    /// Scoring requested without both snapshot sides present. Non-fatal:
    /// the kingdom's previously scored set is left untouched.
    MissingSnapshot {
        kingdom: String,
        phase: SnapshotPhase,
    },
    /// Operation on a kingdom the store has never seen.
    UnknownKingdom(String),
    /// Bonus patch aimed at a governor absent from the scored set.
    UnknownGovernor {
        kingdom: String,
        governor_id: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingSnapshot { kingdom, phase } => {
                write!(f, "kingdom '{kingdom}': no {phase} snapshot records to score")
            }
            Self::UnknownKingdom(kingdom) => write!(f, "unknown kingdom: {kingdom}"),
            Self::UnknownGovernor {
                kingdom,
                governor_id,
            } => {
                write!(f, "kingdom '{kingdom}': governor '{governor_id}' not in scored set")
            }
        }
    }
}

impl std::error::Error for EngineError {}
