//! Per-kingdom session state.
//!
//! One store owns every kingdom's snapshot collections, scoring config,
//! and last-computed scored set. Mutation is single-writer by
//! construction: scan files are applied one at a time, and a
//! recalculation swaps a kingdom's scored collection in wholesale, so
//! there is no partially updated state to observe and no locking.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::config::ScoringConfig;
use crate::error::EngineError;
use crate::model::{PlayerRecord, ScoredPlayerRecord, SnapshotPhase};
use crate::reconcile::reconcile;
use crate::scoring::score;

// ---------------------------------------------------------------------------
// Kingdom state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct KingdomState {
    pub start: Vec<PlayerRecord>,
    pub end: Vec<PlayerRecord>,
    pub config: ScoringConfig,
    pub scored: Vec<ScoredPlayerRecord>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl KingdomState {
    fn new() -> Self {
        Self {
            start: Vec::new(),
            end: Vec::new(),
            config: ScoringConfig::default(),
            scored: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn phase_records(&self, phase: SnapshotPhase) -> &[PlayerRecord] {
        match phase {
            SnapshotPhase::Start => &self.start,
            SnapshotPhase::End => &self.end,
        }
    }

    /// Append one record, keeping Governor ID unique within the phase.
    /// A duplicate id replaces the earlier record.
    fn append(&mut self, phase: SnapshotPhase, record: PlayerRecord) {
        let id = record.governor_id();
        if id.is_empty() {
            return;
        }
        let records = match phase {
            SnapshotPhase::Start => &mut self.start,
            SnapshotPhase::End => &mut self.end,
        };
        match records.iter().position(|r| r.governor_id() == id) {
            Some(i) => records[i] = record,
            None => records.push(record),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Kingdom id → state, in discovery order.
#[derive(Debug, Default)]
pub struct RosterStore {
    kingdoms: HashMap<String, KingdomState>,
    order: Vec<String>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self, kingdom: &str) -> &mut KingdomState {
        if !self.kingdoms.contains_key(kingdom) {
            self.order.push(kingdom.to_string());
        }
        self.kingdoms
            .entry(kingdom.to_string())
            .or_insert_with(KingdomState::new)
    }

    /// Apply one scan file's extracted rows: the atomic unit of
    /// mutation when a batch of files is ingested. Kingdoms are created
    /// lazily on first write; the file's snapshot date is recorded for
    /// every kingdom the file touched.
    pub fn apply_scan(
        &mut self,
        phase: SnapshotPhase,
        records: Vec<PlayerRecord>,
        date: Option<NaiveDateTime>,
    ) {
        for record in records {
            let kingdom = record.kingdom.clone();
            let state = self.state_mut(&kingdom);
            state.append(phase, record);
            if let Some(d) = date {
                match phase {
                    SnapshotPhase::Start => state.start_date = Some(d),
                    SnapshotPhase::End => state.end_date = Some(d),
                }
            }
        }
    }

    /// Replace a kingdom's scoring config. Affects only future
    /// recalculations; the current scored set stands.
    pub fn set_config(&mut self, kingdom: &str, config: ScoringConfig) -> Result<(), EngineError> {
        match self.kingdoms.get_mut(kingdom) {
            Some(state) => {
                state.config = config;
                Ok(())
            }
            None => Err(EngineError::UnknownKingdom(kingdom.to_string())),
        }
    }

    pub fn set_config_all(&mut self, config: &ScoringConfig) {
        for state in self.kingdoms.values_mut() {
            state.config = config.clone();
        }
    }

    /// Reconcile and score one kingdom, replacing its scored set
    /// atomically. Returns the number of scored players.
    pub fn recalculate(&mut self, kingdom: &str) -> Result<usize, EngineError> {
        self.recalculate_filtered(kingdom, |_| true)
    }

    /// Recalculate with an external record predicate (e.g. a town-hall
    /// floor) applied to both sides before reconciliation. When either
    /// filtered side is empty the previous scored set is left
    /// untouched and `MissingSnapshot` is returned.
    pub fn recalculate_filtered<F>(&mut self, kingdom: &str, keep: F) -> Result<usize, EngineError>
    where
        F: Fn(&PlayerRecord) -> bool,
    {
        let state = self
            .kingdoms
            .get_mut(kingdom)
            .ok_or_else(|| EngineError::UnknownKingdom(kingdom.to_string()))?;

        let start: Vec<&PlayerRecord> = state.start.iter().filter(|r| keep(r)).collect();
        let end: Vec<&PlayerRecord> = state.end.iter().filter(|r| keep(r)).collect();

        if start.is_empty() {
            return Err(EngineError::MissingSnapshot {
                kingdom: kingdom.to_string(),
                phase: SnapshotPhase::Start,
            });
        }
        if end.is_empty() {
            return Err(EngineError::MissingSnapshot {
                kingdom: kingdom.to_string(),
                phase: SnapshotPhase::End,
            });
        }

        let reconciled = reconcile(&start, &end);
        state.scored = score(&reconciled, &state.config);
        Ok(state.scored.len())
    }

    /// Patch one scored record's bonus in place; the record's total is
    /// re-derived from its base percents plus the new bonus.
    pub fn set_bonus(
        &mut self,
        kingdom: &str,
        governor_id: &str,
        bonus: f64,
    ) -> Result<(), EngineError> {
        let state = self
            .kingdoms
            .get_mut(kingdom)
            .ok_or_else(|| EngineError::UnknownKingdom(kingdom.to_string()))?;
        let record = state
            .scored
            .iter_mut()
            .find(|r| r.governor_id == governor_id)
            .ok_or_else(|| EngineError::UnknownGovernor {
                kingdom: kingdom.to_string(),
                governor_id: governor_id.to_string(),
            })?;
        record.set_bonus(bonus);
        Ok(())
    }

    pub fn get(&self, kingdom: &str) -> Option<&KingdomState> {
        self.kingdoms.get(kingdom)
    }

    /// Kingdom ids in discovery order.
    pub fn kingdom_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop one kingdom entirely. Returns whether it existed.
    pub fn reset(&mut self, kingdom: &str) -> bool {
        let existed = self.kingdoms.remove(kingdom).is_some();
        self.order.retain(|k| k != kingdom);
        existed
    }

    pub fn reset_all(&mut self) {
        self.kingdoms.clear();
        self.order.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
