//! `kvkstat-engine` — scan reconciliation and DKP scoring.
//!
//! Pure engine crate: receives pre-decoded snapshot records, returns
//! reconciled and scored record sets. No CLI or IO dependencies.

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod scoring;
pub mod store;

pub use config::ScoringConfig;
pub use error::EngineError;
pub use model::{PlayerRecord, ScoredPlayerRecord, SnapshotPhase, Value};
pub use store::RosterStore;
