//! Guildxp - experience and level ledger for guilds
//!
//! Converts between xp and levels under a configurable growth curve and
//! keeps per-member xp/level records for each group in a document store.

pub mod config;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod progression;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigReport, LedgerConfig};
pub use error::{LedgerError, StoreError};
pub use ids::Identifier;
pub use ledger::{AddOutcome, Ledger, SubtractOutcome, XpForNext};
pub use progression::{Curve, GrowthConfig, GrowthMode, ProgressCalculator, TransitionDetails};
pub use store::{GroupDocument, JsonFileStore, MemberRecord, MemoryStore, Store};
