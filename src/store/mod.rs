//! Read-only lookup of airline rules and sticker reference data.
//!
//! [`RuleStore`] is the contract the decision pipelines consume; the decision
//! layer never writes through it. [`SqliteRuleStore`] is the rusqlite-backed
//! implementation, and [`seed`] holds the administrative seeding helpers that
//! populate it out of band.

pub mod error;
pub mod seed;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteRuleStore;

use crate::decision::types::{AirlineRule, StickerReference};

/// Lookup collaborator for the decision pipelines.
pub trait RuleStore: Send + Sync {
    /// Looks up the rule set for an airline by display name.
    ///
    /// Matching is exact and case-sensitive. Returns `None` when no airline
    /// matches; when duplicate names exist the first stored row wins.
    fn find_airline_rule(&self, airline_name: &str) -> StoreResult<Option<AirlineRule>>;

    /// Returns the full sticker reference set in stable storage order
    /// (ascending row id). Consumers match in memory by shape+color.
    fn list_sticker_references(&self) -> StoreResult<Vec<StickerReference>>;

    /// Resolves the airline operating a flight from the first two characters
    /// of its flight code (case-insensitive). Returns the airline name, or
    /// `None` when no flight carries that prefix.
    fn find_airline_for_flight(&self, flight_code: &str) -> StoreResult<Option<String>>;

    /// Cheap reachability probe for liveness reporting.
    fn health_check(&self) -> StoreResult<()>;
}
