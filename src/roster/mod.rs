//! Roster storage
//!
//! The roster is the authoritative mapping of participant name to current
//! rating state. Lookups are keyed by name and insertion order is kept for
//! exports.

pub mod store;

pub use store::RosterStore;
