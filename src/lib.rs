//! # Snapshot Ledger
//!
//! An in-memory balance ledger organised as a sequence of append-only
//! snapshots ("blocks"), each holding every account balance at one height.
//!
//! ## Features
//!
//! - **Historical snapshots**: every block stays queryable by height and never changes once superseded
//! - **Atomic transfers**: a debit and its credit are applied together or not at all
//! - **Non-negative balances**: negative writes and overdrawn transfers are rejected
//! - **Pluggable validation**: inject a [`LedgerValidator`] to add policy on top of the core rules
//! - **Concurrent access**: [`utils::SharedLedger`] wraps a ledger behind a single reader-writer lock
//!
//! ## Quick Start
//!
//! ```rust
//! use snapshot_ledger::Ledger;
//!
//! let mut ledger = Ledger::new();
//! ledger.set("Alice", 100)?;
//! ledger.set("Bob", 50)?;
//!
//! ledger.advance();
//! ledger.transfer("Alice", "Bob", 25)?;
//!
//! assert_eq!(ledger.get("Alice", 0)?, 100);
//! assert_eq!(ledger.get("Alice", 1)?, 75);
//! assert_eq!(ledger.get("Bob", 1)?, 75);
//! # Ok::<(), snapshot_ledger::LedgerError>(())
//! ```

pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use traits::*;
pub use types::*;
