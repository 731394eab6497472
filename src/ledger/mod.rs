//! Ledger module containing the block model and the ledger itself

pub mod block;
pub mod core;

pub use block::*;
pub use core::*;
