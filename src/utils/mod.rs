//! Utility modules

pub mod shared;
pub mod validation;

pub use shared::*;
pub use validation::*;
