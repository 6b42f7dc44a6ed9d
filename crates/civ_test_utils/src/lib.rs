//! # Civ Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture states and engines
//! - Command-script determinism harness
//! - Combat matchup tables
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
