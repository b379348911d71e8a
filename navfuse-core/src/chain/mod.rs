//! Ordered Filter Chain
//!
//! ## Overview
//!
//! The chain sequences pluggable estimator units over the per-run
//! [`SensorSnapshot`](crate::SensorSnapshot). It performs no numerical
//! work itself; it only calls each unit in turn and records what happened.
//!
//! ```text
//! gate → snapshot → [mag] → [baro] → [stationary] → [ins13] → run report
//!                     ↓        ↓          ↓             ↓
//!                  ok/err   ok/err     ok/err        ok/err
//! ```
//!
//! ## Execution Contract
//!
//! - Units run synchronously, in construction order, once per run
//! - A unit sees every change made by the units before it in the same run
//! - A failing unit is recorded and skipped over; the rest still run
//!   (fail-soft: a partial estimate beats none)
//! - The set and order of units never change after construction
//!
//! ## Module Organization
//!
//! - Report and metric types (this file)
//! - `builder` - the chain itself and its builder

use heapless::Vec;

use crate::{constants::buffers::MAX_FILTER_UNITS, errors::FilterError};

pub mod builder;

pub use builder::{ChainBuilder, FilterChain};

/// One unit failure within a run or during init
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitFailure {
    /// Position of the unit in the chain
    pub index: usize,
    /// Unit name
    pub name: &'static str,
    /// What the unit reported
    pub error: FilterError,
}

/// Outcome of passing one snapshot through the chain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainReport {
    /// Number of units invoked
    pub executed: usize,
    /// Units that reported a failure, in chain order
    pub failures: Vec<UnitFailure, MAX_FILTER_UNITS>,
}

impl ChainReport {
    /// True when every invoked unit succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the unit at `index` failed
    pub fn failed(&self, index: usize) -> bool {
        self.failures.iter().any(|f| f.index == index)
    }
}

/// Cumulative per-unit counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainMetrics {
    /// Completed chain passes
    pub runs: u32,
    /// `update` calls per unit
    pub invocations: [u32; MAX_FILTER_UNITS],
    /// Failed `update` calls per unit
    pub failures: [u32; MAX_FILTER_UNITS],
    /// Failed `init` calls per unit
    pub init_failures: [u32; MAX_FILTER_UNITS],
}

impl ChainMetrics {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            runs: 0,
            invocations: [0; MAX_FILTER_UNITS],
            failures: [0; MAX_FILTER_UNITS],
            init_failures: [0; MAX_FILTER_UNITS],
        }
    }

    /// Sum of failed `update` calls over all units
    pub fn total_failures(&self) -> u32 {
        self.failures.iter().fold(0u32, |acc, n| acc.saturating_add(*n))
    }
}

impl Default for ChainMetrics {
    fn default() -> Self {
        Self::new()
    }
}
