//! Core Traits and Collaborator Seams
//!
//! The estimator owns its scheduling logic but nothing else. Everything it
//! talks to is reached through one of these traits:
//!
//! - [`filter`] - pluggable estimator units and their factory
//! - [`time`] - monotonic millisecond clock
//! - [`collaborators`] - sensor bus reads and alarm reporting
//!
//! ## Design Philosophy
//!
//! - **Static Dispatch at the Edges**: the scheduler is generic over its
//!   sensor source, alarm sink and clock, so a flight build monomorphizes
//!   them away
//! - **Dynamic Dispatch in the Chain**: filter units differ per deployment
//!   and are held as boxed trait objects assembled once at start

pub mod collaborators;
pub mod filter;
pub mod time;

pub use collaborators::{AlarmSink, SensorSource};
pub use filter::{FilterFactory, FilterUnit};
pub use time::TimeSource;
