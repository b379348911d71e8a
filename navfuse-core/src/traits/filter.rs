//! Filter Unit Traits
//!
//! This module defines the contract every pluggable estimator implements
//! to take part in the filter chain.
//!
//! ## Chain Architecture
//!
//! ```text
//! SensorSnapshot → [Unit 1] → [Unit 2] → ... → [Unit N]
//!                     ↓           ↓                ↓
//!                read/write  read/write       read/write
//!                  fields      fields           fields
//! ```
//!
//! Each unit can:
//! - Read any field whose validity bit is set
//! - Overwrite fields it refines (e.g. a bias-corrected gyro)
//! - Produce derived fields and set their bits (e.g. attitude)
//! - Clear bits of fields it considers unusable
//!
//! Later units see the cumulative effect of all earlier units in the same
//! run.

use alloc::boxed::Box;

use crate::errors::FilterResult;
use crate::sensors::SensorSnapshot;
use crate::settings::FilterKind;

/// Pluggable estimator unit
///
/// ## Implementation Guidelines
///
/// 1. **Bounded processing time**: `update` runs inside the flight-control
///    loop; no blocking, no I/O
/// 2. **Fail soft**: return an error for this run instead of panicking; the
///    chain records it and continues with the next unit
/// 3. **No retained snapshot**: keep derived state in `self`, never a copy
///    of the snapshot itself
///
/// ## Example: Gyro Bias Removal
///
/// ```rust
/// use navfuse_core::{FilterError, FilterResult, FilterUnit, SensorMask, SensorSnapshot};
///
/// struct GyroBias {
///     bias: [f32; 3],
/// }
///
/// impl FilterUnit for GyroBias {
///     fn name(&self) -> &'static str {
///         "gyro_bias"
///     }
///
///     fn init(&mut self) -> FilterResult<()> {
///         self.bias = [0.0; 3];
///         Ok(())
///     }
///
///     fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
///         if !state.is_valid(SensorMask::GYRO) {
///             return Err(FilterError::MissingInput);
///         }
///         for (g, b) in state.gyr.iter_mut().zip(self.bias) {
///             *g -= b;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait FilterUnit: Send {
    /// Unit name for logs, metrics and failure reports
    fn name(&self) -> &'static str;

    /// One-time setup, called by the scheduler's `start`
    fn init(&mut self) -> FilterResult<()>;

    /// Consume and augment the shared snapshot for one run
    fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()>;
}

impl<U: FilterUnit + ?Sized> FilterUnit for Box<U> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn init(&mut self) -> FilterResult<()> {
        (**self).init()
    }

    fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
        (**self).update(state)
    }
}

/// Constructor lookup for configured filter units
///
/// Each estimator lives in its own crate or module with its own
/// constructor; the deployment hands a factory to
/// [`FilterChain::from_settings`](crate::chain::FilterChain::from_settings)
/// which calls it once per configured kind, in configured order.
///
/// Closures work directly:
///
/// ```rust
/// use navfuse_core::{FilterChain, FilterKind, FilterUnit, EstimationSettings};
///
/// let settings = EstimationSettings::with_filters(&[]).unwrap();
/// let chain = FilterChain::from_settings(&settings, |_kind: FilterKind| {
///     None::<Box<dyn FilterUnit>>
/// })
/// .unwrap();
/// assert!(chain.is_empty());
/// ```
pub trait FilterFactory {
    /// Create the unit for `kind`, or `None` if this build has no such unit
    fn create(&mut self, kind: FilterKind) -> Option<Box<dyn FilterUnit>>;
}

impl<F> FilterFactory for F
where
    F: FnMut(FilterKind) -> Option<Box<dyn FilterUnit>>,
{
    fn create(&mut self, kind: FilterKind) -> Option<Box<dyn FilterUnit>> {
        self(kind)
    }
}
