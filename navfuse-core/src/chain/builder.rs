//! Filter chain and its builder
//!
//! The chain is assembled once, either unit by unit through
//! [`ChainBuilder`] or from [`EstimationSettings`] and a
//! [`FilterFactory`], and is then owned by the scheduler.

use alloc::boxed::Box;

use heapless::Vec;

use crate::{
    constants::buffers::MAX_FILTER_UNITS,
    errors::{EstimationError, EstimationResult},
    sensors::SensorSnapshot,
    settings::EstimationSettings,
    traits::{FilterFactory, FilterUnit},
};

use super::{ChainMetrics, ChainReport, UnitFailure};

/// Fixed, ordered sequence of filter units
///
/// ## Design Goals
///
/// 1. **Fixed Memory**: unit slots are a heapless vector sized at compile
///    time; the only allocations are the boxed units, made at assembly
/// 2. **Fixed Identity**: no insertion or removal after construction
/// 3. **Observable**: per-unit invocation and failure counters
pub struct FilterChain {
    /// Units in execution order
    units: Vec<Box<dyn FilterUnit>, MAX_FILTER_UNITS>,
    /// Chain metrics
    metrics: ChainMetrics,
}

impl FilterChain {
    /// Create a new chain builder
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Assemble the configured units in configured order
    ///
    /// Fails if the settings are invalid or the factory has no constructor
    /// for one of the kinds.
    pub fn from_settings<F: FilterFactory>(
        settings: &EstimationSettings,
        mut factory: F,
    ) -> EstimationResult<Self> {
        settings.validate()?;

        let mut builder = ChainBuilder::new();
        for kind in settings.filter_order.iter().copied() {
            let unit = factory
                .create(kind)
                .ok_or(EstimationError::UnknownFilter { name: kind.name() })?;
            builder = builder.add_boxed(unit);
        }
        builder.build()
    }

    /// Call `init` on every unit in order
    ///
    /// A failing unit is reported and stays in the chain; it is still
    /// updated on every run.
    pub fn init(&mut self) -> ChainReport {
        let mut report = ChainReport::default();

        for (index, unit) in self.units.iter_mut().enumerate() {
            report.executed += 1;
            if let Err(error) = unit.init() {
                est_warn!("filter unit {} failed to initialize: {}", unit.name(), error);
                self.metrics.init_failures[index] = self.metrics.init_failures[index].saturating_add(1);
                report
                    .failures
                    .push(UnitFailure { index, name: unit.name(), error })
                    .ok();
            }
        }

        report
    }

    /// Pass `snapshot` through every unit in order
    pub fn run(&mut self, snapshot: &mut SensorSnapshot) -> ChainReport {
        let mut report = ChainReport::default();

        for (index, unit) in self.units.iter_mut().enumerate() {
            report.executed += 1;
            self.metrics.invocations[index] = self.metrics.invocations[index].saturating_add(1);

            if let Err(error) = unit.update(snapshot) {
                est_debug!("filter unit {} failed: {}", unit.name(), error);
                self.metrics.failures[index] = self.metrics.failures[index].saturating_add(1);
                // At most one failure per unit, capacity matches the unit count
                report
                    .failures
                    .push(UnitFailure { index, name: unit.name(), error })
                    .ok();
            }
        }

        self.metrics.runs = self.metrics.runs.saturating_add(1);
        report
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when the chain has no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit names in execution order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units.iter().map(|u| u.name())
    }

    /// Get chain metrics
    pub fn metrics(&self) -> &ChainMetrics {
        &self.metrics
    }
}

impl core::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Builder for [`FilterChain`]
pub struct ChainBuilder {
    units: Vec<Box<dyn FilterUnit>, MAX_FILTER_UNITS>,
    overflow: bool,
}

impl ChainBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            overflow: false,
        }
    }

    /// Append a unit
    pub fn add_unit<U: FilterUnit + 'static>(self, unit: U) -> Self {
        self.add_boxed(Box::new(unit))
    }

    /// Append an already boxed unit
    pub fn add_boxed(mut self, unit: Box<dyn FilterUnit>) -> Self {
        if self.units.push(unit).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Build the chain
    pub fn build(self) -> EstimationResult<FilterChain> {
        if self.overflow {
            return Err(EstimationError::TooManyFilters {
                capacity: MAX_FILTER_UNITS,
            });
        }
        Ok(FilterChain {
            units: self.units,
            metrics: ChainMetrics::new(),
        })
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FilterError, FilterResult};
    use crate::sensors::SensorMask;
    use crate::settings::FilterKind;

    /// Appends its tag to the snapshot's baro field so order is visible
    struct Tagger {
        name: &'static str,
        tag: f32,
        fail: bool,
    }

    impl Tagger {
        fn ok(name: &'static str, tag: f32) -> Self {
            Self { name, tag, fail: false }
        }

        fn failing(name: &'static str, tag: f32) -> Self {
            Self { name, tag, fail: true }
        }
    }

    impl FilterUnit for Tagger {
        fn name(&self) -> &'static str {
            self.name
        }

        fn init(&mut self) -> FilterResult<()> {
            if self.fail {
                Err(FilterError::Internal { reason: "init" })
            } else {
                Ok(())
            }
        }

        fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
            state.bar = state.bar * 10.0 + self.tag;
            if self.fail {
                return Err(FilterError::Diverged { reason: "scripted" });
            }
            Ok(())
        }
    }

    /// Produces attitude from gyro, only if gyro is valid
    struct Attitude;

    impl FilterUnit for Attitude {
        fn name(&self) -> &'static str {
            "attitude"
        }

        fn init(&mut self) -> FilterResult<()> {
            Ok(())
        }

        fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
            if !state.is_valid(SensorMask::GYRO) {
                return Err(FilterError::MissingInput);
            }
            state.att = [1.0, 0.0, 0.0, 0.0];
            state.mark_valid(SensorMask::ATTITUDE);
            Ok(())
        }
    }

    /// Consumes attitude produced earlier in the run
    struct NeedsAttitude;

    impl FilterUnit for NeedsAttitude {
        fn name(&self) -> &'static str {
            "needs_attitude"
        }

        fn init(&mut self) -> FilterResult<()> {
            Ok(())
        }

        fn update(&mut self, state: &mut SensorSnapshot) -> FilterResult<()> {
            if state.is_valid(SensorMask::ATTITUDE) {
                state.invalidate(SensorMask::GYRO);
                Ok(())
            } else {
                Err(FilterError::MissingInput)
            }
        }
    }

    #[test]
    fn units_run_in_construction_order() {
        let mut chain = FilterChain::builder()
            .add_unit(Tagger::ok("a", 1.0))
            .add_unit(Tagger::ok("b", 2.0))
            .add_unit(Tagger::ok("c", 3.0))
            .build()
            .unwrap();

        let mut snapshot = SensorSnapshot::new();
        let report = chain.run(&mut snapshot);

        assert_eq!(snapshot.bar, 123.0);
        assert_eq!(report.executed, 3);
        assert!(report.is_clean());
        assert_eq!(chain.names().collect::<Vec<_, 4>>().as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn failing_unit_does_not_stop_the_chain() {
        let mut chain = FilterChain::builder()
            .add_unit(Tagger::ok("a", 1.0))
            .add_unit(Tagger::failing("broken", 2.0))
            .add_unit(Tagger::ok("c", 3.0))
            .build()
            .unwrap();

        let mut snapshot = SensorSnapshot::new();
        let report = chain.run(&mut snapshot);

        assert_eq!(snapshot.bar, 123.0);
        assert_eq!(report.executed, 3);
        assert!(report.failed(1));
        assert_eq!(
            report.failures[0],
            UnitFailure {
                index: 1,
                name: "broken",
                error: FilterError::Diverged { reason: "scripted" },
            }
        );

        chain.run(&mut snapshot);
        let metrics = chain.metrics();
        assert_eq!(metrics.runs, 2);
        assert_eq!(metrics.invocations[..3], [2, 2, 2]);
        assert_eq!(metrics.failures[..3], [0, 2, 0]);
        assert_eq!(metrics.total_failures(), 2);
    }

    #[test]
    fn later_units_see_earlier_effects() {
        let mut chain = FilterChain::builder()
            .add_unit(Attitude)
            .add_unit(NeedsAttitude)
            .build()
            .unwrap();

        let mut snapshot = SensorSnapshot::new();
        snapshot.mark_valid(SensorMask::GYRO);
        let report = chain.run(&mut snapshot);

        assert!(report.is_clean());
        assert_eq!(snapshot.updated, SensorMask::ATTITUDE);
        assert_eq!(snapshot.att, [1.0, 0.0, 0.0, 0.0]);

        // Without gyro the producer fails and the consumer has nothing
        let mut empty = SensorSnapshot::new();
        let report = chain.run(&mut empty);
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn init_failures_are_reported_not_fatal() {
        let mut chain = FilterChain::builder()
            .add_unit(Tagger::failing("broken", 1.0))
            .add_unit(Tagger::ok("fine", 2.0))
            .build()
            .unwrap();

        let report = chain.init();
        assert_eq!(report.executed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "broken");
        assert_eq!(chain.metrics().init_failures[..2], [1, 0]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn builder_rejects_overflow() {
        let mut builder = FilterChain::builder();
        for _ in 0..=MAX_FILTER_UNITS {
            builder = builder.add_unit(Tagger::ok("x", 0.0));
        }
        assert_eq!(
            builder.build().unwrap_err(),
            EstimationError::TooManyFilters { capacity: MAX_FILTER_UNITS }
        );
    }

    #[test]
    fn from_settings_follows_configured_order() {
        let settings = EstimationSettings::with_filters(&[
            FilterKind::Barometer,
            FilterKind::Stationary,
            FilterKind::Ins13,
        ])
        .unwrap();

        let chain = FilterChain::from_settings(&settings, |kind: FilterKind| {
            Some(Box::new(Tagger::ok(kind.name(), 0.0)) as Box<dyn FilterUnit>)
        })
        .unwrap();

        assert_eq!(
            chain.names().collect::<Vec<_, 4>>().as_slice(),
            &["barometer", "stationary", "ins13"]
        );
    }

    #[test]
    fn from_settings_reports_missing_constructor() {
        let settings = EstimationSettings::default();
        let result = FilterChain::from_settings(&settings, |kind: FilterKind| match kind {
            FilterKind::Complementary => None,
            other => Some(Box::new(Tagger::ok(other.name(), 0.0)) as Box<dyn FilterUnit>),
        });

        assert_eq!(
            result.unwrap_err(),
            EstimationError::UnknownFilter { name: "complementary" }
        );
    }
}
