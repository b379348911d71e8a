//! Estimation Settings
//!
//! ## Overview
//!
//! Deployment configuration for the estimation core: the re-arm timeout
//! and the ordered list of filter units to assemble at start. Loading and
//! persisting settings belongs to the settings collaborator; this module
//! only describes and validates them.
//!
//! ## Filter Order
//!
//! Which estimators run, and in which order, is a deployment choice. The
//! [`FusionAlgorithm`] presets expand into the documented orders below;
//! any other order can be given explicitly with
//! [`EstimationSettings::with_filters`].
//!
//! | Preset              | Order                                       |
//! |---------------------|---------------------------------------------|
//! | `Complementary`     | magnetometer, barometer, complementary      |
//! | `ComplementaryMag`  | magnetometer, barometer, complementary_mag  |
//! | `Ins13Indoor`       | magnetometer, barometer, stationary, ins13  |
//! | `Ins13Outdoor`      | magnetometer, barometer, ins13              |
//! | `Ins16`             | magnetometer, barometer, ins16              |
//!
//! Preprocessing units come first so the fusion unit sees their output in
//! the same run.
//!
//! ## Runtime Changes
//!
//! Only `timeout_ms` may change after start (see
//! [`DeadlineScheduler::apply_settings`](crate::DeadlineScheduler::apply_settings)).
//! The chain is fixed for the process lifetime.

use heapless::Vec;

use crate::{
    constants::{
        buffers::MAX_FILTER_UNITS,
        timing::{DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS},
    },
    errors::{EstimationError, EstimationResult},
};

/// Identity of a pluggable estimator unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterKind {
    /// Magnetometer-only preprocessing
    Magnetometer,
    /// Barometer-only preprocessing
    Barometer,
    /// Stationary detector (indoor, no GPS)
    Stationary,
    /// Complementary attitude filter
    Complementary,
    /// Complementary filter with magnetometer heading
    ComplementaryMag,
    /// 13-state INS extended Kalman filter
    Ins13,
    /// 16-state INS extended Kalman filter
    Ins16,
}

impl FilterKind {
    /// Stable name used in logs and configuration
    pub const fn name(self) -> &'static str {
        match self {
            FilterKind::Magnetometer => "magnetometer",
            FilterKind::Barometer => "barometer",
            FilterKind::Stationary => "stationary",
            FilterKind::Complementary => "complementary",
            FilterKind::ComplementaryMag => "complementary_mag",
            FilterKind::Ins13 => "ins13",
            FilterKind::Ins16 => "ins16",
        }
    }
}

/// Named filter-order presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FusionAlgorithm {
    /// Complementary attitude only
    #[default]
    Complementary,
    /// Complementary attitude with magnetometer heading
    ComplementaryMag,
    /// 13-state INS with stationary detection, no GPS
    Ins13Indoor,
    /// 13-state INS with GPS
    Ins13Outdoor,
    /// 16-state INS with GPS
    Ins16,
}

impl FusionAlgorithm {
    /// Filter order this preset expands into
    pub const fn filter_order(self) -> &'static [FilterKind] {
        use FilterKind::*;
        match self {
            FusionAlgorithm::Complementary => &[Magnetometer, Barometer, Complementary],
            FusionAlgorithm::ComplementaryMag => &[Magnetometer, Barometer, ComplementaryMag],
            FusionAlgorithm::Ins13Indoor => &[Magnetometer, Barometer, Stationary, Ins13],
            FusionAlgorithm::Ins13Outdoor => &[Magnetometer, Barometer, Ins13],
            FusionAlgorithm::Ins16 => &[Magnetometer, Barometer, Ins16],
        }
    }
}

/// Scheduler and chain configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimationSettings {
    /// Re-arm timeout (milliseconds)
    pub timeout_ms: u32,
    /// Filter units in execution order
    pub filter_order: Vec<FilterKind, MAX_FILTER_UNITS>,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self::for_algorithm(FusionAlgorithm::default())
    }
}

impl EstimationSettings {
    /// Default timeout with the preset's filter order
    pub fn for_algorithm(algorithm: FusionAlgorithm) -> Self {
        let mut filter_order = Vec::new();
        // Presets are shorter than MAX_FILTER_UNITS
        filter_order.extend_from_slice(algorithm.filter_order()).ok();
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            filter_order,
        }
    }

    /// Default timeout with an explicit filter order
    pub fn with_filters(order: &[FilterKind]) -> EstimationResult<Self> {
        let mut filter_order = Vec::new();
        filter_order
            .extend_from_slice(order)
            .map_err(|_| EstimationError::TooManyFilters {
                capacity: MAX_FILTER_UNITS,
            })?;
        let settings = Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            filter_order,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the timeout
    pub fn timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check the timeout range and that no unit appears twice
    pub fn validate(&self) -> EstimationResult<()> {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(EstimationError::InvalidConfig("timeout_ms out of range"));
        }
        for (i, kind) in self.filter_order.iter().enumerate() {
            if self.filter_order[..i].contains(kind) {
                return Err(EstimationError::InvalidConfig("filter unit listed twice"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_complementary_at_100ms() {
        let settings = EstimationSettings::default();
        assert_eq!(settings.timeout_ms, 100);
        assert_eq!(
            settings.filter_order.as_slice(),
            &[FilterKind::Magnetometer, FilterKind::Barometer, FilterKind::Complementary]
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn presets_put_preprocessing_first() {
        for algorithm in [
            FusionAlgorithm::Complementary,
            FusionAlgorithm::ComplementaryMag,
            FusionAlgorithm::Ins13Indoor,
            FusionAlgorithm::Ins13Outdoor,
            FusionAlgorithm::Ins16,
        ] {
            let order = algorithm.filter_order();
            assert_eq!(&order[..2], &[FilterKind::Magnetometer, FilterKind::Barometer]);
            assert!(EstimationSettings::for_algorithm(algorithm).validate().is_ok());
        }
    }

    #[test]
    fn rejects_bad_timeout_and_duplicates() {
        let zero = EstimationSettings::default().timeout(0);
        assert_eq!(
            zero.validate(),
            Err(EstimationError::InvalidConfig("timeout_ms out of range"))
        );

        assert_eq!(
            EstimationSettings::with_filters(&[FilterKind::Ins13, FilterKind::Ins13]),
            Err(EstimationError::InvalidConfig("filter unit listed twice"))
        );
    }

    #[test]
    fn too_many_filters() {
        let order = [FilterKind::Magnetometer; MAX_FILTER_UNITS + 1];
        assert_eq!(
            EstimationSettings::with_filters(&order),
            Err(EstimationError::TooManyFilters { capacity: MAX_FILTER_UNITS })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_from_json() {
        let json = r#"{"timeout_ms":50,"filter_order":["barometer","stationary","ins13"]}"#;
        let settings: EstimationSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.timeout_ms, 50);
        assert_eq!(
            settings.filter_order.as_slice(),
            &[FilterKind::Barometer, FilterKind::Stationary, FilterKind::Ins13]
        );
        assert!(settings.validate().is_ok());
    }
}
