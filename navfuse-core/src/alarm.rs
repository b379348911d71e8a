//! Attitude-estimation liveness alarm
//!
//! Two levels only. The scheduler raises `Warning` when a run was started
//! by the timeout and no sensor had delivered anything new, and returns to
//! `Clear` on the next run that consumed real data.

/// Liveness level published to the system alarm table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlarmLevel {
    /// Fresh sensor input within the expected cadence
    #[default]
    Clear,
    /// Timeout elapsed without any new sensor input
    Warning,
}

/// Current liveness level plus transition bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub struct LivenessAlarm {
    level: AlarmLevel,
    raised: u32,
}

impl LivenessAlarm {
    /// Alarm starting in `Clear`
    pub const fn new() -> Self {
        Self {
            level: AlarmLevel::Clear,
            raised: 0,
        }
    }

    /// Current level
    pub const fn level(&self) -> AlarmLevel {
        self.level
    }

    /// Number of Clear → Warning transitions
    pub const fn times_raised(&self) -> u32 {
        self.raised
    }

    /// Move to `level`, returning true when the level changed
    pub fn update(&mut self, level: AlarmLevel) -> bool {
        if self.level == level {
            return false;
        }
        if level == AlarmLevel::Warning {
            self.raised = self.raised.saturating_add(1);
        }
        self.level = level;
        true
    }
}
