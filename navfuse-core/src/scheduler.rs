//! Deadline Scheduler
//!
//! ## Overview
//!
//! The scheduler decides when the estimation pipeline runs and owns
//! everything a run touches: the filter chain, the home reference, the
//! sanity gate and the liveness alarm. Sensor-arrival contexts reach it
//! only through the shared [`UpdateTracker`].
//!
//! ## State Machine
//!
//! ```text
//!            start()
//!   Idle ─────────────→ Armed ←──────────┐
//!                         │              │ re-arm
//!        sensor arrival   │              │
//!        or deadline hit  ↓              │
//!                       Running ─────────┘
//! ```
//!
//! There is no terminal state; the scheduler runs for the process lifetime.
//! Re-entrancy is impossible by construction: a run happens inside
//! [`DeadlineScheduler::poll`], which takes `&mut self`.
//!
//! ## One Run
//!
//! 1. Take the tracker's fresh-sample mask (atomic read-and-clear)
//! 2. Gate every flagged class through the [`SanityGate`]
//! 3. Pass the snapshot through the [`FilterChain`]
//! 4. Publish the liveness level: `Warning` if the run was started by the
//!    timeout and no class had a fresh sample, `Clear` otherwise
//! 5. Re-arm the deadline to `now + timeout`, unless an earlier deadline
//!    is already armed
//!
//! ## Soonest Wins
//!
//! A burst of sensor-triggered runs never pushes the armed deadline later.
//! The timeout therefore fires at least once per period even under a
//! steady sensor stream, and a stalled stream is detected within one
//! period of the last real update.
//!
//! ## Non-blocking Polling
//!
//! [`poll`](DeadlineScheduler::poll) follows the `nb` convention: it
//! returns `WouldBlock` when neither trigger is pending, so the caller
//! decides how to wait (cooperative yield, WFI, thread park). The
//! [`runtime`](crate::runtime) module provides a thread-based loop.

use core::convert::Infallible;

use heapless::Vec;

use crate::{
    alarm::{AlarmLevel, LivenessAlarm},
    chain::{ChainReport, FilterChain},
    constants::{
        buffers::SENSOR_CLASS_COUNT,
        timing::{MAX_TIMEOUT_MS, MIN_TIMEOUT_MS},
    },
    errors::{EstimationError, EstimationResult, SanityResult},
    home::{HomeLinearizer, HomeLocation, HomeReference},
    sanity::{Rejection, SanityGate},
    sensors::{SensorMask, SensorSnapshot},
    settings::EstimationSettings,
    time::{remaining_ms, Timestamp},
    tracker::UpdateTracker,
    traits::{AlarmSink, SensorSource, TimeSource},
};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// Constructed, not started
    Idle,
    /// Waiting for a sensor arrival or the deadline
    Armed,
    /// Executing a pipeline run
    Running,
}

impl SchedulerState {
    /// Lower-case state name
    pub const fn name(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Armed => "armed",
            SchedulerState::Running => "running",
        }
    }
}

/// What started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// A sensor-arrival notification
    SensorUpdate,
    /// The armed deadline elapsed
    Timeout,
}

/// Everything that happened in one run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// What started the run
    pub trigger: Trigger,
    /// Clock reading when the run started
    pub started_at: Timestamp,
    /// Fresh-sample bits taken from the tracker
    pub consumed: SensorMask,
    /// Classes that passed the sanity gate
    pub accepted: SensorMask,
    /// Classes the sanity gate dropped
    pub rejected: SensorMask,
    /// Reason for each dropped class
    pub rejections: Vec<Rejection, SENSOR_CLASS_COUNT>,
    /// Snapshot after the last filter unit
    pub snapshot: SensorSnapshot,
    /// Filter chain outcome
    pub chain: ChainReport,
    /// Liveness level published for this run
    pub alarm: AlarmLevel,
    /// Deadline armed at the end of the run
    pub next_deadline: Timestamp,
}

/// Cumulative scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerStats {
    /// Completed runs
    pub runs: u32,
    /// Runs started by a sensor arrival
    pub sensor_runs: u32,
    /// Runs started by the deadline
    pub timeout_runs: u32,
    /// Runs that published a warning
    pub stale_runs: u32,
    /// Samples dropped by the sanity gate, per class
    pub dropped: [u32; SENSOR_CLASS_COUNT],
    /// Filter unit failures over all runs
    pub filter_failures: u32,
}

impl SchedulerStats {
    /// Total dropped samples over all classes
    pub fn total_dropped(&self) -> u32 {
        self.dropped.iter().fold(0u32, |acc, n| acc.saturating_add(*n))
    }
}

/// Event-and-timeout driven pipeline scheduler
///
/// Generic over the sensor bus `S`, the alarm table `A` and the clock `C`.
/// The tracker is borrowed so it can live in a `static` shared with the
/// sensor-arrival contexts.
pub struct DeadlineScheduler<'t, S, A, C>
where
    S: SensorSource,
    A: AlarmSink,
    C: TimeSource,
{
    tracker: &'t UpdateTracker,
    sensors: S,
    alarm_sink: A,
    clock: C,
    chain: FilterChain,
    gate: SanityGate,
    home: HomeLinearizer,
    alarm: LivenessAlarm,
    state: SchedulerState,
    timeout_ms: u32,
    deadline: Option<Timestamp>,
    stats: SchedulerStats,
}

impl<'t, S, A, C> DeadlineScheduler<'t, S, A, C>
where
    S: SensorSource,
    A: AlarmSink,
    C: TimeSource,
{
    /// Construct an idle scheduler
    ///
    /// The timeout is taken from `settings`, clamped to the accepted range.
    /// The chain is fixed from here on.
    pub fn new(
        tracker: &'t UpdateTracker,
        sensors: S,
        alarm_sink: A,
        clock: C,
        chain: FilterChain,
        settings: &EstimationSettings,
    ) -> Self {
        Self {
            tracker,
            sensors,
            alarm_sink,
            clock,
            chain,
            gate: SanityGate::default(),
            home: HomeLinearizer::new(),
            alarm: LivenessAlarm::new(),
            state: SchedulerState::Idle,
            timeout_ms: settings.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS),
            deadline: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Replace the sanity gate
    pub fn with_gate(mut self, gate: SanityGate) -> Self {
        self.gate = gate;
        self
    }

    /// Initialize the chain and arm the first deadline
    ///
    /// `home` is the home location known at start, if any; it goes through
    /// the same validation as later change notifications. Unit init
    /// failures are returned in the report but do not prevent the start.
    pub fn start(&mut self, home: Option<&HomeLocation>) -> EstimationResult<ChainReport> {
        if self.state != SchedulerState::Idle {
            return Err(EstimationError::InvalidState {
                expected: SchedulerState::Idle.name(),
                actual: self.state.name(),
            });
        }

        if let Some(home) = home {
            // A rejected home is logged by the linearizer; positions stay gated
            self.home.on_home_location_changed(home).ok();
        }

        let report = self.chain.init();
        let now = self.clock.now();
        self.deadline = Some(now.saturating_add(self.timeout_ms as u64));
        self.state = SchedulerState::Armed;

        est_info!(
            "estimation started: {} filter units, {} init failures, timeout {} ms",
            self.chain.len(),
            report.failures.len(),
            self.timeout_ms
        );
        Ok(report)
    }

    /// Handle a home-location change notification
    pub fn on_home_location_changed(&mut self, home: &HomeLocation) -> SanityResult<&HomeReference> {
        self.home.on_home_location_changed(home)
    }

    /// Handle a settings change notification
    ///
    /// Only the timeout is applied; it takes effect at the next re-arm.
    /// The filter order is fixed after start and is ignored here.
    pub fn apply_settings(&mut self, settings: &EstimationSettings) -> EstimationResult<()> {
        settings.validate()?;
        self.timeout_ms = settings.timeout_ms;
        Ok(())
    }

    /// Run the pipeline if a trigger is pending
    ///
    /// Returns `WouldBlock` when idle or when neither a sensor arrival nor
    /// an expired deadline is pending.
    pub fn poll(&mut self) -> nb::Result<RunReport, Infallible> {
        if self.state != SchedulerState::Armed {
            return Err(nb::Error::WouldBlock);
        }

        let now = self.clock.now();
        let expired = self.deadline.is_some_and(|d| now >= d);
        let dispatched = self.tracker.take_dispatch_request();

        let trigger = if dispatched {
            Trigger::SensorUpdate
        } else if expired {
            Trigger::Timeout
        } else {
            return Err(nb::Error::WouldBlock);
        };

        // An expired deadline is spent by this run whatever triggered it
        if expired {
            self.deadline = None;
        }

        Ok(self.run(trigger, now))
    }

    fn run(&mut self, trigger: Trigger, started_at: Timestamp) -> RunReport {
        self.state = SchedulerState::Running;

        let consumed = self.tracker.take_and_clear();
        let outcome = self.gate.apply(consumed, &self.sensors, &self.home);
        for rejection in outcome.rejections.iter() {
            let slot = &mut self.stats.dropped[rejection.class.index()];
            *slot = slot.saturating_add(1);
        }

        let accepted = outcome.accepted();
        let mut snapshot = outcome.snapshot;
        let chain = self.chain.run(&mut snapshot);

        let level = if trigger == Trigger::Timeout && consumed.is_empty() {
            AlarmLevel::Warning
        } else {
            AlarmLevel::Clear
        };
        if self.alarm.update(level) {
            match level {
                AlarmLevel::Warning => est_warn!("no sensor update within {} ms", self.timeout_ms),
                AlarmLevel::Clear => est_info!("sensor updates resumed"),
            }
        }
        self.alarm_sink.set_attitude_alarm(level);

        let next_deadline = self.rearm();
        self.state = SchedulerState::Armed;

        self.stats.runs = self.stats.runs.saturating_add(1);
        match trigger {
            Trigger::SensorUpdate => self.stats.sensor_runs = self.stats.sensor_runs.saturating_add(1),
            Trigger::Timeout => self.stats.timeout_runs = self.stats.timeout_runs.saturating_add(1),
        }
        if level == AlarmLevel::Warning {
            self.stats.stale_runs = self.stats.stale_runs.saturating_add(1);
        }
        self.stats.filter_failures = self
            .stats
            .filter_failures
            .saturating_add(chain.failures.len() as u32);

        est_trace!(
            "run {:?}: consumed {:#06x} accepted {:#06x} next deadline {}",
            trigger,
            consumed.bits(),
            accepted.bits(),
            next_deadline
        );

        RunReport {
            trigger,
            started_at,
            consumed,
            accepted,
            rejected: outcome.rejected,
            rejections: outcome.rejections,
            snapshot,
            chain,
            alarm: level,
            next_deadline,
        }
    }

    /// Arm `now + timeout` unless an earlier deadline is already armed
    fn rearm(&mut self) -> Timestamp {
        let candidate = self.clock.now().saturating_add(self.timeout_ms as u64);
        let deadline = match self.deadline {
            Some(armed) if armed <= candidate => armed,
            _ => candidate,
        };
        self.deadline = Some(deadline);
        deadline
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Armed deadline, if started
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Milliseconds until the armed deadline, if started
    pub fn time_until_deadline(&self) -> Option<u64> {
        self.deadline.map(|d| remaining_ms(self.clock.now(), d))
    }

    /// Re-arm timeout in effect (milliseconds)
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Liveness level of the last run
    pub fn alarm_level(&self) -> AlarmLevel {
        self.alarm.level()
    }

    /// Liveness alarm with its transition count
    pub fn alarm(&self) -> &LivenessAlarm {
        &self.alarm
    }

    /// Cumulative counters
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// The owned filter chain
    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    /// The owned home linearizer
    pub fn home(&self) -> &HomeLinearizer {
        &self.home
    }

    /// Shared update tracker
    pub fn tracker(&self) -> &'t UpdateTracker {
        self.tracker
    }

    /// Sensor bus
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    /// Mutable sensor bus, for simulation
    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    /// Alarm table
    pub fn alarm_sink(&self) -> &A {
        &self.alarm_sink
    }

    /// Clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock, for simulation
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
