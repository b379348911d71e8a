//! Thread-based runtime (requires `std`)
//!
//! On a hosted target the "cooperative yield until the next trigger" is a
//! thread park: the estimation thread parks until either a sensor
//! arrival unparks it or the armed deadline passes.
//!
//! ```text
//! driver thread                     estimation thread
//!   sample ready                      run_until(..)
//!   dispatcher.sensor_updated(c) ──→    poll() → run
//!     tracker.mark(c)                   poll() → WouldBlock
//!     thread.unpark() ──────────────→   park_timeout(until deadline)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Thread};
use std::time::Duration;

use crate::{
    scheduler::{DeadlineScheduler, RunReport},
    sensors::SensorClass,
    tracker::UpdateTracker,
    traits::{AlarmSink, SensorSource, TimeSource},
};

/// Arrival-side handle: marks the tracker and wakes the estimation thread
#[derive(Debug, Clone)]
pub struct SensorDispatcher<'t> {
    tracker: &'t UpdateTracker,
    estimator: Thread,
}

impl<'t> SensorDispatcher<'t> {
    /// Dispatcher waking `estimator`, the thread running [`run_until`]
    pub fn new(tracker: &'t UpdateTracker, estimator: Thread) -> Self {
        Self { tracker, estimator }
    }

    /// Sensor-arrival callback
    pub fn sensor_updated(&self, class: SensorClass) {
        self.tracker.mark(class);
        self.estimator.unpark();
    }

    /// Wake the estimation thread without marking anything
    pub fn wake(&self) {
        self.estimator.unpark();
    }
}

/// Drive `scheduler` on the current thread until `stop` is set
///
/// Parks between runs until the next deadline or an unpark. Returns the
/// number of runs executed. Set `stop` and then call
/// [`SensorDispatcher::wake`] for a prompt exit.
pub fn run_until<S, A, C, F>(
    scheduler: &mut DeadlineScheduler<'_, S, A, C>,
    stop: &AtomicBool,
    mut on_run: F,
) -> u64
where
    S: SensorSource,
    A: AlarmSink,
    C: TimeSource,
    F: FnMut(&RunReport),
{
    let mut runs = 0u64;

    while !stop.load(Ordering::Acquire) {
        match scheduler.poll() {
            Ok(report) => {
                runs += 1;
                on_run(&report);
            }
            Err(nb::Error::WouldBlock) => {
                let wait_ms = scheduler
                    .time_until_deadline()
                    .unwrap_or(scheduler.timeout_ms() as u64)
                    .max(1);
                thread::park_timeout(Duration::from_millis(wait_ms));
            }
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::alarm::AlarmLevel;
    use crate::chain::FilterChain;
    use crate::home::GpsPosition;
    use crate::sensors::{AirspeedSample, SensorMask};
    use crate::settings::EstimationSettings;
    use crate::time::MonotonicClock;

    struct StillBus;

    impl SensorSource for StillBus {
        fn gyro(&self) -> [f32; 3] {
            [0.0; 3]
        }
        fn accel(&self) -> [f32; 3] {
            [0.0, 0.0, -9.81]
        }
        fn mag(&self) -> [f32; 3] {
            [0.2, 0.0, 0.4]
        }
        fn gps_velocity(&self) -> [f32; 3] {
            [0.0; 3]
        }
        fn baro_altitude(&self) -> f32 {
            100.0
        }
        fn airspeed(&self) -> AirspeedSample {
            AirspeedSample::default()
        }
        fn gps_position(&self) -> GpsPosition {
            GpsPosition::default()
        }
    }

    struct NoAlarms;

    impl AlarmSink for NoAlarms {
        fn set_attitude_alarm(&mut self, _level: AlarmLevel) {}
    }

    #[test]
    fn dispatcher_wakes_the_estimation_thread() {
        let tracker = UpdateTracker::new();
        let stop = AtomicBool::new(false);
        let timeout = Duration::from_secs(10);

        thread::scope(|s| {
            let (dispatcher_tx, dispatcher_rx) = mpsc::channel();
            let (report_tx, report_rx) = mpsc::channel();
            let tracker = &tracker;
            let stop = &stop;

            let estimator = s.spawn(move || {
                let chain = FilterChain::builder().build().unwrap();
                // Long timeout so only sensor arrivals trigger runs
                let settings = EstimationSettings::default().timeout(10_000);
                let mut scheduler = DeadlineScheduler::new(
                    tracker,
                    StillBus,
                    NoAlarms,
                    MonotonicClock::new(),
                    chain,
                    &settings,
                );
                scheduler.start(None).unwrap();
                dispatcher_tx
                    .send(SensorDispatcher::new(tracker, thread::current()))
                    .unwrap();

                run_until(&mut scheduler, stop, |report| {
                    report_tx.send((report.trigger, report.consumed)).unwrap();
                })
            });

            let dispatcher = dispatcher_rx.recv_timeout(timeout).unwrap();

            dispatcher.sensor_updated(SensorClass::Baro);
            let (trigger, consumed) = report_rx.recv_timeout(timeout).unwrap();
            assert_eq!(trigger, crate::scheduler::Trigger::SensorUpdate);
            assert_eq!(consumed, SensorMask::BARO);

            dispatcher.sensor_updated(SensorClass::Accel);
            let (_, consumed) = report_rx.recv_timeout(timeout).unwrap();
            assert_eq!(consumed, SensorMask::ACCEL);

            stop.store(true, Ordering::Release);
            dispatcher.wake();
            assert_eq!(estimator.join().unwrap(), 2);
        });
    }
}
